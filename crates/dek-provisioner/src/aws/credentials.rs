//! Resolution of the AWS credentials handed to the CSFLE KMS provider.

use async_trait::async_trait;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use common::ProvisionError;

/// AWS credential triple in the shape the KMS provider expects.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Source of AWS credentials for one invocation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Resolve credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Credential`] if no credentials are available.
    async fn resolve(&self) -> Result<AwsCredentials, ProvisionError>;
}

/// [`CredentialSource`] backed by the SDK's default provider chain.
#[derive(Clone, Debug)]
pub struct AmbientCredentials {
    provider: Option<SharedCredentialsProvider>,
}

impl AmbientCredentials {
    pub fn new(provider: Option<SharedCredentialsProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CredentialSource for AmbientCredentials {
    async fn resolve(&self) -> Result<AwsCredentials, ProvisionError> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            ProvisionError::Credential("no AWS credentials provider is configured".into())
        })?;

        let creds = provider
            .provide_credentials()
            .await
            .map_err(|e| ProvisionError::Credential(format!("failed to resolve AWS credentials: {e}")))?;

        Ok(AwsCredentials {
            access_key_id: creds.access_key_id().to_owned(),
            secret_access_key: creds.secret_access_key().to_owned(),
            session_token: creds.session_token().map(str::to_owned),
        })
    }
}
