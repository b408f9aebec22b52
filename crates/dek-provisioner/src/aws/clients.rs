//! AWS SDK client bundle built from the ambient configuration.

use aws_config::BehaviorVersion;
use aws_credential_types::provider::SharedCredentialsProvider;

/// Bundle of AWS SDK handles shared by every invocation in an execution context.
///
/// Both handles come from the same [`aws_config::SdkConfig`], so Secrets
/// Manager calls and the KMS credentials handed to the encryption library
/// resolve through one provider chain.
#[derive(Clone, Debug)]
pub struct AwsClients {
    /// Secrets Manager client used to fetch the connection secret.
    pub secretsmanager: aws_sdk_secretsmanager::Client,
    /// Credentials provider from the ambient chain (environment, role, ...).
    pub credentials: Option<SharedCredentialsProvider>,
}

impl AwsClients {
    /// Load the ambient SDK configuration and build the client bundle.
    ///
    /// Region and credentials are resolved by the standard AWS chain; in
    /// Lambda that is the function's environment and execution role.
    pub async fn init() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        Self {
            secretsmanager: aws_sdk_secretsmanager::Client::new(&config),
            credentials: config.credentials_provider(),
        }
    }
}
