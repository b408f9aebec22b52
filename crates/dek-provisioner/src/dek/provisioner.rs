//! [`Provisioner`]: wires the collaborators of one invocation together.

use std::sync::Arc;

use common::protocol::{DekRequest, ResponseEnvelope};
use common::ProvisionError;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::aws::CredentialSource;
use crate::secrets::SecretSource;
use crate::vault::{KeyVaultBackend, KEY_VAULT_NAMESPACE, KMS_PROVIDER};

/// The DEK provisioning handler.
///
/// Collaborators are injected at construction; the provisioner itself holds
/// no per-invocation state and is cheap to clone into each invocation.
#[derive(Clone)]
pub struct Provisioner {
    secrets: Arc<dyn SecretSource>,
    credentials: Arc<dyn CredentialSource>,
    vault: Arc<dyn KeyVaultBackend>,
}

impl Provisioner {
    pub fn new(
        secrets: Arc<dyn SecretSource>,
        credentials: Arc<dyn CredentialSource>,
        vault: Arc<dyn KeyVaultBackend>,
    ) -> Self {
        Self {
            secrets,
            credentials,
            vault,
        }
    }

    /// Handle one raw invocation event. Never fails.
    pub async fn handle(&self, event: serde_json::Value) -> ResponseEnvelope {
        let result = match DekRequest::from_event(event) {
            Ok(request) => self.provision(request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(key_id) => {
                info!(data_key_uuid = %key_id, "data key created");
                ResponseEnvelope::success(key_id.hyphenated().to_string())
            }
            Err(e) => {
                warn!(error.kind = e.kind(), error = %e, "data key provisioning failed");
                ResponseEnvelope::failure(&e)
            }
        }
    }

    /// Validate `request` and create one data key for it.
    ///
    /// # Errors
    ///
    /// Returns the [`ProvisionError`] of the first step that fails.
    #[instrument(
        skip_all,
        fields(
            kms_key_region = tracing::field::Empty,
            dek_alt_name = tracing::field::Empty
        )
    )]
    pub async fn provision(&self, request: DekRequest) -> Result<Uuid, ProvisionError> {
        let request = request.validate()?;
        let span = tracing::Span::current();
        span.record("kms_key_region", request.kms_key_region.as_str());
        span.record("dek_alt_name", request.dek_alt_name.as_str());

        let secret = self.secrets.resolve().await?;
        let session = self.vault.connect(&secret).await?;
        let credentials = self.credentials.resolve().await?;

        let master_key = request.master_key();
        info!(
            provider = KMS_PROVIDER,
            kms_key_arn = %master_key.key,
            key_vault = %KEY_VAULT_NAMESPACE,
            "creating data key"
        );
        let key_id = session
            .create_data_key(
                &KEY_VAULT_NAMESPACE,
                &credentials,
                &master_key,
                &[request.dek_alt_name],
            )
            .await?;

        key_id_to_uuid(&key_id)
    }
}

/// Interpret a 16-byte key id as a UUID.
///
/// # Errors
///
/// Returns [`ProvisionError::KeyCreation`] for any other length.
pub fn key_id_to_uuid(key_id: &[u8]) -> Result<Uuid, ProvisionError> {
    Uuid::from_slice(key_id).map_err(|_| {
        ProvisionError::KeyCreation(format!(
            "key id must be 16 bytes, got {}",
            key_id.len()
        ))
    })
}
