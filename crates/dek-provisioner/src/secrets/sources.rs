//! [`SecretSource`] implementations.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_secretsmanager::error::SdkError;
use common::ProvisionError;
use tracing::debug;

use super::{ConnectionSecret, SecretSource};
use crate::config::{Config, UriSource};

/// Fetches a JSON secret from Secrets Manager and reads the URI field from it.
#[derive(Clone, Debug)]
pub struct SecretsManagerSource {
    client: aws_sdk_secretsmanager::Client,
    secret_id: String,
    uri_field: String,
}

impl SecretsManagerSource {
    pub fn new(
        client: aws_sdk_secretsmanager::Client,
        secret_id: impl Into<String>,
        uri_field: impl Into<String>,
    ) -> Self {
        Self {
            client,
            secret_id: secret_id.into(),
            uri_field: uri_field.into(),
        }
    }
}

#[async_trait]
impl SecretSource for SecretsManagerSource {
    async fn resolve(&self) -> Result<ConnectionSecret, ProvisionError> {
        let resp = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_resource_not_found_exception() {
                        return ProvisionError::SecretResolution(format!(
                            "secret {} not found",
                            self.secret_id
                        ));
                    }
                }
                ProvisionError::SecretResolution(format!(
                    "failed to fetch secret {}: {e}",
                    self.secret_id
                ))
            })?;

        let value = resp.secret_string().ok_or_else(|| {
            ProvisionError::SecretResolution(format!(
                "secret {} is not stored as a string",
                self.secret_id
            ))
        })?;

        debug!(secret_id = %self.secret_id, "connection secret fetched");
        uri_from_secret_string(value, &self.uri_field)
    }
}

/// Serves a URI captured from the environment at start-up.
#[derive(Clone, Debug)]
pub struct EnvironmentSource {
    secret: ConnectionSecret,
}

impl EnvironmentSource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            secret: ConnectionSecret::new(uri),
        }
    }
}

#[async_trait]
impl SecretSource for EnvironmentSource {
    async fn resolve(&self) -> Result<ConnectionSecret, ProvisionError> {
        Ok(self.secret.clone())
    }
}

/// Build the [`SecretSource`] selected by `URI_SOURCE`.
///
/// # Errors
///
/// Returns an error if the variable required by the selected source is unset.
/// [`Config::from_env`] already checks this, so it only fires for hand-built
/// configurations.
pub fn from_config(
    cfg: &Config,
    client: aws_sdk_secretsmanager::Client,
) -> anyhow::Result<Arc<dyn SecretSource>> {
    match cfg.uri_source {
        UriSource::SecretsManager => {
            let secret_id = cfg
                .secret_id
                .clone()
                .ok_or_else(|| anyhow::anyhow!("SECRET_ID is required for URI_SOURCE=secrets_manager"))?;
            Ok(Arc::new(SecretsManagerSource::new(
                client,
                secret_id,
                cfg.secret_uri_field.clone(),
            )))
        }
        UriSource::Environment => {
            let uri = cfg
                .mongodb_uri
                .clone()
                .ok_or_else(|| anyhow::anyhow!("MONGODB_URI is required for URI_SOURCE=environment"))?;
            Ok(Arc::new(EnvironmentSource::new(uri)))
        }
    }
}

/// Extract `field` from a secret string holding a JSON object.
fn uri_from_secret_string(raw: &str, field: &str) -> Result<ConnectionSecret, ProvisionError> {
    let parsed: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
        ProvisionError::SecretResolution(format!("secret is not valid JSON: {e}"))
    })?;

    match parsed.get(field) {
        Some(serde_json::Value::String(uri)) if !uri.trim().is_empty() => {
            Ok(ConnectionSecret::new(uri.clone()))
        }
        Some(_) => Err(ProvisionError::SecretResolution(format!(
            "secret field {field} must be a non-empty string"
        ))),
        None => Err(ProvisionError::SecretResolution(format!(
            "secret has no {field} field"
        ))),
    }
}
