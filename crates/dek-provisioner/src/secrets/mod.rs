//! Resolution of the database connection secret.
//!
//! The URI either lives in a JSON secret in AWS Secrets Manager (fetched on
//! every invocation) or comes from `MONGODB_URI` at start-up. Which one is a
//! configuration choice; the handler only sees a [`SecretSource`].

pub mod sources;

pub use sources::from_config;

use async_trait::async_trait;
use common::ProvisionError;

/// Connection details for one invocation. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSecret {
    uri: String,
}

impl ConnectionSecret {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// The database connection URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Debug for ConnectionSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // URIs routinely embed credentials.
        f.write_str("ConnectionSecret([REDACTED])")
    }
}

/// Source of the connection secret.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Resolve the connection secret.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::SecretResolution`] if the secret cannot be
    /// fetched or does not contain a connection URI.
    async fn resolve(&self) -> Result<ConnectionSecret, ProvisionError>;
}
