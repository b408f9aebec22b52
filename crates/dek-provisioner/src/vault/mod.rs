//! Key-vault access: database connection and CSFLE data key creation.
//!
//! The handler talks to two seams:
//! 1. [`KeyVaultBackend::connect`] opens a fresh, verified database connection.
//! 2. [`KeyVaultSession::create_data_key`] builds the key-management client
//!    over that connection and inserts one new key document.
//!
//! Nothing is cached between invocations; every call to `connect` yields a
//! new session.

pub mod mongo;

pub use mongo::MongoKeyVault;

use async_trait::async_trait;
use common::protocol::MasterKeyDescriptor;
use common::ProvisionError;

use crate::aws::AwsCredentials;
use crate::secrets::ConnectionSecret;

/// KMS provider name recorded on every key this function creates.
pub const KMS_PROVIDER: &str = "aws";

/// `<database>.<collection>` holding the wrapped data keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVaultNamespace {
    pub db: &'static str,
    pub coll: &'static str,
}

/// The fixed key vault: `encryption.__keyVault`.
pub const KEY_VAULT_NAMESPACE: KeyVaultNamespace = KeyVaultNamespace {
    db: "encryption",
    coll: "__keyVault",
};

impl std::fmt::Display for KeyVaultNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.db, self.coll)
    }
}

/// Opens database connections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyVaultBackend: Send + Sync {
    /// Connect to the database named by `secret`.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Connection`] if the URI is invalid or the
    /// server cannot be reached.
    async fn connect(
        &self,
        secret: &ConnectionSecret,
    ) -> Result<Box<dyn KeyVaultSession>, ProvisionError>;
}

/// A live connection able to create data keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyVaultSession: Send + Sync {
    /// Create one data key wrapped by `master_key` and return its raw id bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::KeyCreation`] if the key-management client
    /// cannot be built or the wrap/insert fails.
    async fn create_data_key(
        &self,
        namespace: &KeyVaultNamespace,
        credentials: &AwsCredentials,
        master_key: &MasterKeyDescriptor,
        alt_names: &[String],
    ) -> Result<Vec<u8>, ProvisionError>;
}
