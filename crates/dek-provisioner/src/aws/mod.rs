//! AWS SDK initialisation for Secrets Manager and ambient credentials.
//!
//! The SDK configuration is loaded once per cold start. Credentials are
//! re-resolved on every invocation through the shared provider, which caches
//! and refreshes them internally.

pub mod clients;
pub mod credentials;

pub use clients::AwsClients;
pub use credentials::{AmbientCredentials, AwsCredentials, CredentialSource};
#[cfg(test)]
pub use credentials::MockCredentialSource;
