//! DEK (Data Encryption Key) provisioning: the function's request handler.
//!
//! # Flow
//!
//! 1. Validate the request (`kmsKeyArn`, `kmsKeyRegion`, `dekAltName`).
//! 2. Resolve the connection secret via the configured [`SecretSource`].
//! 3. Open a new database connection via the [`KeyVaultBackend`].
//! 4. Resolve AWS credentials via the [`CredentialSource`].
//! 5. Create one data key in `encryption.__keyVault`, wrapped by the request's
//!    KMS key and tagged with its alternate name.
//! 6. Render the returned key id as a canonical UUID string.
//!
//! Each step short-circuits on failure. Every failure, whatever its kind, is
//! reported in a `statusCode = 200` envelope with `message: "error"`.
//!
//! # Invariants
//!
//! - The connection URI and AWS credentials are never logged.
//! - Key creation is not deduplicated: the same alternate name twice yields
//!   two key documents with two ids.
//!
//! [`SecretSource`]: crate::secrets::SecretSource
//! [`KeyVaultBackend`]: crate::vault::KeyVaultBackend
//! [`CredentialSource`]: crate::aws::CredentialSource

pub mod provisioner;

pub use provisioner::Provisioner;
