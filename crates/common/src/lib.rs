//! Common types, protocol definitions, and errors shared across `csfle-dek-provisioner` crates.

pub mod error;
pub mod protocol;

pub use error::ProvisionError;
