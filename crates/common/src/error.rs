//! Common error types shared across crates.

use thiserror::Error;

/// Every way a single DEK provisioning invocation can fail.
///
/// All variants are flattened into the same failure envelope by the handler;
/// the variant only influences the `error` text and the `error.kind` log field.
/// The transport status stays 200 regardless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// A required request field is absent or empty, or the event is not a JSON object.
    #[error("validation error: {0}")]
    Validation(String),

    /// The connection secret could not be fetched or parsed.
    #[error("secret resolution error: {0}")]
    SecretResolution(String),

    /// The database connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// AWS credentials could not be resolved from the ambient provider chain.
    #[error("credential error: {0}")]
    Credential(String),

    /// Building the key-management client or creating the data key failed.
    #[error("key creation error: {0}")]
    KeyCreation(String),
}

impl ProvisionError {
    /// Stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ProvisionError::Validation(_) => "validation",
            ProvisionError::SecretResolution(_) => "secret_resolution",
            ProvisionError::Connection(_) => "connection",
            ProvisionError::Credential(_) => "credential",
            ProvisionError::KeyCreation(_) => "key_creation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            ProvisionError::Validation("x".into()).kind(),
            ProvisionError::SecretResolution("x".into()).kind(),
            ProvisionError::Connection("x".into()).kind(),
            ProvisionError::Credential("x".into()).kind(),
            ProvisionError::KeyCreation("x".into()).kind(),
        ];
        let mut dedup = kinds.to_vec();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), kinds.len());
    }

    #[test]
    fn display_includes_detail() {
        let e = ProvisionError::Connection("server selection timeout".into());
        let text = e.to_string();
        assert!(text.starts_with("connection error"));
        assert!(text.contains("server selection timeout"));
    }
}
