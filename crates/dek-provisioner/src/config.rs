//! Configuration loading and validation for the DEK provisioning function.
//!
//! All values are read from environment variables once per cold start. The
//! process exits with a clear error message if any required variable is
//! missing or invalid for the selected connection-URI source.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Where the database connection URI comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UriSource {
    /// JSON secret in AWS Secrets Manager, fetched on every invocation.
    SecretsManager,
    /// `MONGODB_URI` environment variable, read at start-up.
    Environment,
}

/// Validated function configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Execution mode. `local` runs a single invocation from [`Config::event_path`].
    #[serde(default)]
    pub env: Option<String>,

    /// Source of the connection URI.
    #[serde(default = "default_uri_source")]
    pub uri_source: UriSource,

    /// Secrets Manager secret id or ARN. **Required** for `secrets_manager`.
    #[serde(default)]
    pub secret_id: Option<String>,

    /// Field of the secret's JSON object that holds the connection URI.
    #[serde(default = "default_secret_uri_field")]
    pub secret_uri_field: String,

    /// Connection URI. **Required** for `environment`.
    #[serde(default)]
    pub mongodb_uri: Option<String>,

    /// Event file read in local mode.
    #[serde(default = "default_event_path")]
    pub event_path: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_uri_source() -> UriSource {
    UriSource::SecretsManager
}
fn default_secret_uri_field() -> String {
    "MONGODB_URI".into()
}
fn default_event_path() -> String {
    "event.json".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// `true` when `ENV=local`.
    pub fn is_local(&self) -> bool {
        self.env
            .as_deref()
            .is_some_and(|e| e.trim().eq_ignore_ascii_case("local"))
    }

    fn validate(&self) -> Result<()> {
        match self.uri_source {
            UriSource::SecretsManager => {
                ensure_set(self.secret_id.as_deref(), "SECRET_ID")?;
                ensure_set(Some(&self.secret_uri_field), "SECRET_URI_FIELD")?;
            }
            UriSource::Environment => ensure_set(self.mongodb_uri.as_deref(), "MONGODB_URI")?,
        }
        if self.is_local() {
            ensure_set(Some(&self.event_path), "EVENT_PATH")?;
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_set(Some(endpoint), "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        Ok(())
    }
}

fn ensure_set(value: Option<&str>, name: &str) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => anyhow::bail!("{name} is required and must not be empty"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            env: None,
            uri_source: default_uri_source(),
            secret_id: Some("prod/csfle/mongodb".into()),
            secret_uri_field: default_secret_uri_field(),
            mongodb_uri: None,
            event_path: default_event_path(),
            log_level: default_log_level(),
            otel_exporter_otlp_endpoint: None,
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_uri_source(), UriSource::SecretsManager);
        assert_eq!(default_secret_uri_field(), "MONGODB_URI");
        assert_eq!(default_event_path(), "event.json");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn secrets_manager_requires_secret_id() {
        let cfg = Config {
            secret_id: None,
            ..base()
        };
        assert!(cfg.validate().is_err());
        assert!(base().validate().is_ok());
    }

    #[test]
    fn environment_source_requires_uri() {
        let cfg = Config {
            uri_source: UriSource::Environment,
            secret_id: None,
            ..base()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("MONGODB_URI"));

        let cfg = Config {
            uri_source: UriSource::Environment,
            secret_id: None,
            mongodb_uri: Some("mongodb://localhost:27017".into()),
            ..base()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn blank_otlp_endpoint_rejected() {
        let cfg = Config {
            otel_exporter_otlp_endpoint: Some(" ".into()),
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn local_mode_detection() {
        assert!(!base().is_local());
        let cfg = Config {
            env: Some("LOCAL".into()),
            ..base()
        };
        assert!(cfg.is_local());
        let cfg = Config {
            env: Some("prod".into()),
            ..base()
        };
        assert!(!cfg.is_local());
    }

    #[test]
    fn uri_source_deserialises_from_snake_case() {
        let s: UriSource = serde_json::from_str("\"environment\"").unwrap();
        assert_eq!(s, UriSource::Environment);
        let s: UriSource = serde_json::from_str("\"secrets_manager\"").unwrap();
        assert_eq!(s, UriSource::SecretsManager);
    }
}
