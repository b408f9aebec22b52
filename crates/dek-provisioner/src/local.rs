//! Local invocation: run the handler once against an event file.
//!
//! Enabled with `ENV=local`. A missing or malformed event file is an operator
//! error and fails start-up instead of producing an error envelope.

use std::path::Path;

use anyhow::{Context, Result};
use common::protocol::ResponseEnvelope;
use tracing::info;

use crate::dek::Provisioner;

/// Read the event at `path` and pass it to `provisioner`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub async fn run(path: &Path, provisioner: &Provisioner) -> Result<ResponseEnvelope> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read local event file {}", path.display()))?;

    let event: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("local event file {} is not valid JSON", path.display()))?;

    info!(path = %path.display(), "invoking handler with local event");
    Ok(provisioner.handle(event).await)
}
