//! `csfle-dek-provisioner` — Lambda entry point.
//!
//! Start-up sequence (once per execution context):
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise telemetry (JSON logs, optional OTLP spans).
//! 3. Load the ambient AWS configuration.
//! 4. Build the connection-secret source, credential source, and key vault.
//! 5. Either run one local invocation from `EVENT_PATH` (`ENV=local`) or
//!    hand the [`Provisioner`] to the Lambda runtime.

mod aws;
mod config;
mod dek;
mod local;
mod secrets;
mod telemetry;
mod vault;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use common::protocol::ResponseEnvelope;
use lambda_runtime::{service_fn, LambdaEvent};
use tracing::{info, info_span, Instrument};

use aws::{AmbientCredentials, AwsClients};
use config::Config;
use dek::Provisioner;
use vault::MongoKeyVault;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    let _telemetry =
        telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        uri_source = ?cfg.uri_source,
        local = cfg.is_local(),
        "csfle-dek-provisioner starting"
    );

    // -----------------------------------------------------------------------
    // 3. AWS clients
    // -----------------------------------------------------------------------
    let aws = AwsClients::init().await;

    // -----------------------------------------------------------------------
    // 4. Collaborators
    // -----------------------------------------------------------------------
    let provisioner = Provisioner::new(
        secrets::from_config(&cfg, aws.secretsmanager.clone())?,
        Arc::new(AmbientCredentials::new(aws.credentials.clone())),
        Arc::new(MongoKeyVault),
    );

    // -----------------------------------------------------------------------
    // 5. Invocation loop
    // -----------------------------------------------------------------------
    if cfg.is_local() {
        let envelope = local::run(Path::new(&cfg.event_path), &provisioner).await?;
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    let provisioner = &provisioner;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<serde_json::Value>| async move {
        handle_event(provisioner, event).await
    }))
    .await
    .map_err(|e| anyhow::anyhow!("lambda runtime terminated: {e}"))
}

/// Lambda service function. Always succeeds; failures live in the envelope.
async fn handle_event(
    provisioner: &Provisioner,
    event: LambdaEvent<serde_json::Value>,
) -> Result<ResponseEnvelope, lambda_runtime::Error> {
    let LambdaEvent {
        payload, context, ..
    } = event;
    let span = info_span!("invocation", request_id = %context.request_id);
    Ok(provisioner.handle(payload).instrument(span).await)
}
