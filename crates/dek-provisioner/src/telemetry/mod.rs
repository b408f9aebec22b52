//! Structured logging and optional OpenTelemetry span export.
//!
//! Logs are JSON lines on stdout, which Lambda forwards to CloudWatch. When
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set, spans are additionally exported via
//! OTLP/gRPC.
//!
//! # Telemetry invariants
//!
//! - **No connection URI, credential, or secret value** may appear in any span
//!   attribute or log field. KMS key ARNs, regions, and alternate names are
//!   not secret and may be logged.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::{init_telemetry, TelemetryGuard};
