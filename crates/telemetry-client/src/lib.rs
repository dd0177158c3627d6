//! Telemetry Backend Client
//!
//! Thin request/response wrappers over the telemetry ingestion API:
//! - `POST /telemetry/batch` uploads one batch of samples
//! - `GET /telemetry/status/{vehicleId}` reads connection status
//! - `POST /telemetry/status/{vehicleId}/disconnect` requests disconnection
//!
//! Every call is a single round trip with a fixed 10 s timeout. Failures are
//! logged and handed back to the caller unchanged; nothing is retried.

mod client;
mod config;
mod error;
mod status;
mod uploader;

pub use client::ApiClient;
pub use config::{ClientConfig, REQUEST_TIMEOUT};
pub use error::ApiError;
pub use status::{ConnectionStatus, ConnectionTracker};
pub use uploader::TelemetryUploader;
