//! Vehicle Telemetry
//!
//! Timestamped OBD readings, the bounded batches they are uploaded in, and
//! the collection side that fills those batches:
//! - `TelemetrySample`: one tick of optional sensor readings
//! - `TelemetryBatch`: at most 180 samples, order preserved
//! - `BatchCollector`: accumulates samples and cuts batches by size or window
//! - `Sampler`: polls an `ObdClient` once per tick

mod batch;
mod collector;
mod sample;
mod sampler;

pub use batch::{TelemetryBatch, MAX_BATCH_SAMPLES};
pub use collector::{BatchCollector, CollectorConfig, COLLECTION_WINDOW};
pub use sample::TelemetrySample;
pub use sampler::Sampler;

use thiserror::Error;

/// Telemetry errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Batch of {len} samples exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },
}
