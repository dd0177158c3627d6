//! Telemetry Batch Uploader

use crate::client::ApiClient;
use crate::error::ApiError;
use std::time::Instant;
use telemetry::{TelemetryBatch, TelemetrySample};
use tracing::{error, info};

/// Sends batches to `POST /telemetry/batch`, one request per call
#[derive(Debug, Clone)]
pub struct TelemetryUploader {
    api: ApiClient,
}

impl TelemetryUploader {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload `samples` verbatim as a JSON array
    ///
    /// Resolves once the backend answers 2xx. Sequences longer than
    /// `MAX_BATCH_SAMPLES` are rejected without touching the network.
    pub async fn upload_batch(&self, samples: &[TelemetrySample]) -> Result<(), ApiError> {
        if let Err(e) = TelemetryBatch::check_len(samples.len()) {
            error!("upload_batch rejected: {}", e);
            return Err(e.into());
        }

        let url = self.api.endpoint("telemetry/batch")?;
        let started = Instant::now();
        self.api
            .send(self.api.http().post(url).json(samples), "upload_batch")
            .await?;

        metrics::counter!("telemetry_batches_uploaded_total").increment(1);
        metrics::counter!("telemetry_samples_uploaded_total").increment(samples.len() as u64);
        metrics::histogram!("telemetry_batch_upload_seconds")
            .record(started.elapsed().as_secs_f64());
        info!(
            "Uploaded batch of {} samples in {:?}",
            samples.len(),
            started.elapsed()
        );
        Ok(())
    }

    /// Upload a collected batch
    pub async fn upload(&self, batch: &TelemetryBatch) -> Result<(), ApiError> {
        self.upload_batch(batch.samples()).await
    }
}
