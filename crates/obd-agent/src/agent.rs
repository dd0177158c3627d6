//! Sampling and upload loop

use crate::settings::AgentConfig;
use crate::AgentError;
use obd_protocol::ObdClient;
use std::future::Future;
use std::time::Duration;
use telemetry::{BatchCollector, Sampler, TelemetryBatch};
use telemetry_client::{ApiClient, ConnectionTracker, TelemetryUploader};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Counters reported when the agent stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentStats {
    pub samples: u64,
    pub sample_failures: u64,
    pub batches_uploaded: u64,
    /// Batches lost to a failed upload
    pub batches_dropped: u64,
}

/// Background telemetry agent
pub struct Agent {
    sampler: Sampler,
    collector: BatchCollector,
    uploader: TelemetryUploader,
    tracker: ConnectionTracker,
    interval: Duration,
    stats: AgentStats,
}

impl Agent {
    pub fn new(
        sampler: Sampler,
        collector: BatchCollector,
        api: &ApiClient,
        interval: Duration,
    ) -> Self {
        Self {
            sampler,
            collector,
            uploader: api.uploader(),
            tracker: api.tracker(),
            interval,
            stats: AgentStats::default(),
        }
    }

    /// Connect the adapter and API client described by `config`
    pub async fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let mut client = if config.obd.mock {
            ObdClient::mock()
        } else {
            ObdClient::open(&config.obd.device).await?
        };
        client.set_timeout(Duration::from_millis(config.obd.timeout_ms));
        client.initialize().await?;

        let api = ApiClient::new(&config.api)?;
        info!(
            "Agent for vehicle {} uploading to {}",
            config.vehicle_id,
            api.base_url()
        );

        Ok(Self::new(
            Sampler::new(client, config.vehicle_id),
            BatchCollector::new(config.batch.collector()),
            &api,
            config.batch.sample_interval(),
        ))
    }

    pub fn vehicle_id(&self) -> Uuid {
        self.sampler.vehicle_id()
    }

    pub fn stats(&self) -> AgentStats {
        self.stats
    }

    /// Sample until `shutdown` resolves, then flush and disconnect
    pub async fn run<F>(&mut self, shutdown: F) -> AgentStats
    where
        F: Future<Output = ()>,
    {
        info!("Sampling every {:?}", self.interval);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => self.tick().await,
            }
        }

        self.shutdown().await;
        info!("Agent stopped: {:?}", self.stats);
        self.stats
    }

    async fn tick(&mut self) {
        match self.sampler.sample().await {
            Ok(sample) => {
                self.stats.samples += 1;
                if let Some(batch) = self.collector.push(sample) {
                    self.upload(batch).await;
                }
            }
            Err(e) => {
                self.stats.sample_failures += 1;
                metrics::counter!("telemetry_sample_failures_total").increment(1);
                warn!("Sample failed: {}", e);
            }
        }
    }

    /// Upload once; a failed batch is dropped
    async fn upload(&mut self, batch: TelemetryBatch) {
        match self.uploader.upload(&batch).await {
            Ok(()) => self.stats.batches_uploaded += 1,
            Err(e) => {
                self.stats.batches_dropped += 1;
                metrics::counter!("telemetry_batches_dropped_total").increment(1);
                error!("Dropping batch of {} samples: {}", batch.len(), e);
            }
        }
    }

    async fn shutdown(&mut self) {
        info!("Shutting down agent");
        if let Some(batch) = self.collector.flush() {
            self.upload(batch).await;
        }

        let vehicle_id = self.vehicle_id();
        if let Err(e) = self.tracker.disconnect(vehicle_id).await {
            warn!("Could not report disconnect for {}: {}", vehicle_id, e);
        }

        self.sampler.client_mut().disconnect().await;
    }
}
