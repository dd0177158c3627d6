//! Batch Collector
//!
//! Accumulates samples in arrival order and cuts a batch when it holds
//! `max_samples` or when a new sample falls outside the collection window
//! opened by the first pending sample.

use crate::batch::{TelemetryBatch, MAX_BATCH_SAMPLES};
use crate::sample::TelemetrySample;
use std::time::Duration;
use tracing::{debug, warn};

/// Default collection window (3 minutes)
pub const COLLECTION_WINDOW: Duration = Duration::from_secs(180);

/// Collector configuration
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Samples per batch, clamped to `1..=MAX_BATCH_SAMPLES`
    pub max_samples: usize,
    /// Longest span between the first and last sample of a batch
    pub window: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_samples: MAX_BATCH_SAMPLES,
            window: COLLECTION_WINDOW,
        }
    }
}

/// Client-side sample buffer feeding the uploader
pub struct BatchCollector {
    config: CollectorConfig,
    pending: Vec<TelemetrySample>,
}

impl BatchCollector {
    pub fn new(mut config: CollectorConfig) -> Self {
        let clamped = config.max_samples.clamp(1, MAX_BATCH_SAMPLES);
        if clamped != config.max_samples {
            warn!(
                "Batch size {} out of range, using {}",
                config.max_samples, clamped
            );
            config.max_samples = clamped;
        }
        Self {
            pending: Vec::with_capacity(config.max_samples),
            config,
        }
    }

    /// Add a sample, returning a batch if one is ready
    ///
    /// A sample outside the current window closes the pending batch and
    /// opens the next one.
    pub fn push(&mut self, sample: TelemetrySample) -> Option<TelemetryBatch> {
        let mut ready = None;

        if let Some(first) = self.pending.first() {
            let span = sample.timestamp.signed_duration_since(first.timestamp);
            let window = chrono::Duration::milliseconds(
                self.config.window.as_millis().min(i64::MAX as u128) as i64,
            );
            if span >= window {
                debug!("Collection window elapsed after {} samples", self.pending.len());
                ready = self.take();
            }
        }

        self.pending.push(sample);

        if ready.is_none() && self.pending.len() >= self.config.max_samples {
            debug!("Batch full at {} samples", self.pending.len());
            ready = self.take();
        }

        ready
    }

    /// Drain whatever is pending into a (possibly short) batch
    pub fn flush(&mut self) -> Option<TelemetryBatch> {
        self.take()
    }

    /// Samples waiting for the next batch
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    fn take(&mut self) -> Option<TelemetryBatch> {
        if self.pending.is_empty() {
            return None;
        }
        let samples = std::mem::replace(
            &mut self.pending,
            Vec::with_capacity(self.config.max_samples),
        );
        Some(TelemetryBatch { samples })
    }
}

impl Default for BatchCollector {
    fn default() -> Self {
        Self::new(CollectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_790_000_000 + secs, 0).unwrap()
    }

    fn sample(vehicle: Uuid, secs: i64) -> TelemetrySample {
        TelemetrySample::new(vehicle, at(secs)).with_rpm(secs as f64)
    }

    #[test]
    fn test_cuts_full_batch_at_180() {
        let vehicle = Uuid::new_v4();
        let mut collector = BatchCollector::default();

        for i in 0..179 {
            assert!(collector.push(sample(vehicle, i)).is_none());
        }
        let batch = collector.push(sample(vehicle, 179)).unwrap();
        assert_eq!(batch.len(), 180);
        assert_eq!(batch.samples()[0].rpm, Some(0.0));
        assert_eq!(batch.samples()[179].rpm, Some(179.0));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_window_closes_sparse_batch() {
        let vehicle = Uuid::new_v4();
        let mut collector = BatchCollector::default();

        assert!(collector.push(sample(vehicle, 0)).is_none());
        assert!(collector.push(sample(vehicle, 90)).is_none());
        let batch = collector.push(sample(vehicle, 180)).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_flush_partial() {
        let vehicle = Uuid::new_v4();
        let mut collector = BatchCollector::default();
        assert!(collector.flush().is_none());

        collector.push(sample(vehicle, 0));
        collector.push(sample(vehicle, 1));
        assert_eq!(collector.flush().map(|b| b.len()), Some(2));
        assert!(collector.flush().is_none());
    }

    #[test]
    fn test_max_samples_clamped() {
        let collector = BatchCollector::new(CollectorConfig {
            max_samples: 500,
            ..Default::default()
        });
        assert_eq!(collector.config().max_samples, MAX_BATCH_SAMPLES);

        let collector = BatchCollector::new(CollectorConfig {
            max_samples: 0,
            ..Default::default()
        });
        assert_eq!(collector.config().max_samples, 1);
    }

    proptest! {
        #[test]
        fn prop_batches_bounded_and_ordered(
            gaps in proptest::collection::vec(0i64..120, 0..600),
            max_samples in 1usize..=180,
        ) {
            let vehicle = Uuid::new_v4();
            let mut collector = BatchCollector::new(CollectorConfig {
                max_samples,
                window: COLLECTION_WINDOW,
            });

            let mut secs = 0;
            let mut input = Vec::new();
            let mut output = Vec::new();
            for gap in gaps {
                secs += gap;
                let s = sample(vehicle, secs);
                input.push(s.clone());
                if let Some(batch) = collector.push(s) {
                    prop_assert!(batch.len() <= max_samples);
                    let span = batch.samples().last().unwrap().timestamp
                        - batch.samples()[0].timestamp;
                    prop_assert!(span < chrono::Duration::seconds(180));
                    output.extend(batch.into_samples());
                }
            }
            if let Some(batch) = collector.flush() {
                output.extend(batch.into_samples());
            }

            prop_assert_eq!(input, output);
        }
    }
}
