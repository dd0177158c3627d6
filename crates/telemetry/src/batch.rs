//! Bounded Telemetry Batch

use crate::sample::TelemetrySample;
use crate::TelemetryError;
use serde::{Deserialize, Serialize};

/// Maximum samples per upload (3-minute window at 1 Hz)
pub const MAX_BATCH_SAMPLES: usize = 180;

/// Ordered group of at most `MAX_BATCH_SAMPLES` samples sent in one upload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TelemetrySample>", into = "Vec<TelemetrySample>")]
pub struct TelemetryBatch {
    pub(crate) samples: Vec<TelemetrySample>,
}

impl TelemetryBatch {
    /// Check that `len` samples fit in one batch
    pub fn check_len(len: usize) -> Result<(), TelemetryError> {
        if len > MAX_BATCH_SAMPLES {
            return Err(TelemetryError::BatchTooLarge {
                len,
                max: MAX_BATCH_SAMPLES,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<TelemetrySample> {
        self.samples
    }
}

impl TryFrom<Vec<TelemetrySample>> for TelemetryBatch {
    type Error = TelemetryError;

    fn try_from(samples: Vec<TelemetrySample>) -> Result<Self, Self::Error> {
        Self::check_len(samples.len())?;
        Ok(Self { samples })
    }
}

impl From<TelemetryBatch> for Vec<TelemetrySample> {
    fn from(batch: TelemetryBatch) -> Self {
        batch.samples
    }
}

impl AsRef<[TelemetrySample]> for TelemetryBatch {
    fn as_ref(&self) -> &[TelemetrySample] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn samples(n: usize) -> Vec<TelemetrySample> {
        let vehicle = Uuid::new_v4();
        (0..n).map(|_| TelemetrySample::now(vehicle)).collect()
    }

    #[test]
    fn test_bounds() {
        assert!(TelemetryBatch::try_from(samples(0)).unwrap().is_empty());
        assert_eq!(TelemetryBatch::try_from(samples(180)).unwrap().len(), 180);

        let err = TelemetryBatch::try_from(samples(181)).unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::BatchTooLarge { len: 181, max: 180 }
        ));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let batch = TelemetryBatch::try_from(samples(2)).unwrap();
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_deserialize_rejects_oversized_array() {
        let json = serde_json::to_string(&samples(181)).unwrap();
        assert!(serde_json::from_str::<TelemetryBatch>(&json).is_err());
    }
}
