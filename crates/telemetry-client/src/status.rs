//! Connection Status Tracker

use crate::client::ApiClient;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

/// Backend view of a vehicle's connection
///
/// Decoded leniently: missing fields take their defaults and anything the
/// backend adds is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<Uuid>,
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_batch_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reads and clears per-vehicle connection state on the backend
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    api: ApiClient,
}

impl ConnectionTracker {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /telemetry/status/{vehicleId}`
    pub async fn connection_status(&self, vehicle_id: Uuid) -> Result<ConnectionStatus, ApiError> {
        let url = self
            .api
            .endpoint(&format!("telemetry/status/{vehicle_id}"))?;
        let response = self
            .api
            .send(self.api.http().get(url), "connection_status")
            .await?;

        let body = response.bytes().await.map_err(|e| {
            error!("connection_status body read failed: {}", e);
            ApiError::Transport(e)
        })?;
        serde_json::from_slice(&body).map_err(|e| {
            error!("connection_status payload not understood: {}", e);
            ApiError::Decode(e.to_string())
        })
    }

    /// `POST /telemetry/status/{vehicleId}/disconnect` with no body
    pub async fn disconnect(&self, vehicle_id: Uuid) -> Result<(), ApiError> {
        let url = self
            .api
            .endpoint(&format!("telemetry/status/{vehicle_id}/disconnect"))?;
        self.api
            .send(self.api.http().post(url), "disconnect")
            .await?;
        info!("Vehicle {} marked disconnected", vehicle_id);
        Ok(())
    }
}
