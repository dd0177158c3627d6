//! OBD-II Error Types

use thiserror::Error;

/// Errors that can occur during OBD-II communication
#[derive(Debug, Error)]
pub enum ObdError {
    /// Adapter stream could not be opened, read or written
    #[error("Adapter I/O error: {0}")]
    Io(String),

    /// Timeout waiting for response
    #[error("Timeout waiting for OBD response after {0}ms")]
    Timeout(u64),

    /// Invalid response from adapter
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// PID not supported by vehicle
    #[error("PID {0:02X} not supported by vehicle")]
    PidNotSupported(u8),

    /// Adapter closed the stream or never answered initialization
    #[error("OBD adapter not responding")]
    AdapterNotResponding,

    /// Query issued before `initialize` or after `disconnect`
    #[error("Vehicle ignition is off or not connected")]
    VehicleNotConnected,
}

impl ObdError {
    /// Whether the failure only affects the PID that was queried.
    ///
    /// Such failures leave the field absent for this tick; anything else
    /// means the adapter itself is unusable.
    pub fn is_per_pid(&self) -> bool {
        matches!(
            self,
            ObdError::PidNotSupported(_) | ObdError::Timeout(_) | ObdError::InvalidResponse(_)
        )
    }
}

impl From<std::io::Error> for ObdError {
    fn from(err: std::io::Error) -> Self {
        ObdError::Io(err.to_string())
    }
}
