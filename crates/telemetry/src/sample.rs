//! Telemetry Sample

use chrono::{DateTime, Utc};
use obd_protocol::{Pid, PidResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One timestamped reading of vehicle sensor values
///
/// Every reading is optional: `None` means the value was not sampled this
/// tick, and it is left out of the serialized form rather than sent as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub timestamp: DateTime<Utc>,
    pub vehicle_id: Uuid,
    /// Engine speed (rpm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<f64>,
    /// Vehicle speed (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Control module voltage (V)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_voltage: Option<f64>,
    /// Coolant temperature (°C)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coolant_temp: Option<f64>,
    /// Calculated engine load (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_load: Option<f64>,
    /// Short-term fuel trim bank 1 (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_fuel_trim: Option<f64>,
    /// Long-term fuel trim bank 1 (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_fuel_trim: Option<f64>,
}

impl TelemetrySample {
    /// Create a sample with no readings
    pub fn new(vehicle_id: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            vehicle_id,
            rpm: None,
            speed: None,
            battery_voltage: None,
            coolant_temp: None,
            engine_load: None,
            short_fuel_trim: None,
            long_fuel_trim: None,
        }
    }

    /// Create a sample stamped with the current time
    pub fn now(vehicle_id: Uuid) -> Self {
        Self::new(vehicle_id, Utc::now())
    }

    pub fn with_rpm(mut self, rpm: f64) -> Self {
        self.rpm = Some(rpm);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_battery_voltage(mut self, volts: f64) -> Self {
        self.battery_voltage = Some(volts);
        self
    }

    pub fn with_coolant_temp(mut self, celsius: f64) -> Self {
        self.coolant_temp = Some(celsius);
        self
    }

    pub fn with_engine_load(mut self, percent: f64) -> Self {
        self.engine_load = Some(percent);
        self
    }

    /// Record a decoded PID value in its field
    pub fn apply(&mut self, response: &PidResponse) {
        let slot = match response.pid {
            Pid::Rpm => &mut self.rpm,
            Pid::Speed => &mut self.speed,
            Pid::ControlModuleVoltage => &mut self.battery_voltage,
            Pid::CoolantTemp => &mut self.coolant_temp,
            Pid::EngineLoad => &mut self.engine_load,
            Pid::ShortFuelTrim => &mut self.short_fuel_trim,
            Pid::LongFuelTrim => &mut self.long_fuel_trim,
        };
        *slot = Some(response.value);
    }

    /// Number of readings present
    pub fn reading_count(&self) -> usize {
        [
            self.rpm,
            self.speed,
            self.battery_voltage,
            self.coolant_temp,
            self.engine_load,
            self.short_fuel_trim,
            self.long_fuel_trim,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }

    /// Whether no reading was taken this tick
    pub fn is_empty(&self) -> bool {
        self.reading_count() == 0
    }
}
