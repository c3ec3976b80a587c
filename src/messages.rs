//! Telemetry report types for webhook delivery.
//!
//! A [`WeightReport`] is the JSON document POSTed to the configured
//! endpoint. The wire shape is fixed; receivers key on these field names:
//!
//! ```json
//! {
//!   "timestamp": "2024-06-01T12:30:00",
//!   "total_weight_grams": 4821.53,
//!   "total_weight_kg": 4.822,
//!   "sensors": [
//!     { "sensor": "sensor_1", "weight_grams": 1205.38 }
//!   ],
//!   "device_id": "pi_zero_scale_001"
//! }
//! ```

use crate::scale::ScaleReading;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// One channel's contribution to a report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorWeight {
    /// Channel label, `sensor_1` through `sensor_4`.
    pub sensor: String,
    /// Calibrated weight, rounded to hundredths of a gram.
    pub weight_grams: f64,
}

/// The full telemetry document sent per transmission interval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightReport {
    /// Local time of the reading, `%Y-%m-%dT%H:%M:%S`.
    pub timestamp: String,
    /// Platform total in grams, rounded to hundredths.
    pub total_weight_grams: f64,
    /// Platform total in kilograms, rounded to thousandths.
    pub total_weight_kg: f64,
    /// Per-channel weights in channel order.
    pub sensors: Vec<SensorWeight>,
    /// Stable identifier for this station.
    pub device_id: String,
}

impl WeightReport {
    /// Builds a report from a scale snapshot.
    ///
    /// Failed channels already read as `0.0` in the snapshot and are
    /// reported as such.
    pub fn from_reading(reading: &ScaleReading, timestamp: String, device_id: &str) -> Self {
        let sensors = reading
            .cells
            .iter()
            .enumerate()
            .map(|(i, grams)| SensorWeight {
                sensor: format!("sensor_{}", i + 1),
                weight_grams: round_to(*grams, 100.0),
            })
            .collect();

        Self {
            timestamp,
            total_weight_grams: round_to(reading.total_grams, 100.0),
            total_weight_kg: round_to(reading.total_grams / 1000.0, 1000.0),
            sensors,
            device_id: device_id.into(),
        }
    }
}

fn round_to(value: f64, places: f64) -> f64 {
    (value * places).round() / places
}
