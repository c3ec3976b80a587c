//! Network abstraction for webhook telemetry.
//!
//! The station optionally pushes each reading to a configurable HTTP
//! endpoint on an interval. This trait is the seam between the polling loop
//! and the concrete client, so the loop can be exercised with a mock.
//!
//! # Payload
//!
//! ```json
//! {
//!   "timestamp": "2024-05-01T12:30:00",
//!   "total_weight_grams": 4821.55,
//!   "total_weight_kg": 4.822,
//!   "sensors": [
//!     {"sensor": "sensor_1", "weight_grams": 1204.12},
//!     {"sensor": "sensor_2", "weight_grams": 1206.01},
//!     {"sensor": "sensor_3", "weight_grams": 1201.87},
//!     {"sensor": "sensor_4", "weight_grams": 1209.55}
//!   ],
//!   "device_id": "pi_zero_scale_001"
//! }
//! ```

use crate::messages::WeightReport;

/// Webhook client trait for pushing weight reports.
///
/// A single blocking POST per call. The station never retries a failed
/// delivery; a dropped report is not safety-critical and the next interval
/// sends a fresh one.
pub trait WebhookClient {
    /// Error type for delivery failures (timeouts, transport faults).
    type Error;

    /// Deliver one report, returning the HTTP status code.
    ///
    /// A non-2xx status is returned as `Ok(status)` so the caller can log
    /// it; only transport-level failures produce `Err`.
    fn send_report(&mut self, report: &WeightReport) -> Result<u16, Self::Error>;
}
