//! Trait definitions for hardware abstraction, display rendering, and telemetry.
//!
//! This module defines the core abstractions that allow rs-scale to:
//! - Run on different hardware (Raspberry Pi, desktop mock)
//! - Render readings to different displays
//! - Deliver telemetry through different clients
//!
//! # Submodules
//!
//! - `hardware`: Bus transport, load cell input, delay, clock
//! - `display`: Weight readout rendering trait
//! - `network`: Webhook client trait (requires the `json` feature)
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`BusTransport`]: single-byte register writes on the I2C bus
//! - [`LoadCellInput`]: raw HX711 channel readings
//! - [`Delay`]: blocking microsecond delays for protocol timing
//! - [`Clock`]: monotonic time for interval scheduling

pub mod display;
pub mod hardware;

#[cfg(feature = "json")]
pub mod network;

pub use display::*;
pub use hardware::*;

#[cfg(feature = "json")]
pub use network::*;
