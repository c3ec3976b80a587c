//! # rs-scale
//!
//! A four-cell weighing station for Raspberry Pi with a 16x2 character LCD
//! readout and optional webhook telemetry.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for the I2C write transport, load cell
//!   input, delays, and wall-clock time
//! - **4-bit LCD driver**: Full HD44780 initialization handshake and nibble
//!   protocol over a PCF8574 backpack
//! - **Calibrated weighing**: Per-cell linear calibration with graceful
//!   degradation when a channel dies
//! - **Telemetry**: Fixed-interval JSON reports POSTed to a webhook endpoint
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and network abstractions
//! - `lcd` - HD44780 protocol driver, generic over the bus transport
//! - `scale` - Calibration transform and four-channel aggregation
//! - `station` - Loop coordinator and webhook pacing
//! - `hal` - Concrete implementations (mock for testing, rpi for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_scale::hal::mock_lcd_bus;
//! use rs_scale::lcd::Lcd1602;
//!
//! // Bring the panel up in 4-bit mode and print a line
//! let (bus, delay, journal) = mock_lcd_bus();
//! let mut lcd = Lcd1602::initialize(0x27, bus, delay).unwrap();
//! lcd.print("Hello", 0, 0).unwrap();
//!
//! // Every write carried the backlight bit
//! assert!(journal.writes().iter().all(|(_, byte)| byte & 0b1000 != 0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Two-stage load cell calibration routines and the calibration file format.
pub mod calibration;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// HD44780 LCD driver speaking the 4-bit nibble protocol over I2C.
pub mod lcd;
/// Weight acquisition, calibration transform, and display formatting.
pub mod scale;
/// Station coordinator and webhook scheduling.
pub mod station;
/// Core traits for hardware and network abstraction.
pub mod traits;

/// Shared configuration system for desktop and the Pi.
pub mod config;

/// Telemetry report types for webhook delivery (serde-based).
#[cfg(feature = "json")]
pub mod messages;

/// Network services for webhook delivery (feature-gated).
#[cfg(feature = "webhook")]
pub mod services;

// Re-exports for convenience
pub use lcd::{ddram_address, Lcd1602, LCD_COLS, LCD_ROWS};
pub use scale::{format_weight, CellCalibration, Scale, ScaleReading, CELL_COUNT, CELL_NAMES};
pub use station::{WebhookScheduler, WeighStation};
pub use traits::{BusError, BusTransport, Clock, Delay, LoadCellInput, StationDisplay};

// Config re-exports
pub use config::{CellsConfig, Config, LcdConfig, StationConfig, WebhookConfig};

// Message re-exports (for webhook payloads)
#[cfg(feature = "json")]
pub use messages::{SensorWeight, WeightReport};

#[cfg(feature = "json")]
pub use traits::WebhookClient;
