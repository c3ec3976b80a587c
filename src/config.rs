//! Shared configuration system for desktop and the Pi.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_scale::config::{Config, LcdConfig, WebhookConfig};
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_lcd(LcdConfig::default().with_address(0x3F))
//!     .with_webhook(
//!         WebhookConfig::default()
//!             .with_url("https://example.com/api/weight")
//!             .with_enabled(true),
//!     );
//! ```

use crate::scale::{CellCalibration, CELL_COUNT};
use heapless::String as HString;

/// Maximum length for short config strings (device IDs, file names)
pub const MAX_SHORT_STRING: usize = 64;

/// Maximum length for longer config strings (URLs, paths)
pub const MAX_LONG_STRING: usize = 128;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for longer config strings
pub type LongString = HString<MAX_LONG_STRING>;

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    // Take only what fits
    let take = s.len().min(MAX_SHORT_STRING);
    // Find valid UTF-8 boundary
    let valid_end = s
        .char_indices()
        .take_while(|(i, _)| *i < take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

/// Create a LongString from a &str, truncating if too long
pub fn long_string(s: &str) -> LongString {
    let mut hs = LongString::new();
    let take = s.len().min(MAX_LONG_STRING);
    let valid_end = s
        .char_indices()
        .take_while(|(i, _)| *i < take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// LCD display configuration
    pub lcd: LcdConfig,
    /// Load cell channel configuration
    pub cells: CellsConfig,
    /// Webhook telemetry configuration
    pub webhook: WebhookConfig,
    /// Polling loop configuration
    pub station: StationConfig,
}

impl Config {
    /// Set LCD configuration
    pub fn with_lcd(mut self, lcd: LcdConfig) -> Self {
        self.lcd = lcd;
        self
    }

    /// Set load cell configuration
    pub fn with_cells(mut self, cells: CellsConfig) -> Self {
        self.cells = cells;
        self
    }

    /// Set webhook configuration
    pub fn with_webhook(mut self, webhook: WebhookConfig) -> Self {
        self.webhook = webhook;
        self
    }

    /// Set station loop configuration
    pub fn with_station(mut self, station: StationConfig) -> Self {
        self.station = station;
        self
    }
}

// ============================================================================
// LCD Config
// ============================================================================

/// LCD display configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LcdConfig {
    /// I2C address of the PCF8574 backpack
    pub address: u8,
    /// Hardware I2C bus number
    pub i2c_bus: u8,
    /// Whether to attach a display at all
    pub enabled: bool,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            address: 0x27,
            i2c_bus: 1,
            enabled: true,
        }
    }
}

impl LcdConfig {
    /// Set the backpack I2C address (common alternates: 0x27, 0x3F)
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the I2C bus number
    pub fn with_i2c_bus(mut self, bus: u8) -> Self {
        self.i2c_bus = bus;
        self
    }

    /// Enable or disable the display
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ============================================================================
// Load Cell Config
// ============================================================================

/// Load cell channel configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellsConfig {
    /// (DOUT, SCK) GPIO pairs in channel order
    pub pins: [(u8, u8); CELL_COUNT],
    /// Per-channel calibration constants
    pub calibration: [CellCalibration; CELL_COUNT],
    /// Path to the calibration file written by the wizard
    pub calibration_path: LongString,
}

impl Default for CellsConfig {
    fn default() -> Self {
        Self {
            pins: [(5, 6), (13, 19), (26, 16), (20, 21)],
            calibration: [CellCalibration::default(); CELL_COUNT],
            calibration_path: long_string("calibration_values.txt"),
        }
    }
}

impl CellsConfig {
    /// Set the GPIO pin pairs
    pub fn with_pins(mut self, pins: [(u8, u8); CELL_COUNT]) -> Self {
        self.pins = pins;
        self
    }

    /// Set the calibration constants
    pub fn with_calibration(mut self, calibration: [CellCalibration; CELL_COUNT]) -> Self {
        self.calibration = calibration;
        self
    }

    /// Set the calibration file path
    pub fn with_calibration_path(mut self, path: &str) -> Self {
        self.calibration_path = long_string(path);
        self
    }
}

// ============================================================================
// Webhook Config
// ============================================================================

/// Webhook telemetry configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebhookConfig {
    /// Endpoint URL to POST reports to (empty = not configured)
    pub url: LongString,
    /// Stable device identifier included in every report
    pub device_id: ShortString,
    /// Minimum interval between transmissions in milliseconds
    pub send_interval_ms: u64,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Whether webhook delivery is enabled
    pub enabled: bool,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: LongString::new(),
            device_id: short_string("pi_zero_scale_001"),
            send_interval_ms: 5000,
            timeout_ms: 5000,
            enabled: false,
        }
    }
}

impl WebhookConfig {
    /// Set the endpoint URL
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = long_string(url);
        self
    }

    /// Set the device identifier
    pub fn with_device_id(mut self, id: &str) -> Self {
        self.device_id = short_string(id);
        self
    }

    /// Set the transmission interval
    pub fn with_send_interval_ms(mut self, ms: u64) -> Self {
        self.send_interval_ms = ms;
        self
    }

    /// Set the request timeout
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Enable or disable delivery
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check if delivery is both enabled and pointed at a URL
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.url.is_empty()
    }
}

// ============================================================================
// Station Config
// ============================================================================

/// Polling loop configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationConfig {
    /// Interval between weight updates in milliseconds
    pub update_interval_ms: u64,
    /// How long to hold the welcome screen in milliseconds
    pub welcome_hold_ms: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 500,
            welcome_hold_ms: 2000,
        }
    }
}

impl StationConfig {
    /// Set the update interval
    pub fn with_update_interval_ms(mut self, ms: u64) -> Self {
        self.update_interval_ms = ms;
        self
    }

    /// Set the welcome screen hold time
    pub fn with_welcome_hold_ms(mut self, ms: u64) -> Self {
        self.welcome_hold_ms = ms;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
