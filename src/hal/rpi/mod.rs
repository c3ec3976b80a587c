//! Raspberry Pi hardware abstraction layer for the weighing station.
//!
//! This module provides hardware implementations for a Raspberry Pi Zero
//! driving a 16x2 character LCD over I2C and four HX711 load cell
//! amplifiers over bit-banged GPIO.
//!
//! # Hardware Configuration
//!
//! - **SBC**: Raspberry Pi Zero W
//! - **Display**: LCD1602 behind a PCF8574 I2C backpack (4-bit mode)
//! - **Load cells**: 4x half-bridge cells, one HX711 amplifier each
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments.

mod hx711;
mod i2c;
mod time;

pub use hx711::{Hx711Error, RpiHx711};
pub use i2c::RpiI2cBus;
pub use time::{StdClock, StdDelay};

/// Pin assignments for the Pi Zero weighing station.
///
/// Each HX711 takes a data-out line (read) and a serial-clock line
/// (driven). The LCD backpack sits on the hardware I2C bus.
pub mod pins {
    // =========================================================================
    // HX711 amplifiers (DOUT, SCK) per corner
    // =========================================================================

    /// Front-Left amplifier data out
    pub const CELL_1_DOUT: u8 = 5;

    /// Front-Left amplifier clock
    pub const CELL_1_SCK: u8 = 6;

    /// Front-Right amplifier data out
    pub const CELL_2_DOUT: u8 = 13;

    /// Front-Right amplifier clock
    pub const CELL_2_SCK: u8 = 19;

    /// Back-Left amplifier data out
    pub const CELL_3_DOUT: u8 = 26;

    /// Back-Left amplifier clock
    pub const CELL_3_SCK: u8 = 16;

    /// Back-Right amplifier data out
    pub const CELL_4_DOUT: u8 = 20;

    /// Back-Right amplifier clock
    pub const CELL_4_SCK: u8 = 21;

    /// (DOUT, SCK) pairs in channel order.
    pub const CELL_PINS: [(u8, u8); 4] = [
        (CELL_1_DOUT, CELL_1_SCK),
        (CELL_2_DOUT, CELL_2_SCK),
        (CELL_3_DOUT, CELL_3_SCK),
        (CELL_4_DOUT, CELL_4_SCK),
    ];

    // =========================================================================
    // I2C display (PCF8574 backpack)
    // =========================================================================

    /// Hardware I2C bus carrying the LCD backpack (GPIO2/3)
    pub const I2C_BUS: u8 = 1;

    /// Default I2C address for the PCF8574 backpack
    pub const LCD_I2C_ADDR: u8 = 0x27;
}
