//! Hardware abstraction traits for the bus transport, load cells, and timing.
//!
//! This module defines the core hardware interfaces that allow rs-scale to
//! run against real Raspberry Pi peripherals or desktop mocks.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`BusTransport`] | Single-byte register writes on the I2C bus |
//! | [`LoadCellInput`] | Raw readings from one HX711 channel |
//! | [`Delay`] | Blocking microsecond delays for protocol timing |
//! | [`Clock`] | Monotonic time source for interval scheduling |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations from
//! [`crate::hal::mock`]. For Raspberry Pi hardware, use the implementations
//! from `hal::rpi` (requires the `rpi` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_scale::traits::BusTransport;
//! use rs_scale::hal::mock_lcd_bus;
//!
//! let (mut bus, _delay, journal) = mock_lcd_bus();
//! bus.write(0x27, 0x30).unwrap();
//! assert_eq!(journal.writes(), vec![(0x27, 0x30)]);
//! ```

/// Error type for bus transport writes.
///
/// The transport itself never retries or interprets failures; every variant
/// is surfaced to the caller, who decides whether to abort the session or
/// skip one display update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BusError {
    /// The peripheral did not acknowledge the write.
    ///
    /// Typically a wrong address or disconnected backpack. Not retriable
    /// from inside the driver.
    Unreachable,

    /// A lower-level transport fault (bus contention, kernel I/O error).
    IoFailure,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BusError::Unreachable => write!(f, "peripheral did not acknowledge"),
            BusError::IoFailure => write!(f, "bus transport I/O failure"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BusError {}

/// Bus transport trait - writes a single byte to a peripheral register.
///
/// This is a pure I/O primitive with no protocol knowledge: exactly one
/// register write on the bus per call, no buffering, no implicit delay, no
/// retry. All timing and ordering guarantees live in the caller (the LCD
/// driver).
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_scale::traits::{BusTransport, BusError};
///
/// struct MyBus { /* kernel I2C handle */ }
///
/// impl BusTransport for MyBus {
///     fn write(&mut self, address: u8, byte: u8) -> Result<(), BusError> {
///         // one i2c write, mapping NACK to BusError::Unreachable
///         Ok(())
///     }
/// }
/// ```
pub trait BusTransport {
    /// Write one byte to the peripheral at `address`.
    fn write(&mut self, address: u8, byte: u8) -> Result<(), BusError>;
}

/// Load cell input trait - one HX711 channel.
///
/// Implementations return the raw 24-bit two's-complement reading,
/// sign-extended to `i32`. Averaging across samples is up to the
/// implementation; the calibration transform lives in [`crate::scale`].
pub trait LoadCellInput {
    /// Error type for sensor reads (e.g. data-ready timeout).
    type Error;

    /// Read one raw value from the amplifier.
    fn read_raw(&mut self) -> Result<i32, Self::Error>;

    /// Power-cycle the amplifier back to a known state.
    ///
    /// Default implementation does nothing; bit-banged implementations
    /// override this to pulse the clock line.
    fn reset(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Blocking delay trait for protocol timing.
///
/// The display protocol interleaves bus writes with mandatory real-time
/// holds (enable pulse width, clear execution time, reset settling). Every
/// operation runs its delays to completion before returning; there is
/// nothing cancellable here.
pub trait Delay {
    /// Block for at least `us` microseconds.
    fn delay_us(&mut self, us: u32);

    /// Block for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }
}

/// Time source trait for interval scheduling.
///
/// Provides monotonic time in milliseconds for the polling loop and the
/// webhook scheduler. On desktop this wraps `std::time::Instant`; in tests
/// use the controllable mock.
///
/// # Example
///
/// ```rust
/// use rs_scale::traits::Clock;
/// use rs_scale::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}
