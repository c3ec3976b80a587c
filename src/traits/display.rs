//! Display abstraction for weight readout rendering.
//!
//! This module defines the [`StationDisplay`] trait for rendering scale
//! readings to the physical LCD or to a test double.

use crate::scale::ScaleReading;

/// Display trait for the weighing station readout.
///
/// Implementors provide hardware-specific rendering; the crate's own
/// [`Lcd1602`](crate::lcd::Lcd1602) driver implements this against a
/// two-line character display, and [`MockStationDisplay`] records calls
/// for testing.
///
/// [`MockStationDisplay`]: crate::hal::MockStationDisplay
pub trait StationDisplay {
    /// Error type for display operations.
    type Error;

    /// Clears the display.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Renders a weight reading.
    ///
    /// Called once per polling tick. Implementations show the station
    /// title on the first line and the formatted total weight on the
    /// second.
    fn render(&mut self, reading: &ScaleReading) -> Result<(), Self::Error>;

    /// Shows a simple two-line message (startup, shutdown, errors).
    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error>;

    /// Final teardown: clear the display and turn the backlight off.
    ///
    /// Called once before the owning process exits; the handle must not
    /// be used afterwards.
    fn shutdown(&mut self) -> Result<(), Self::Error>;
}
