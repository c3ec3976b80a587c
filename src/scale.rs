//! Weight acquisition: calibration transform and four-channel aggregation.
//!
//! Each corner of the platform sits on a load cell read through an HX711
//! amplifier. A raw reading is converted to grams with a per-cell linear
//! transform, and the four calibrated weights sum to the total.
//!
//! # Example
//!
//! ```rust
//! use rs_scale::hal::MockLoadCell;
//! use rs_scale::scale::{CellCalibration, Scale};
//!
//! let cells = [
//!     MockLoadCell::with_reading(1000),
//!     MockLoadCell::with_reading(1000),
//!     MockLoadCell::with_reading(1000),
//!     MockLoadCell::with_reading(1000),
//! ];
//! let cal = CellCalibration { offset: 0.0, scale: 2.0 };
//! let mut scale = Scale::new(cells, [cal; 4]);
//!
//! let reading = scale.read();
//! assert_eq!(reading.total_grams, 2000.0);
//! ```

use crate::traits::LoadCellInput;
use core::fmt::Write as _;
use heapless::String as HString;

/// Number of load cells on the platform.
pub const CELL_COUNT: usize = 4;

/// Corner names in channel order.
pub const CELL_NAMES: [&str; CELL_COUNT] = ["Front-Left", "Front-Right", "Back-Left", "Back-Right"];

/// Linear calibration constants for one load cell.
///
/// `weight_grams = (raw - offset) / scale`. The constants come from the
/// two-stage calibration routine in [`crate::calibration`] and are passed
/// in explicitly - never read from global state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCalibration {
    /// Raw reading with no load (tare baseline).
    pub offset: f64,
    /// Raw counts per gram.
    pub scale: f64,
}

impl Default for CellCalibration {
    fn default() -> Self {
        Self {
            offset: 0.0,
            scale: 1.0,
        }
    }
}

impl CellCalibration {
    /// Applies the transform to a raw reading.
    pub fn apply(&self, raw: i32) -> f64 {
        (f64::from(raw) - self.offset) / self.scale
    }
}

/// One snapshot of the platform, produced once per polling tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleReading {
    /// Sum of the four calibrated cell weights, in grams.
    pub total_grams: f64,
    /// Per-cell calibrated weights, in channel order.
    pub cells: [f64; CELL_COUNT],
    /// Which channels produced a valid reading this tick.
    ///
    /// A failed channel contributes `0.0` grams; this flag is how callers
    /// tell a dead cell apart from an empty platform.
    pub valid: [bool; CELL_COUNT],
}

impl ScaleReading {
    /// True if every channel read successfully.
    pub fn all_valid(&self) -> bool {
        self.valid.iter().all(|v| *v)
    }

    /// Total weight in kilograms.
    pub fn total_kg(&self) -> f64 {
        self.total_grams / 1000.0
    }
}

/// Four-channel scale aggregating calibrated load cell readings.
///
/// Generic over the load cell implementation so the whole acquisition
/// pipeline runs against mocks on desktop.
pub struct Scale<C: LoadCellInput> {
    cells: [C; CELL_COUNT],
    calibration: [CellCalibration; CELL_COUNT],
}

impl<C: LoadCellInput> Scale<C> {
    /// Creates a scale from four channels and their calibration constants.
    pub fn new(cells: [C; CELL_COUNT], calibration: [CellCalibration; CELL_COUNT]) -> Self {
        Self { cells, calibration }
    }

    /// Resets every amplifier to a known state.
    pub fn reset(&mut self) -> Result<(), C::Error> {
        for cell in &mut self.cells {
            cell.reset()?;
        }
        Ok(())
    }

    /// Reads all four channels and returns the calibrated snapshot.
    ///
    /// A channel read failure contributes `0.0` grams and clears the
    /// corresponding `valid` flag; a dropped sample is not worth aborting
    /// the polling loop over.
    pub fn read(&mut self) -> ScaleReading {
        let mut cells = [0.0; CELL_COUNT];
        let mut valid = [false; CELL_COUNT];
        let mut total = 0.0;

        for (i, cell) in self.cells.iter_mut().enumerate() {
            if let Ok(raw) = cell.read_raw() {
                let grams = self.calibration[i].apply(raw);
                cells[i] = grams;
                valid[i] = true;
                total += grams;
            }
        }

        ScaleReading {
            total_grams: total,
            cells,
            valid,
        }
    }

    /// Replaces the calibration constants (e.g. after re-running the wizard).
    pub fn set_calibration(&mut self, calibration: [CellCalibration; CELL_COUNT]) {
        self.calibration = calibration;
    }
}

/// Formats a weight for the 16-column readout.
///
/// Below one kilogram the weight renders as tenths of a gram
/// (`"123.4g"`), above as thousandths of a kilogram (`"1.234kg"`).
/// Negative totals render as zero - the platform shows nothing rather
/// than a confusing negative number after an aggressive tare.
///
/// # Example
///
/// ```rust
/// use rs_scale::scale::format_weight;
///
/// assert_eq!(format_weight(123.45).as_str(), "123.5g");
/// assert_eq!(format_weight(4821.5).as_str(), "4.822kg");
/// assert_eq!(format_weight(-3.0).as_str(), "0.0g");
/// ```
pub fn format_weight(grams: f64) -> HString<16> {
    let grams = if grams < 0.0 { 0.0 } else { grams };
    let mut out: HString<16> = HString::new();
    if grams < 1000.0 {
        let _ = write!(out, "{:.1}g", grams);
    } else {
        let _ = write!(out, "{:.3}kg", grams / 1000.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCell {
        reading: Result<i32, ()>,
    }

    impl LoadCellInput for TestCell {
        type Error = ();

        fn read_raw(&mut self) -> Result<i32, ()> {
            self.reading
        }
    }

    fn ok(raw: i32) -> TestCell {
        TestCell { reading: Ok(raw) }
    }

    fn dead() -> TestCell {
        TestCell { reading: Err(()) }
    }

    #[test]
    fn calibration_transform() {
        let cal = CellCalibration {
            offset: 8_400.0,
            scale: 420.0,
        };
        assert!((cal.apply(50_400) - 100.0).abs() < 1e-9);
        assert!((cal.apply(8_400) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn calibration_default_is_identity() {
        let cal = CellCalibration::default();
        assert_eq!(cal.apply(1234), 1234.0);
    }

    #[test]
    fn read_sums_calibrated_channels() {
        let cal = CellCalibration {
            offset: 0.0,
            scale: 2.0,
        };
        let mut scale = Scale::new([ok(100), ok(200), ok(300), ok(400)], [cal; CELL_COUNT]);

        let reading = scale.read();
        assert_eq!(reading.cells, [50.0, 100.0, 150.0, 200.0]);
        assert_eq!(reading.total_grams, 500.0);
        assert!(reading.all_valid());
    }

    #[test]
    fn failed_channel_contributes_zero() {
        let cal = CellCalibration::default();
        let mut scale = Scale::new([ok(100), dead(), ok(300), ok(400)], [cal; CELL_COUNT]);

        let reading = scale.read();
        assert_eq!(reading.cells[1], 0.0);
        assert_eq!(reading.valid, [true, false, true, true]);
        assert_eq!(reading.total_grams, 800.0);
        assert!(!reading.all_valid());
    }

    #[test]
    fn total_kg_conversion() {
        let reading = ScaleReading {
            total_grams: 2500.0,
            cells: [625.0; CELL_COUNT],
            valid: [true; CELL_COUNT],
        };
        assert!((reading.total_kg() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn format_weight_grams_below_one_kg() {
        assert_eq!(format_weight(0.0).as_str(), "0.0g");
        assert_eq!(format_weight(999.94).as_str(), "999.9g");
    }

    #[test]
    fn format_weight_kilograms_at_and_above_one_kg() {
        assert_eq!(format_weight(1000.0).as_str(), "1.000kg");
        assert_eq!(format_weight(12_345.6).as_str(), "12.346kg");
    }

    #[test]
    fn format_weight_negative_clamps_to_zero() {
        assert_eq!(format_weight(-250.0).as_str(), "0.0g");
    }
}
