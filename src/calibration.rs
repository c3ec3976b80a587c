//! Two-stage load cell calibration.
//!
//! Stage 1 (tare) records the raw baseline of each cell with nothing on the
//! platform. Stage 2 places a known mass on each corner and derives the
//! counts-per-gram scale factor. The resulting [`CellCalibration`] constants
//! are written to a plain text file that this module can also parse back.
//!
//! The interactive wizard driving these routines lives in the `calibrate`
//! binary; everything here is prompt-free and mock-testable.
//!
//! [`CellCalibration`]: crate::scale::CellCalibration

use crate::scale::{CellCalibration, CELL_COUNT};
use crate::traits::{Delay, LoadCellInput};

/// Default number of samples averaged per stage.
pub const DEFAULT_SAMPLES: usize = 10;

/// Pause between samples, milliseconds.
pub const SAMPLE_GAP_MS: u32 = 100;

/// Averages `samples` raw readings from one cell.
///
/// Failed reads are skipped; returns `None` if every read failed (a cell
/// that never answers cannot be calibrated).
pub fn sample_average<C, D>(cell: &mut C, delay: &mut D, samples: usize) -> Option<f64>
where
    C: LoadCellInput,
    D: Delay,
{
    let mut sum = 0.0;
    let mut count = 0u32;
    for _ in 0..samples {
        if let Ok(raw) = cell.read_raw() {
            sum += f64::from(raw);
            count += 1;
        }
        delay.delay_ms(SAMPLE_GAP_MS);
    }
    if count == 0 {
        None
    } else {
        Some(sum / f64::from(count))
    }
}

/// Derives the scale factor from a loaded average reading.
///
/// `scale = (avg_reading - offset) / known_weight_grams`, i.e. raw counts
/// per gram.
pub fn scale_factor(avg_reading: f64, offset: f64, known_weight_grams: f64) -> f64 {
    (avg_reading - offset) / known_weight_grams
}

/// Renders four calibrations as the calibration file format.
///
/// ```text
/// # Calibration values for weighing machine
/// # Front-Left
/// OFFSET_1 = 8400.00
/// SCALE_1 = 420.000000
/// ...
/// ```
#[cfg(feature = "std")]
pub fn calibration_file_contents(
    names: &[&str; CELL_COUNT],
    calibrations: &[CellCalibration; CELL_COUNT],
) -> String {
    use std::fmt::Write as _;

    let mut out = String::from("# Calibration values for weighing machine\n\n");
    for (i, (name, cal)) in names.iter().zip(calibrations.iter()).enumerate() {
        let _ = writeln!(out, "# {}", name);
        let _ = writeln!(out, "OFFSET_{} = {:.2}", i + 1, cal.offset);
        let _ = writeln!(out, "SCALE_{} = {:.6}", i + 1, cal.scale);
        let _ = writeln!(out);
    }
    out
}

/// Parses a calibration file written by [`calibration_file_contents`].
///
/// Comment and blank lines are ignored. Returns `None` unless all four
/// offset/scale pairs are present and numeric.
#[cfg(feature = "std")]
pub fn parse_calibration(contents: &str) -> Option<[CellCalibration; CELL_COUNT]> {
    let mut offsets = [None; CELL_COUNT];
    let mut scales = [None; CELL_COUNT];

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=')?;
        let value: f64 = value.trim().parse().ok()?;
        let key = key.trim();

        if let Some(n) = key.strip_prefix("OFFSET_") {
            let idx: usize = n.parse().ok()?;
            *offsets.get_mut(idx.checked_sub(1)?)? = Some(value);
        } else if let Some(n) = key.strip_prefix("SCALE_") {
            let idx: usize = n.parse().ok()?;
            *scales.get_mut(idx.checked_sub(1)?)? = Some(value);
        }
    }

    let mut out = [CellCalibration::default(); CELL_COUNT];
    for i in 0..CELL_COUNT {
        out[i] = CellCalibration {
            offset: offsets[i]?,
            scale: scales[i]?,
        };
    }
    Some(out)
}

/// Writes the calibration file to disk.
#[cfg(feature = "std")]
pub fn save_calibration(
    path: &std::path::Path,
    names: &[&str; CELL_COUNT],
    calibrations: &[CellCalibration; CELL_COUNT],
) -> std::io::Result<()> {
    std::fs::write(path, calibration_file_contents(names, calibrations))
}

/// Loads and parses a calibration file.
///
/// Returns `Ok(None)` if the file exists but does not parse.
#[cfg(feature = "std")]
pub fn load_calibration(
    path: &std::path::Path,
) -> std::io::Result<Option<[CellCalibration; CELL_COUNT]>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_calibration(&contents))
}
