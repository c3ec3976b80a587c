//! Interactive two-stage load cell calibration wizard.
//!
//! Stage 1 records the zero-load baseline of each cell. Stage 2 places a
//! known mass on each corner and derives the counts-per-gram scale factor.
//! The constants are written to the calibration file the station binary
//! loads at startup.
//!
//! # Build
//!
//! ```bash
//! cargo run --release --features rpi --bin calibrate
//! ```

use anyhow::Context;
use rppal::gpio::Gpio;
use rs_scale::calibration::{sample_average, scale_factor, save_calibration, DEFAULT_SAMPLES};
use rs_scale::hal::rpi::{RpiHx711, StdDelay};
use rs_scale::scale::{CellCalibration, CELL_COUNT, CELL_NAMES};
use rs_scale::Config;
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    banner("LOAD CELL CALIBRATION WIZARD");
    println!("This wizard calibrates all four load cell channels.");

    let config = Config::default();

    println!("\nInitializing sensors...");
    let gpio = Gpio::new().context("opening GPIO")?;
    let mut cells = RpiHx711::open_all(&gpio, config.cells.pins).context("claiming HX711 pins")?;
    let mut delay = StdDelay::new();
    println!("[OK] All sensors initialized");

    // =========================================================================
    // Stage 1: zero calibration (tare)
    // =========================================================================
    banner("STAGE 1: ZERO CALIBRATION (TARE)");
    println!("\nPlease ensure NO WEIGHT is on the scale.");
    prompt("Press Enter when ready to begin zero calibration...")?;

    let mut calibrations = [CellCalibration::default(); CELL_COUNT];

    println!("\nTaking {} readings from each sensor...", DEFAULT_SAMPLES);
    for (i, cell) in cells.iter_mut().enumerate() {
        println!("\nCalibrating {}...", CELL_NAMES[i]);
        match sample_average(cell, &mut delay, DEFAULT_SAMPLES) {
            Some(offset) => {
                calibrations[i].offset = offset;
                println!("  [OK] Average offset: {:.2}", offset);
            }
            None => {
                anyhow::bail!("no valid readings from {}", CELL_NAMES[i]);
            }
        }
    }

    // =========================================================================
    // Stage 2: scale factor calibration
    // =========================================================================
    banner("STAGE 2: SCALE FACTOR CALIBRATION");
    println!("\nEnter the known weight in grams (e.g., 1000 for 1kg):");
    let known_grams: f64 = prompt("Known weight (grams): ")?
        .trim()
        .parse()
        .context("known weight must be a number")?;
    anyhow::ensure!(known_grams > 0.0, "known weight must be positive");

    println!("\nPlace the {}g weight on EACH corner.", known_grams);
    prompt("Press Enter when ready to begin scale calibration...")?;

    println!("\nTaking {} readings from each sensor...", DEFAULT_SAMPLES);
    for (i, cell) in cells.iter_mut().enumerate() {
        println!("\nCalibrating {}...", CELL_NAMES[i]);
        match sample_average(cell, &mut delay, DEFAULT_SAMPLES) {
            Some(avg) => {
                calibrations[i].scale = scale_factor(avg, calibrations[i].offset, known_grams);
                println!("  [OK] Average reading: {:.2}", avg);
                println!("  [OK] Scale factor: {:.6}", calibrations[i].scale);
            }
            None => {
                anyhow::bail!("no valid readings from {}", CELL_NAMES[i]);
            }
        }
    }

    // =========================================================================
    // Save
    // =========================================================================
    banner("SAVING CALIBRATION VALUES");
    let path = Path::new(config.cells.calibration_path.as_str());
    save_calibration(path, &CELL_NAMES, &calibrations).context("writing calibration file")?;
    println!("\n[OK] Calibration values saved to '{}'", path.display());

    println!("\nPer-channel constants:");
    for (name, cal) in CELL_NAMES.iter().zip(calibrations.iter()) {
        println!(
            "  {:<12} offset = {:>12.2}  scale = {:>12.6}",
            name, cal.offset, cal.scale
        );
    }
    println!("\nThe station binary picks these up automatically on next start.");

    Ok(())
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

/// Prints a prompt and reads one line from stdin.
fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
