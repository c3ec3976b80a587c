//! Raspberry Pi weighing station entry point.
//!
//! Runs the 2Hz polling loop that:
//! - Reads all four load cell channels through their HX711 amplifiers
//! - Renders the calibrated total on the 16x2 LCD
//! - Prints a live readout to the console
//! - POSTs JSON telemetry to a webhook endpoint (if enabled)
//!
//! # Build
//!
//! ```bash
//! # Display + load cells only
//! cargo build --release --features rpi --bin station
//!
//! # With webhook telemetry
//! WEBHOOK_URL=https://example.com/api/weight \
//!     cargo build --release --features "rpi webhook" --bin station
//! ```

use anyhow::Context;
use rppal::gpio::Gpio;
use rs_scale::hal::rpi::{RpiHx711, RpiI2cBus, StdDelay};
use rs_scale::lcd::Lcd1602;
use rs_scale::scale::Scale;
use rs_scale::station::WeighStation;
use rs_scale::{calibration, Config};
use std::io::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[cfg(feature = "webhook")]
use rs_scale::hal::rpi::StdClock;
#[cfg(feature = "webhook")]
use rs_scale::messages::WeightReport;
#[cfg(feature = "webhook")]
use rs_scale::services::{local_timestamp, HttpWebhook};
#[cfg(feature = "webhook")]
use rs_scale::station::WebhookScheduler;
#[cfg(feature = "webhook")]
use rs_scale::traits::{Clock, WebhookClient};

fn main() -> anyhow::Result<()> {
    println!();
    println!("================================");
    println!("  rs-scale Weighing Station");
    println!("================================");
    println!();

    // =========================================================================
    // Configuration
    // =========================================================================
    let mut config = Config::default();

    #[cfg(feature = "webhook")]
    {
        if let Some(url) = option_env!("WEBHOOK_URL") {
            config.webhook = config.webhook.with_url(url).with_enabled(true);
        }
    }

    let cal_path = Path::new(config.cells.calibration_path.as_str());
    match calibration::load_calibration(cal_path) {
        Ok(Some(cal)) => {
            config.cells.calibration = cal;
            println!("[OK] Calibration loaded from {}", cal_path.display());
        }
        Ok(None) => {
            println!(
                "[!!] Calibration file {} is malformed, using identity calibration",
                cal_path.display()
            );
        }
        Err(_) => {
            println!("[!!] No calibration file, run the calibrate binary first");
        }
    }

    // =========================================================================
    // Initialize load cells (HX711 pairs on GPIO)
    // =========================================================================
    let gpio = Gpio::new().context("opening GPIO")?;
    let cells = RpiHx711::open_all(&gpio, config.cells.pins).context("claiming HX711 pins")?;
    let scale = Scale::new(cells, config.cells.calibration);
    println!("[OK] Load cells initialized ({} channels)", rs_scale::CELL_COUNT);

    // =========================================================================
    // Initialize LCD (PCF8574 backpack on I2C) - degrade to headless on failure
    // =========================================================================
    let display = if config.lcd.enabled {
        match lcd_init(&config) {
            Ok(lcd) => {
                println!("[OK] LCD initialized at 0x{:02X}", config.lcd.address);
                Some(lcd)
            }
            Err(err) => {
                println!("[!!] LCD initialization failed ({}), running headless", err);
                None
            }
        }
    } else {
        None
    };

    let mut station = WeighStation::new(scale, display);

    #[cfg(feature = "webhook")]
    let mut webhook = if config.webhook.is_configured() {
        println!("[OK] Webhook enabled: {}", config.webhook.url.as_str());
        Some((
            HttpWebhook::from_config(&config.webhook),
            WebhookScheduler::new(config.webhook.send_interval_ms),
            StdClock::new(),
        ))
    } else {
        println!("[..] Webhook disabled");
        None
    };

    // =========================================================================
    // Main loop
    // =========================================================================
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("installing Ctrl+C handler")?;
    }

    if let Err(err) = station.welcome() {
        println!("[!!] Welcome screen failed: {}", err);
    }
    thread::sleep(Duration::from_millis(config.station.welcome_hold_ms));

    println!("\nWeighing station started, press Ctrl+C to stop\n");

    while running.load(Ordering::SeqCst) {
        let reading = station.read();

        // A dropped display update is not worth stopping the loop over
        if let Err(err) = station.render(&reading) {
            println!("\n[!!] Display update failed: {}", err);
        }

        #[cfg(feature = "webhook")]
        let sent_count = match &mut webhook {
            Some((client, scheduler, clock)) => {
                let now = clock.now_ms();
                if scheduler.due(now) {
                    let report =
                        WeightReport::from_reading(&reading, local_timestamp(), config.webhook.device_id.as_str());
                    match client.send_report(&report) {
                        Ok(status) if (200..300).contains(&status) => {}
                        Ok(status) => println!("\n[!!] Webhook rejected: HTTP {}", status),
                        Err(err) => println!("\n[!!] Webhook failed: {}", err),
                    }
                    scheduler.mark_sent(now);
                }
                scheduler.sent_count()
            }
            None => 0,
        };
        #[cfg(not(feature = "webhook"))]
        let sent_count = 0u32;

        print_console_line(&reading, sent_count);

        thread::sleep(Duration::from_millis(config.station.update_interval_ms));
    }

    // =========================================================================
    // Teardown
    // =========================================================================
    println!("\n\nStopping weighing station...");
    if let Err(err) = station.shutdown() {
        println!("[!!] Display teardown failed: {}", err);
    }
    println!("Cleanup complete.");
    Ok(())
}

fn lcd_init(config: &Config) -> anyhow::Result<Lcd1602<RpiI2cBus, StdDelay>> {
    let bus = RpiI2cBus::new(config.lcd.i2c_bus).context("opening I2C bus")?;
    let lcd = Lcd1602::initialize(config.lcd.address, bus, StdDelay::new())
        .context("LCD handshake")?;
    Ok(lcd)
}

fn print_console_line(reading: &rs_scale::ScaleReading, sent_count: u32) {
    let webhook_status = if sent_count > 0 {
        format!("[WH: {}] ", sent_count)
    } else {
        String::new()
    };
    print!(
        "\r{}Total: {:7.3} kg | Sensors: [{:6.1}g, {:6.1}g, {:6.1}g, {:6.1}g]",
        webhook_status,
        reading.total_kg(),
        reading.cells[0],
        reading.cells[1],
        reading.cells[2],
        reading.cells[3],
    );
    let _ = std::io::stdout().flush();
}
