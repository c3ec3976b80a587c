//! Station controller tying the scale to its display, plus webhook pacing.
//!
//! [`WeighStation`] is a thin coordinator: it reads the four-channel scale,
//! hands the snapshot to whatever [`StationDisplay`] is attached, and owns
//! the welcome/shutdown screens. The display is optional - if the LCD fails
//! to initialize the caller may decide to keep weighing without one.
//!
//! [`WebhookScheduler`] gates telemetry to a fixed interval without ever
//! blocking the polling loop.
//!
//! # Example
//!
//! ```rust
//! use rs_scale::hal::{MockLoadCell, MockStationDisplay};
//! use rs_scale::scale::{CellCalibration, Scale};
//! use rs_scale::station::WeighStation;
//!
//! let cells = core::array::from_fn(|_| MockLoadCell::with_reading(500));
//! let scale = Scale::new(cells, [CellCalibration::default(); 4]);
//! let mut station = WeighStation::new(scale, Some(MockStationDisplay::new()));
//!
//! let reading = station.read();
//! assert_eq!(reading.total_grams, 2000.0);
//! station.render(&reading).unwrap();
//! ```

use crate::scale::{Scale, ScaleReading};
use crate::traits::{LoadCellInput, StationDisplay};

/// Coordinates weight acquisition and display rendering.
pub struct WeighStation<C: LoadCellInput, D: StationDisplay> {
    scale: Scale<C>,
    display: Option<D>,
}

impl<C: LoadCellInput, D: StationDisplay> WeighStation<C, D> {
    /// Creates a station from a scale and an optional display.
    ///
    /// Pass `None` to run headless - e.g. when display initialization
    /// failed and the caller chose to continue without it.
    pub fn new(scale: Scale<C>, display: Option<D>) -> Self {
        Self { scale, display }
    }

    /// Whether a display is attached.
    pub fn has_display(&self) -> bool {
        self.display.is_some()
    }

    /// Reads one calibrated snapshot from the scale.
    ///
    /// Never fails: a dead channel contributes `0.0` grams and is flagged
    /// in the reading.
    pub fn read(&mut self) -> ScaleReading {
        self.scale.read()
    }

    /// Renders a reading on the attached display, if any.
    ///
    /// A transport failure is returned for the caller to decide on;
    /// skipping one display update is acceptable, the reading itself is
    /// not lost.
    pub fn render(&mut self, reading: &ScaleReading) -> Result<(), D::Error> {
        match &mut self.display {
            Some(display) => display.render(reading),
            None => Ok(()),
        }
    }

    /// Shows the startup screen.
    pub fn welcome(&mut self) -> Result<(), D::Error> {
        match &mut self.display {
            Some(display) => {
                display.clear()?;
                display.show_message("Baby Weight", Some("Station Ready"))
            }
            None => Ok(()),
        }
    }

    /// Runs the display teardown sequence.
    ///
    /// The display handle must not be used after this; the station keeps
    /// weighing headless if asked to.
    pub fn shutdown(&mut self) -> Result<(), D::Error> {
        match self.display.take() {
            Some(mut display) => display.shutdown(),
            None => Ok(()),
        }
    }

    /// Access to the underlying scale (e.g. to swap calibration).
    pub fn scale_mut(&mut self) -> &mut Scale<C> {
        &mut self.scale
    }
}

/// Fixed-interval gate for webhook transmissions.
///
/// Mirrors the polling loop's bookkeeping: the loop asks [`due`](Self::due)
/// every tick and calls [`mark_sent`](Self::mark_sent) after a delivery
/// attempt, successful or not - a failed POST should not cause a burst of
/// immediate retries.
///
/// # Example
///
/// ```rust
/// use rs_scale::station::WebhookScheduler;
///
/// let mut scheduler = WebhookScheduler::new(5_000);
/// assert!(scheduler.due(0));
///
/// scheduler.mark_sent(0);
/// assert!(!scheduler.due(4_999));
/// assert!(scheduler.due(5_000));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct WebhookScheduler {
    interval_ms: u64,
    last_sent_ms: Option<u64>,
    sent_count: u32,
}

impl WebhookScheduler {
    /// Creates a scheduler with the given minimum interval between sends.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sent_ms: None,
            sent_count: 0,
        }
    }

    /// True if enough time has passed since the last send.
    ///
    /// Always true before the first send.
    pub fn due(&self, now_ms: u64) -> bool {
        match self.last_sent_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
            None => true,
        }
    }

    /// Records a delivery attempt at `now_ms`.
    pub fn mark_sent(&mut self, now_ms: u64) {
        self.last_sent_ms = Some(now_ms);
        self.sent_count += 1;
    }

    /// Number of delivery attempts so far.
    pub fn sent_count(&self) -> u32 {
        self.sent_count
    }
}
