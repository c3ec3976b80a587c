//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware and network traits,
//! enabling development and testing on desktop without a Raspberry Pi.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockBus`] | [`BusTransport`] | Records every register write, injectable failures |
//! | [`MockDelay`] | [`Delay`] | Records every mandatory hold time |
//! | [`MockLoadCell`] | [`LoadCellInput`] | Queued raw readings and failures |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//! | [`MockStationDisplay`] | [`StationDisplay`] | Tracks render calls |
//! | [`MockWebhook`] | `WebhookClient` | Captures delivered reports (`json` feature) |
//!
//! # The bus journal
//!
//! The display protocol is only correct if writes and delays interleave in
//! the right order, so [`MockBus`] and [`MockDelay`] share a [`BusJournal`]
//! that records both streams into one sequence. [`mock_lcd_bus`] builds a
//! linked pair:
//!
//! ```rust
//! use rs_scale::hal::{mock_lcd_bus, BusEvent};
//! use rs_scale::traits::{BusTransport, Delay};
//!
//! let (mut bus, mut delay, journal) = mock_lcd_bus();
//! bus.write(0x27, 0xF0).unwrap();
//! delay.delay_us(100);
//!
//! assert_eq!(
//!     journal.events(),
//!     vec![
//!         BusEvent::Write { address: 0x27, byte: 0xF0 },
//!         BusEvent::DelayUs(100),
//!     ]
//! );
//! ```
//!
//! [`BusTransport`]: crate::traits::BusTransport
//! [`Delay`]: crate::traits::Delay
//! [`LoadCellInput`]: crate::traits::LoadCellInput
//! [`Clock`]: crate::traits::Clock
//! [`StationDisplay`]: crate::traits::StationDisplay

use crate::scale::ScaleReading;
use crate::traits::{BusError, BusTransport, Clock, Delay, LoadCellInput, StationDisplay};

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

// ============================================================================
// Bus journal
// ============================================================================

/// One recorded event on the mocked bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusEvent {
    /// A register write that reached the transport.
    Write {
        /// Peripheral address.
        address: u8,
        /// The write word placed on the bus.
        byte: u8,
    },
    /// A mandatory hold time, microseconds.
    DelayUs(u32),
}

/// Shared recording of bus writes and delays, in issue order.
///
/// Cheap to clone; all clones observe the same sequence.
#[derive(Clone, Debug, Default)]
pub struct BusJournal {
    events: Rc<RefCell<Vec<BusEvent>>>,
}

impl BusJournal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: BusEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Snapshot of all recorded events.
    pub fn events(&self) -> Vec<BusEvent> {
        self.events.borrow().clone()
    }

    /// Just the writes, as `(address, byte)` pairs.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                BusEvent::Write { address, byte } => Some((*address, *byte)),
                BusEvent::DelayUs(_) => None,
            })
            .collect()
    }

    /// Number of writes recorded so far.
    pub fn write_count(&self) -> usize {
        self.writes().len()
    }

    /// Sum of all recorded delays, microseconds.
    pub fn total_delay_us(&self) -> u64 {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                BusEvent::DelayUs(us) => Some(u64::from(*us)),
                BusEvent::Write { .. } => None,
            })
            .sum()
    }

    /// Discards everything recorded so far.
    ///
    /// Handy for skipping past the initialization handshake in tests.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// Builds a [`MockBus`] and [`MockDelay`] sharing one journal.
pub fn mock_lcd_bus() -> (MockBus, MockDelay, BusJournal) {
    let journal = BusJournal::new();
    (
        MockBus::with_journal(journal.clone()),
        MockDelay::with_journal(journal.clone()),
        journal,
    )
}

// ============================================================================
// Hardware mocks
// ============================================================================

/// Mock bus transport for testing.
///
/// Records every write into its journal and can be told to fail a specific
/// write for error-path testing. A failing write is not recorded - the real
/// transport fails before anything reaches the wire.
///
/// # Example
///
/// ```rust
/// use rs_scale::hal::MockBus;
/// use rs_scale::traits::{BusError, BusTransport};
///
/// let mut bus = MockBus::new();
/// bus.fail_on_write(1, BusError::Unreachable);
///
/// assert!(bus.write(0x27, 0x00).is_ok());
/// assert_eq!(bus.write(0x27, 0x01), Err(BusError::Unreachable));
/// assert_eq!(bus.journal().write_count(), 1);
/// ```
#[derive(Debug)]
pub struct MockBus {
    journal: BusJournal,
    attempts: usize,
    fail_on: Option<(usize, BusError)>,
}

impl MockBus {
    /// Creates a mock bus with its own journal.
    pub fn new() -> Self {
        Self::with_journal(BusJournal::new())
    }

    /// Creates a mock bus recording into an existing journal.
    pub fn with_journal(journal: BusJournal) -> Self {
        Self {
            journal,
            attempts: 0,
            fail_on: None,
        }
    }

    /// Makes the `index`-th write attempt (zero-based) fail with `error`.
    pub fn fail_on_write(&mut self, index: usize, error: BusError) {
        self.fail_on = Some((index, error));
    }

    /// The journal this bus records into.
    pub fn journal(&self) -> BusJournal {
        self.journal.clone()
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl BusTransport for MockBus {
    fn write(&mut self, address: u8, byte: u8) -> Result<(), BusError> {
        let attempt = self.attempts;
        self.attempts += 1;
        if let Some((index, error)) = self.fail_on {
            if attempt == index {
                return Err(error);
            }
        }
        self.journal.record(BusEvent::Write { address, byte });
        Ok(())
    }
}

/// Mock delay source recording every hold into the journal.
#[derive(Debug)]
pub struct MockDelay {
    journal: BusJournal,
}

impl MockDelay {
    /// Creates a mock delay with its own journal.
    pub fn new() -> Self {
        Self::with_journal(BusJournal::new())
    }

    /// Creates a mock delay recording into an existing journal.
    pub fn with_journal(journal: BusJournal) -> Self {
        Self { journal }
    }

    /// The journal this delay records into.
    pub fn journal(&self) -> BusJournal {
        self.journal.clone()
    }
}

impl Default for MockDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl Delay for MockDelay {
    fn delay_us(&mut self, us: u32) {
        self.journal.record(BusEvent::DelayUs(us));
    }
}

/// Mock load cell for testing.
///
/// Queue readings (or failures) to script a channel; when the queue runs
/// dry the cell keeps returning its fallback value.
///
/// # Example
///
/// ```rust
/// use rs_scale::hal::MockLoadCell;
/// use rs_scale::traits::LoadCellInput;
///
/// let mut cell = MockLoadCell::with_reading(500);
/// cell.queue_readings(&[100, 200]);
/// cell.queue_failure();
///
/// // Queue drains LIFO
/// assert!(cell.read_raw().is_err());
/// assert_eq!(cell.read_raw().unwrap(), 200);
/// assert_eq!(cell.read_raw().unwrap(), 100);
/// assert_eq!(cell.read_raw().unwrap(), 500); // fallback
/// ```
#[derive(Debug, Default)]
pub struct MockLoadCell {
    queue: Vec<Result<i32, ()>>,
    fallback: i32,
    /// Number of times `reset()` was called.
    pub reset_count: usize,
}

impl MockLoadCell {
    /// Creates a mock cell with a fallback reading of zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock cell that always returns `raw` once the queue is empty.
    pub fn with_reading(raw: i32) -> Self {
        Self {
            fallback: raw,
            ..Self::default()
        }
    }

    /// Queue raw readings to be returned (LIFO order).
    pub fn queue_readings(&mut self, readings: &[i32]) {
        self.queue.extend(readings.iter().map(|r| Ok(*r)));
    }

    /// Queue a read failure.
    pub fn queue_failure(&mut self) {
        self.queue.push(Err(()));
    }
}

impl LoadCellInput for MockLoadCell {
    type Error = ();

    fn read_raw(&mut self) -> Result<i32, ()> {
        self.queue.pop().unwrap_or(Ok(self.fallback))
    }

    fn reset(&mut self) -> Result<(), ()> {
        self.reset_count += 1;
        Ok(())
    }
}

/// Mock clock for testing.
///
/// Provides a controllable time source for interval scheduling tests.
///
/// # Example
///
/// ```rust
/// use rs_scale::hal::MockClock;
/// use rs_scale::traits::Clock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: u64,
}

impl MockClock {
    /// Creates a new mock clock starting at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u64) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&mut self, ms: u64) {
        self.current_ms += ms;
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms
    }
}

// ============================================================================
// Display mock
// ============================================================================

/// Mock display for testing the station loop.
///
/// Tracks render calls and stores the last rendered reading for
/// verification. Set `fail_next` to exercise the caller's degrade path.
#[derive(Debug, Default)]
pub struct MockStationDisplay {
    /// The last reading that was rendered.
    pub last_reading: Option<ScaleReading>,
    /// Number of times `render()` was called.
    pub render_count: usize,
    /// Last message shown via `show_message()`.
    pub last_message: Option<(String, Option<String>)>,
    /// Number of times `clear()` was called.
    pub clear_count: usize,
    /// Whether `shutdown()` was called.
    pub shut_down: bool,
    /// When true, the next operation fails once.
    pub fail_next: bool,
}

impl MockStationDisplay {
    /// Creates a new mock display.
    pub fn new() -> Self {
        Self::default()
    }

    fn maybe_fail(&mut self) -> Result<(), ()> {
        if self.fail_next {
            self.fail_next = false;
            Err(())
        } else {
            Ok(())
        }
    }
}

impl StationDisplay for MockStationDisplay {
    type Error = ();

    fn clear(&mut self) -> Result<(), ()> {
        self.maybe_fail()?;
        self.clear_count += 1;
        Ok(())
    }

    fn render(&mut self, reading: &ScaleReading) -> Result<(), ()> {
        self.maybe_fail()?;
        self.last_reading = Some(*reading);
        self.render_count += 1;
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), ()> {
        self.maybe_fail()?;
        self.last_message = Some((line1.into(), line2.map(Into::into)));
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), ()> {
        self.maybe_fail()?;
        self.shut_down = true;
        Ok(())
    }
}

// ============================================================================
// Network mock
// ============================================================================

/// Mock webhook client capturing delivered reports.
#[cfg(feature = "json")]
#[derive(Debug)]
pub struct MockWebhook {
    /// Reports delivered so far.
    pub delivered: Vec<crate::messages::WeightReport>,
    /// Status code returned for each delivery.
    pub status: u16,
    /// When true, deliveries fail at the transport level.
    pub fail: bool,
}

#[cfg(feature = "json")]
impl MockWebhook {
    /// Creates a mock webhook answering 200 to everything.
    pub fn new() -> Self {
        Self {
            delivered: Vec::new(),
            status: 200,
            fail: false,
        }
    }
}

#[cfg(feature = "json")]
impl Default for MockWebhook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "json")]
impl crate::traits::WebhookClient for MockWebhook {
    type Error = ();

    fn send_report(&mut self, report: &crate::messages::WeightReport) -> Result<u16, ()> {
        if self.fail {
            return Err(());
        }
        self.delivered.push(report.clone());
        Ok(self.status)
    }
}

// ============================================================================
// Tests
// ============================================================================
