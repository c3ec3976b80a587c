//! Integration tests for the 4-bit LCD protocol.
//!
//! These tests drive the driver against the journaling mock bus and verify
//! the exact write words and hold times reaching the expander, without any
//! hardware attached.

use rs_scale::hal::{mock_lcd_bus, BusEvent, MockBus, MockDelay};
use rs_scale::lcd::{
    Lcd1602, CLEAR_EXECUTE_US, ENABLE_PULSE_US, POWER_ON_SETTLE_MS, RESET_SETTLE_FIRST_US,
    RESET_SETTLE_SECOND_US,
};
use rs_scale::traits::{BusError, StationDisplay};
use rs_scale::ScaleReading;

const ADDR: u8 = 0x27;
const BACKLIGHT: u8 = 0b0000_1000;
const ENABLE: u8 = 0b0000_0100;
const REGISTER_SELECT: u8 = 0b0000_0001;

/// Writes emitted during a successful initialization handshake:
/// 4 raw nibbles (3 writes each) plus 4 configuration bytes (6 writes each).
const INIT_WRITE_COUNT: usize = 36;

// ============================================================================
// Expected-sequence helpers
// ============================================================================

/// The three writes and two holds latching one nibble.
fn nibble_events(data: u8, control: u8) -> Vec<BusEvent> {
    let word = data | control | BACKLIGHT;
    vec![
        BusEvent::Write {
            address: ADDR,
            byte: word,
        },
        BusEvent::Write {
            address: ADDR,
            byte: word | ENABLE,
        },
        BusEvent::DelayUs(ENABLE_PULSE_US),
        BusEvent::Write {
            address: ADDR,
            byte: word,
        },
        BusEvent::DelayUs(ENABLE_PULSE_US),
    ]
}

/// One byte as a high/low nibble pair.
fn byte_events(byte: u8, control: u8) -> Vec<BusEvent> {
    let mut events = nibble_events(byte & 0xF0, control);
    events.extend(nibble_events((byte << 4) & 0xF0, control));
    events
}

/// Reconstructs the bytes written in data mode from the journal.
///
/// Each nibble is latched exactly once with the enable bit high, so the
/// enable writes carrying the register-select bit are the character stream.
fn decode_data_bytes(writes: &[(u8, u8)]) -> Vec<u8> {
    let nibbles: Vec<u8> = writes
        .iter()
        .filter(|(_, byte)| byte & ENABLE != 0 && byte & REGISTER_SELECT != 0)
        .map(|(_, byte)| byte & 0xF0)
        .collect();
    nibbles
        .chunks(2)
        .map(|pair| pair[0] | (pair[1] >> 4))
        .collect()
}

fn reading_of(total: f64) -> ScaleReading {
    ScaleReading {
        total_grams: total,
        cells: [total / 4.0; 4],
        valid: [true; 4],
    }
}

// ============================================================================
// Initialization handshake
// ============================================================================

#[test]
fn initialization_emits_exact_handshake() {
    let (bus, delay, journal) = mock_lcd_bus();
    let _lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();

    let mut expected = vec![BusEvent::DelayUs(POWER_ON_SETTLE_MS * 1000)];

    // Function reset, three times with decreasing settles
    expected.extend(nibble_events(0x30, 0));
    expected.push(BusEvent::DelayUs(RESET_SETTLE_FIRST_US));
    expected.extend(nibble_events(0x30, 0));
    expected.push(BusEvent::DelayUs(RESET_SETTLE_SECOND_US));
    expected.extend(nibble_events(0x30, 0));

    // Lock 4-bit mode
    expected.extend(nibble_events(0x20, 0));

    // Function set: 4-bit, 2 lines, 5x8 font
    expected.extend(byte_events(0x28, 0));
    // Display on, cursor and blink off
    expected.extend(byte_events(0x0C, 0));
    // Clear with its execution delay
    expected.extend(byte_events(0x01, 0));
    expected.push(BusEvent::DelayUs(CLEAR_EXECUTE_US));
    // Entry mode: auto-increment
    expected.extend(byte_events(0x06, 0));
    expected.push(BusEvent::DelayUs(CLEAR_EXECUTE_US));

    assert_eq!(journal.events(), expected);
    assert_eq!(journal.write_count(), INIT_WRITE_COUNT);
}

#[test]
fn initialization_failure_is_fatal() {
    let mut bus = MockBus::new();
    bus.fail_on_write(0, BusError::Unreachable);

    let result = Lcd1602::initialize(ADDR, bus, MockDelay::new());
    assert_eq!(result.err(), Some(BusError::Unreachable));
}

#[test]
fn initialization_failure_mid_handshake_propagates() {
    let mut bus = MockBus::new();
    let journal = bus.journal();
    bus.fail_on_write(17, BusError::IoFailure);

    let result = Lcd1602::initialize(ADDR, bus, MockDelay::new());
    assert_eq!(result.err(), Some(BusError::IoFailure));
    // The handshake stopped at the failing write, nothing else was sent
    assert_eq!(journal.write_count(), 17);
}

// ============================================================================
// Nibble pairing and addressing
// ============================================================================

#[test]
fn set_cursor_sends_ddram_command() {
    let (bus, delay, journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    journal.clear();

    lcd.set_cursor(5, 1).unwrap();

    // Set-DDRAM 0x80 | 0x45, split into high then low nibble
    assert_eq!(journal.events(), byte_events(0xC5, 0));
}

#[test]
fn print_splits_every_byte_high_nibble_first() {
    let (bus, delay, journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    journal.clear();

    lcd.print("A", 0, 0).unwrap();

    let mut expected = byte_events(0x80, 0);
    expected.extend(byte_events(0x41, REGISTER_SELECT));
    assert_eq!(journal.events(), expected);
}

#[test]
#[should_panic(expected = "cursor column out of range")]
fn print_rejects_column_past_edge() {
    let (bus, delay, _journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    let _ = lcd.print("x", 16, 0);
}

#[test]
#[should_panic(expected = "unsupported display glyph")]
fn print_rejects_unsupported_glyph() {
    let (bus, delay, _journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    let _ = lcd.print("°C", 0, 0);
}

// ============================================================================
// Backlight persistence
// ============================================================================

#[test]
fn backlight_bit_rides_every_write() {
    let (bus, delay, journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();

    lcd.print("Weight: 12.3kg", 0, 1).unwrap();

    assert!(journal
        .writes()
        .iter()
        .all(|(_, byte)| byte & BACKLIGHT != 0));
}

#[test]
fn backlight_off_clears_bit_on_subsequent_writes() {
    let (bus, delay, journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    journal.clear();

    lcd.backlight_off().unwrap();
    assert_eq!(journal.writes(), vec![(ADDR, 0x00)]);
    assert!(!lcd.backlight());

    journal.clear();
    lcd.print("dark", 0, 0).unwrap();
    assert!(journal
        .writes()
        .iter()
        .all(|(_, byte)| byte & BACKLIGHT == 0));
}

#[test]
fn backlight_on_restores_bit() {
    let (bus, delay, journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    lcd.backlight_off().unwrap();

    journal.clear();
    lcd.backlight_on().unwrap();
    assert_eq!(journal.writes(), vec![(ADDR, BACKLIGHT)]);

    journal.clear();
    lcd.print("lit", 0, 0).unwrap();
    assert!(journal
        .writes()
        .iter()
        .all(|(_, byte)| byte & BACKLIGHT != 0));
}

// ============================================================================
// Execution delays
// ============================================================================

#[test]
fn clear_enforces_execution_delay_every_time() {
    let (bus, delay, journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    journal.clear();

    lcd.clear().unwrap();
    lcd.clear().unwrap();

    let trailing_delays: Vec<u32> = journal
        .events()
        .chunks(11) // 10 nibble events per clear command, then its execution delay
        .map(|chunk| match chunk.last() {
            Some(BusEvent::DelayUs(us)) => *us,
            other => panic!("expected execution delay, got {:?}", other),
        })
        .collect();

    assert_eq!(trailing_delays.len(), 2);
    for us in trailing_delays {
        assert!(us >= 1520, "clear execution delay too short: {}us", us);
    }
}

// ============================================================================
// Steady-state failures
// ============================================================================

#[test]
fn steady_state_failure_returned_without_retry() {
    let (mut bus, delay, journal) = mock_lcd_bus();
    // Initialization takes exactly INIT_WRITE_COUNT writes; fail the next one
    bus.fail_on_write(INIT_WRITE_COUNT, BusError::IoFailure);

    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    assert_eq!(journal.write_count(), INIT_WRITE_COUNT);

    assert_eq!(lcd.clear(), Err(BusError::IoFailure));
    // No retry traffic followed the failed write
    assert_eq!(journal.write_count(), INIT_WRITE_COUNT);

    // The handle stays usable for the next attempt
    assert!(lcd.clear().is_ok());
}

// ============================================================================
// Full rendering scenario
// ============================================================================

#[test]
fn render_writes_padded_weight_line() {
    let (bus, delay, journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    journal.clear();

    lcd.render(&reading_of(12_345.0)).unwrap();

    let writes = journal.writes();
    let text: Vec<u8> = decode_data_bytes(&writes);

    // Two full 16-column rows, every byte as one nibble pair
    assert_eq!(text.len(), 32);
    assert_eq!(&text[..16], b"Weight Scale    ");
    assert_eq!(&text[16..], b"Weight: 12.345kg");

    // Row 1 started at DDRAM address 0x40
    let cursor_commands: Vec<u8> = writes
        .iter()
        .filter(|(_, byte)| byte & ENABLE != 0 && byte & REGISTER_SELECT == 0)
        .map(|(_, byte)| byte & 0xF0)
        .collect::<Vec<u8>>()
        .chunks(2)
        .map(|pair| pair[0] | (pair[1] >> 4))
        .collect();
    assert_eq!(cursor_commands, vec![0x80, 0xC0]);
}

#[test]
fn padded_line_on_row_one_is_sixteen_nibble_pairs() {
    let (bus, delay, journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    journal.clear();

    lcd.print("Weight: 12.3kg  ", 0, 1).unwrap();

    let writes = journal.writes();

    // One cursor command addressing DDRAM 0x40, then the characters
    let first_command: Vec<u8> = writes
        .iter()
        .take(6)
        .filter(|(_, byte)| byte & ENABLE != 0)
        .map(|(_, byte)| byte & 0xF0)
        .collect();
    assert_eq!(first_command[0] | (first_command[1] >> 4), 0xC0);

    // Exactly 16 data-mode nibble pairs, all carrying backlight and select
    let data_latches: Vec<u8> = writes
        .iter()
        .filter(|(_, byte)| byte & ENABLE != 0 && byte & REGISTER_SELECT != 0)
        .map(|(_, byte)| *byte)
        .collect();
    assert_eq!(data_latches.len(), 32);
    assert!(data_latches.iter().all(|byte| byte & BACKLIGHT != 0));
    assert_eq!(decode_data_bytes(&writes), b"Weight: 12.3kg  ");
}

#[test]
fn shutdown_sequence_blanks_and_darkens() {
    let (bus, delay, journal) = mock_lcd_bus();
    let mut lcd = Lcd1602::initialize(ADDR, bus, delay).unwrap();
    journal.clear();

    lcd.shutdown().unwrap();

    let writes = journal.writes();
    let text = decode_data_bytes(&writes);
    assert_eq!(&text[..16], b"System          ");
    assert_eq!(&text[16..], b"Shutdown        ");

    // The final write drops the backlight
    assert_eq!(writes.last(), Some(&(ADDR, 0x00)));
}
