//! HD44780 character display driver (LCD1602 on a PCF8574 I2C backpack).
//!
//! This is the protocol core of the crate: it turns single-byte register
//! writes on the I2C bus into the stateful 4-bit parallel protocol the
//! display controller speaks. Every byte reaching the controller travels as
//! two 4-bit halves, each latched by a timed enable pulse, and every write
//! word carries the backlight bit alongside the data so unrelated traffic
//! never toggles the backlight.
//!
//! # Write word layout
//!
//! ```text
//! bit 7..4  data nibble (high or low half of the byte)
//! bit 3     backlight
//! bit 2     enable strobe (latches on the high-to-low edge)
//! bit 1     read/write (always write here)
//! bit 0     register select (0 = command, 1 = character data)
//! ```
//!
//! # Example
//!
//! ```rust
//! use rs_scale::hal::mock_lcd_bus;
//! use rs_scale::lcd::Lcd1602;
//!
//! let (bus, delay, _journal) = mock_lcd_bus();
//! let mut lcd = Lcd1602::initialize(0x27, bus, delay).unwrap();
//! lcd.print("Weight: 12.3kg", 0, 1).unwrap();
//! ```
//!
//! # Concurrency
//!
//! Single-threaded, synchronous, blocking. The handle exclusively owns the
//! bus; interleaved writes from a second caller would corrupt the
//! nibble-pairing state, so sharing across threads requires an external
//! owner (mutex or actor) serializing every call.

use crate::scale::ScaleReading;
use crate::traits::{BusError, BusTransport, Delay, StationDisplay};
use core::fmt::Write as _;
use heapless::String as HString;

/// Number of visible character columns.
pub const LCD_COLS: u8 = 16;
/// Number of display rows.
pub const LCD_ROWS: u8 = 2;

// Controller instructions
const CMD_CLEAR: u8 = 0x01;
const CMD_HOME: u8 = 0x02;
const CMD_ENTRY_MODE: u8 = 0x04;
const CMD_DISPLAY_CONTROL: u8 = 0x08;
const CMD_FUNCTION_SET: u8 = 0x20;
const CMD_SET_DDRAM: u8 = 0x80;

// Instruction flags
const DISPLAY_ON: u8 = 0x04;
const TWO_LINE: u8 = 0x08;
const FONT_5X8: u8 = 0x00;
const ENTRY_INCREMENT: u8 = 0x02;

// Expander control bits sharing the write word with the data nibble
const BACKLIGHT: u8 = 0b0000_1000;
const ENABLE: u8 = 0b0000_0100;
const REGISTER_SELECT: u8 = 0b0000_0001;

/// DDRAM base address of each row.
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Settle time after power-on before the reset sequence may start.
pub const POWER_ON_SETTLE_MS: u32 = 50;
/// Settle after the first function-set reset write (datasheet minimum 4.1 ms).
pub const RESET_SETTLE_FIRST_US: u32 = 5_000;
/// Settle after the second function-set reset write (datasheet minimum 100 us).
pub const RESET_SETTLE_SECOND_US: u32 = 1_000;
/// Enable strobe hold time, applied high and low.
///
/// Shorter than some clone controllers document; treat as a floor and
/// validate against target hardware.
pub const ENABLE_PULSE_US: u32 = 100;
/// Execution time of the clear and home instructions (datasheet 1.52 ms).
pub const CLEAR_EXECUTE_US: u32 = 2_000;

/// Register addressed by a byte write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Instruction register (clear, home, function set, cursor address...).
    Command,
    /// Data register (character codes).
    Data,
}

impl Mode {
    const fn bits(self) -> u8 {
        match self {
            Mode::Command => 0,
            Mode::Data => REGISTER_SELECT,
        }
    }
}

/// Computes the DDRAM address of a character cell.
///
/// Row 0 starts at `0x00`, row 1 at `0x40`; the column is added to the row
/// base. Out-of-range positions are a caller contract violation and panic
/// rather than wrap - silent clamping would hide addressing bugs as garbled
/// but plausible output.
///
/// # Panics
///
/// Panics if `col > 15` or `row > 1`.
///
/// # Example
///
/// ```rust
/// use rs_scale::lcd::ddram_address;
///
/// assert_eq!(ddram_address(0, 0), 0x00);
/// assert_eq!(ddram_address(5, 1), 0x45);
/// assert_eq!(ddram_address(15, 1), 0x4F);
/// ```
pub fn ddram_address(col: u8, row: u8) -> u8 {
    assert!(col < LCD_COLS, "cursor column out of range: {}", col);
    assert!(row < LCD_ROWS, "cursor row out of range: {}", row);
    ROW_OFFSETS[row as usize] + col
}

/// Maps a character to its controller glyph code.
///
/// Only the ASCII range `0x20..=0x7E` of the controller's ROM is supported;
/// anything else is a caller contract violation (callers pre-map to
/// supported codes).
///
/// # Panics
///
/// Panics if the character has no supported glyph.
fn glyph_code(c: char) -> u8 {
    assert!(
        c.is_ascii() && matches!(c as u8, 0x20..=0x7E),
        "unsupported display glyph: {:?}",
        c
    );
    c as u8
}

/// Handle to one physical LCD1602 display.
///
/// Owns the bus transport, the delay source, the fixed peripheral address,
/// and the persisted backlight state. The only way to obtain a handle is
/// [`Lcd1602::initialize`], which runs the full 4-bit handshake - there is
/// no representable uninitialized state.
///
/// # Failure semantics
///
/// Any transport failure during initialization is fatal and propagated; the
/// controller state is unknown and unsafe to keep configuring. Failures
/// during steady-state operations are returned per call with no automatic
/// retry - a missed enable pulse cannot be detected after the fact, and a
/// blind retry risks corrupting the cursor state further. A failed write
/// degrades to "last successfully rendered content remains".
pub struct Lcd1602<B: BusTransport, D: Delay> {
    bus: B,
    delay: D,
    address: u8,
    backlight: bool,
}

impl<B: BusTransport, D: Delay> Lcd1602<B, D> {
    /// Runs the power-on handshake and returns a configured handle.
    ///
    /// The sequence is mandated by the controller's power-on reset
    /// ambiguity and must not be shortened or reordered: three repeated
    /// function-set nibbles with decreasing settle delays force the
    /// controller out of whatever half-reset state it woke up in, then a
    /// single `0x20` nibble locks 4-bit mode. From that point the
    /// controller accepts only paired nibble writes, and the remaining
    /// configuration (2-line 5x8 font, display on with cursor and blink
    /// off, clear, auto-increment entry mode) goes through the byte
    /// primitive.
    pub fn initialize(address: u8, bus: B, delay: D) -> Result<Self, BusError> {
        let mut lcd = Self {
            bus,
            delay,
            address,
            backlight: true,
        };

        lcd.delay.delay_ms(POWER_ON_SETTLE_MS);

        // Function reset: 8-bit function-set nibble, three times
        lcd.write_nibble(0x03 << 4)?;
        lcd.delay.delay_us(RESET_SETTLE_FIRST_US);
        lcd.write_nibble(0x03 << 4)?;
        lcd.delay.delay_us(RESET_SETTLE_SECOND_US);
        lcd.write_nibble(0x03 << 4)?;

        // Lock 4-bit interface mode
        lcd.write_nibble(0x02 << 4)?;

        lcd.command(CMD_FUNCTION_SET | TWO_LINE | FONT_5X8)?;
        lcd.command(CMD_DISPLAY_CONTROL | DISPLAY_ON)?;
        lcd.clear()?;
        lcd.command(CMD_ENTRY_MODE | ENTRY_INCREMENT)?;
        lcd.delay.delay_us(CLEAR_EXECUTE_US);

        Ok(lcd)
    }

    /// The fixed peripheral address this handle writes to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Current backlight state.
    pub fn backlight(&self) -> bool {
        self.backlight
    }

    fn backlight_mask(&self) -> u8 {
        if self.backlight {
            BACKLIGHT
        } else {
            0
        }
    }

    /// Puts one nibble on the bus and latches it with an enable pulse.
    ///
    /// Three transport writes: data with enable low, data with enable high
    /// (held for the minimum pulse width), data with enable low again (held
    /// for the same minimum). The controller latches on the high-to-low
    /// transition; omitting either hold silently corrupts the display.
    fn write_nibble(&mut self, data: u8) -> Result<(), BusError> {
        let backlight = self.backlight_mask();
        self.bus.write(self.address, data | backlight)?;
        self.bus.write(self.address, data | ENABLE | backlight)?;
        self.delay.delay_us(ENABLE_PULSE_US);
        self.bus.write(self.address, (data & !ENABLE) | backlight)?;
        self.delay.delay_us(ENABLE_PULSE_US);
        Ok(())
    }

    /// Writes one byte as a high-nibble/low-nibble pair.
    fn write_byte(&mut self, byte: u8, mode: Mode) -> Result<(), BusError> {
        let select = mode.bits();
        self.write_nibble(select | (byte & 0xF0))?;
        self.write_nibble(select | ((byte << 4) & 0xF0))
    }

    fn command(&mut self, byte: u8) -> Result<(), BusError> {
        self.write_byte(byte, Mode::Command)
    }

    /// Clears the display and waits out the instruction's execution time.
    ///
    /// The controller ignores writes issued before the clear completes, so
    /// the driver enforces the delay itself, on every call - there is no
    /// fast path for repeated clears.
    pub fn clear(&mut self) -> Result<(), BusError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_EXECUTE_US);
        Ok(())
    }

    /// Returns the cursor to (0, 0) without clearing.
    pub fn home(&mut self) -> Result<(), BusError> {
        self.command(CMD_HOME)?;
        self.delay.delay_us(CLEAR_EXECUTE_US);
        Ok(())
    }

    /// Moves the cursor to `(col, row)`, zero-based.
    ///
    /// # Panics
    ///
    /// Panics if `col > 15` or `row > 1` (see [`ddram_address`]).
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), BusError> {
        self.command(CMD_SET_DDRAM | ddram_address(col, row))
    }

    /// Prints `text` starting at `(col, row)`.
    ///
    /// Writes each character code in data mode in sequence. Does not wrap
    /// and does not blank the remainder of the line; callers wanting
    /// fixed-width output pad the string themselves.
    ///
    /// # Panics
    ///
    /// Panics on out-of-range positions or characters outside the
    /// controller's glyph set.
    pub fn print(&mut self, text: &str, col: u8, row: u8) -> Result<(), BusError> {
        self.set_cursor(col, row)?;
        for c in text.chars() {
            self.write_byte(glyph_code(c), Mode::Data)?;
        }
        Ok(())
    }

    /// Turns the backlight on.
    ///
    /// Updates the persisted state and issues one bare write of the
    /// backlight bit so the change is visible even with no character
    /// write pending.
    pub fn backlight_on(&mut self) -> Result<(), BusError> {
        self.backlight = true;
        self.bus.write(self.address, BACKLIGHT)
    }

    /// Turns the backlight off.
    pub fn backlight_off(&mut self) -> Result<(), BusError> {
        self.backlight = false;
        self.bus.write(self.address, 0x00)
    }
}

/// Pads (or truncates) a line to the full display width.
///
/// Blanking the remainder of the line this way avoids a 2 ms clear on
/// every refresh.
fn pad_line(text: &str) -> HString<16> {
    let mut line: HString<16> = HString::new();
    for c in text.chars().take(LCD_COLS as usize) {
        let _ = line.push(c);
    }
    while line.len() < LCD_COLS as usize {
        let _ = line.push(' ');
    }
    line
}

impl<B: BusTransport, D: Delay> StationDisplay for Lcd1602<B, D> {
    type Error = BusError;

    fn clear(&mut self) -> Result<(), BusError> {
        Lcd1602::clear(self)
    }

    fn render(&mut self, reading: &ScaleReading) -> Result<(), BusError> {
        self.print(&pad_line("Weight Scale"), 0, 0)?;

        let mut line: HString<16> = HString::new();
        let _ = write!(line, "Weight: {}", crate::scale::format_weight(reading.total_grams));
        self.print(&pad_line(&line), 0, 1)
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), BusError> {
        self.print(&pad_line(line1), 0, 0)?;
        self.print(&pad_line(line2.unwrap_or("")), 0, 1)
    }

    fn shutdown(&mut self) -> Result<(), BusError> {
        self.show_message("System", Some("Shutdown"))?;
        self.delay.delay_ms(1000);
        Lcd1602::clear(self)?;
        self.backlight_off()
    }
}
