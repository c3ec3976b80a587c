//! Bit-banged HX711 load cell amplifier driver.

use crate::traits::LoadCellInput;
use rppal::gpio::{Gpio, InputPin, OutputPin};
use std::thread;
use std::time::{Duration, Instant};

/// How long to wait for the amplifier to signal a conversion.
const READY_TIMEOUT_MS: u64 = 500;

/// Power-down hold time; 60us of SCK high resets the chip.
const RESET_HOLD_US: u64 = 100;

/// HX711 driver errors.
#[derive(Debug)]
pub enum Hx711Error {
    /// GPIO setup or access failed.
    Gpio(rppal::gpio::Error),
    /// The amplifier never pulled DOUT low within the timeout.
    NotReady,
}

impl core::fmt::Display for Hx711Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Hx711Error::Gpio(err) => write!(f, "hx711 gpio error: {}", err),
            Hx711Error::NotReady => write!(f, "hx711 not ready within timeout"),
        }
    }
}

impl std::error::Error for Hx711Error {}

impl From<rppal::gpio::Error> for Hx711Error {
    fn from(err: rppal::gpio::Error) -> Self {
        Hx711Error::Gpio(err)
    }
}

/// One HX711 channel, bit-banged over a DOUT/SCK pin pair.
///
/// Conversions are read at gain 128 (channel A, 25 clock pulses). The
/// 24-bit two's complement result is sign extended to `i32`.
pub struct RpiHx711 {
    dout: InputPin,
    sck: OutputPin,
}

impl RpiHx711 {
    /// Claims the pin pair for one amplifier.
    pub fn new(gpio: &Gpio, dout_pin: u8, sck_pin: u8) -> Result<Self, Hx711Error> {
        let dout = gpio.get(dout_pin)?.into_input();
        let mut sck = gpio.get(sck_pin)?.into_output();
        sck.set_low();
        Ok(Self { dout, sck })
    }

    /// Claims and resets all four amplifiers in channel order.
    pub fn open_all(gpio: &Gpio, pins: [(u8, u8); 4]) -> Result<[Self; 4], Hx711Error> {
        let mut cells = Vec::with_capacity(4);
        for (dout, sck) in pins {
            let mut cell = Self::new(gpio, dout, sck)?;
            cell.reset()?;
            cells.push(cell);
        }
        // Vec of exactly 4 elements, the conversion cannot fail
        Ok(cells
            .try_into()
            .unwrap_or_else(|_| unreachable!("four pin pairs were opened")))
    }

    fn is_ready(&self) -> bool {
        self.dout.is_low()
    }

    fn wait_ready(&self) -> Result<(), Hx711Error> {
        let deadline = Instant::now() + Duration::from_millis(READY_TIMEOUT_MS);
        while !self.is_ready() {
            if Instant::now() >= deadline {
                return Err(Hx711Error::NotReady);
            }
            thread::sleep(Duration::from_micros(100));
        }
        Ok(())
    }

    fn clock_bit(&mut self) -> u32 {
        self.sck.set_high();
        spin_us(1);
        let bit = u32::from(self.dout.is_high());
        self.sck.set_low();
        spin_us(1);
        bit
    }
}

/// Short busy wait; thread::sleep overshoots badly at microsecond scale
/// and the HX711 powers down if SCK stays high longer than 60us.
fn spin_us(us: u64) {
    let deadline = Instant::now() + Duration::from_micros(us);
    while Instant::now() < deadline {
        core::hint::spin_loop();
    }
}

impl LoadCellInput for RpiHx711 {
    type Error = Hx711Error;

    fn read_raw(&mut self) -> Result<i32, Hx711Error> {
        self.wait_ready()?;

        let mut raw: u32 = 0;
        for _ in 0..24 {
            raw = (raw << 1) | self.clock_bit();
        }
        // 25th pulse selects channel A at gain 128 for the next conversion
        self.clock_bit();

        // sign extend from 24 bits
        if raw & 0x80_0000 != 0 {
            raw |= 0xFF00_0000;
        }
        Ok(raw as i32)
    }

    fn reset(&mut self) -> Result<(), Hx711Error> {
        self.sck.set_high();
        thread::sleep(Duration::from_micros(RESET_HOLD_US));
        self.sck.set_low();
        Ok(())
    }
}
