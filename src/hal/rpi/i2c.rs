//! PCF8574 backpack transport over the Pi's hardware I2C bus.

use crate::traits::{BusError, BusTransport};
use rppal::i2c::{Error as I2cError, I2c};

/// Linux errno for a remote I/O error, raised when the peripheral NAKs.
const EREMOTEIO: i32 = 121;

/// I2C write transport backed by `rppal`.
///
/// The slave address is latched lazily so the common case of talking to
/// one backpack costs a single ioctl per write. A NAK from the expander
/// (unplugged, wrong address) maps to [`BusError::Unreachable`]; any other
/// bus fault maps to [`BusError::IoFailure`].
pub struct RpiI2cBus {
    i2c: I2c,
    current_address: Option<u8>,
}

impl RpiI2cBus {
    /// Opens the given hardware I2C bus.
    pub fn new(bus: u8) -> Result<Self, I2cError> {
        Ok(Self {
            i2c: I2c::with_bus(bus)?,
            current_address: None,
        })
    }

    fn map_error(err: I2cError) -> BusError {
        match err {
            I2cError::Io(io) if io.raw_os_error() == Some(EREMOTEIO) => BusError::Unreachable,
            _ => BusError::IoFailure,
        }
    }
}

impl BusTransport for RpiI2cBus {
    fn write(&mut self, address: u8, byte: u8) -> Result<(), BusError> {
        if self.current_address != Some(address) {
            self.i2c
                .set_slave_address(u16::from(address))
                .map_err(Self::map_error)?;
            self.current_address = Some(address);
        }
        match self.i2c.write(&[byte]) {
            Ok(_) => Ok(()),
            Err(err) => Err(Self::map_error(err)),
        }
    }
}
