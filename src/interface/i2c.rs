//! I²C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::I2c;

use super::Bmx160Interface;
use crate::registers::{I2C_ADDRESS_PRIMARY, I2C_ADDRESS_SECONDARY};

/// I²C-based interface implementation for the BMX160 driver.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface at the default address `0x68`.
    pub const fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, I2C_ADDRESS_PRIMARY)
    }

    /// Creates a new interface at the alternative address `0x69` (SDO high).
    pub const fn alternative(i2c: I2C) -> Self {
        Self::with_address(i2c, I2C_ADDRESS_SECONDARY)
    }

    /// Creates a new interface at an arbitrary 7-bit address.
    pub const fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Returns the 7-bit device address in use.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Provides mutable access to the wrapped bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Bmx160Interface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_many(register, &mut value)?;
        Ok(value[0])
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        self.i2c.write_read(self.address, &[register], buf)
    }

    fn probe(&mut self) -> core::result::Result<(), Self::Error> {
        let mut scratch = [0u8; 1];
        self.i2c.read(self.address, &mut scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::I2cInterface;
    use crate::interface::Bmx160Interface;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    #[test]
    fn write_register_sends_register_then_value() {
        let expectations = [Transaction::write(0x68, vec![0x7E, 0xB6])];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations));

        interface.write_register(0x7E, 0xB6).unwrap();

        interface.release().done();
    }

    #[test]
    fn read_many_sets_pointer_and_fills_buffer() {
        let expectations = [Transaction::write_read(
            0x68,
            vec![0x04],
            vec![0x34, 0x12, 0xCD, 0xAB],
        )];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations));

        let mut buffer = [0u8; 4];
        interface.read_many(0x04, &mut buffer).unwrap();
        assert_eq!(buffer, [0x34, 0x12, 0xCD, 0xAB]);

        interface.release().done();
    }

    #[test]
    fn read_register_reuses_read_many() {
        let expectations = [Transaction::write_read(0x68, vec![0x00], vec![0xD8])];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations));

        assert_eq!(interface.read_register(0x00).unwrap(), 0xD8);

        interface.release().done();
    }

    #[test]
    fn read_many_ignores_empty_buffer() {
        let expectations: [Transaction; 0] = [];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations));

        interface.read_many(0x04, &mut []).unwrap();

        interface.release().done();
    }

    #[test]
    fn probe_reads_one_byte_without_register() {
        let expectations = [Transaction::read(0x69, vec![0x00])];
        let mut interface = I2cInterface::alternative(I2cMock::new(&expectations));

        assert_eq!(interface.address(), 0x69);
        interface.probe().unwrap();

        interface.release().done();
    }

    #[test]
    fn probe_surfaces_bus_error() {
        let expectations = [Transaction::read(0x68, vec![0x00]).with_error(ErrorKind::Other)];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations));

        assert_eq!(interface.probe(), Err(ErrorKind::Other));

        interface.release().done();
    }
}
