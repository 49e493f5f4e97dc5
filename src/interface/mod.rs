//! Bus interface abstraction for the BMX160 driver.

pub mod i2c;

/// Abstraction over the low-level bus access required by the driver.
pub trait Bmx160Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Reads multiple consecutive registers into the provided buffer.
    ///
    /// The device auto-increments its register pointer, so one call covers
    /// the whole range starting at `register`.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Performs a single-byte read addressed only to the device, without a
    /// register pointer, to check that something acknowledges.
    fn probe(&mut self) -> core::result::Result<(), Self::Error>;
}
