use embedded_hal::i2c;

use crate::Error;

/// Trait for giving read and write access to registers
pub trait RegisterAccess {
    type Error;

    /// Reads `data.len()` values from multiple registers, starting from `start_register`
    /// and incrementing the register for every element.
    fn read_registers(&mut self, start_register: u8, data: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes to multiple registers, starting from `start_register` and incrementing
    /// the register by one for every element in `data`.
    fn write_registers(&mut self, start_register: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads a single value from `register`.
    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut buffer: [u8; 1] = [0; 1];
        self.read_registers(register, &mut buffer)?;

        Ok(buffer[0])
    }

    /// Writes a single value to `register`.
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.write_registers(register, &[value])
    }
}

/// Register access over I2C at a fixed 7-bit device address.
///
/// `I2C` may be a bus owned by the interface or a `&mut` borrow of a bus owned by
/// the caller.
pub struct I2cInterface<I2C> {
    pub(crate) i2c: I2C,
    pub(crate) address: u8,
}

impl<I2C> I2cInterface<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// 7-bit device address (excluding the R/W bit)
    pub fn address(&self) -> u8 {
        self.address
    }
}

impl<I2C: i2c::I2c> I2cInterface<I2C> {
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, IE> RegisterAccess for I2cInterface<I2C>
where
    I2C: i2c::I2c<Error = IE>,
{
    type Error = Error<IE>;

    fn read_registers(&mut self, start_register: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        let header = [start_register];
        let mut operations = [i2c::Operation::Write(&header), i2c::Operation::Read(data)];

        self.i2c
            .transaction(self.address, &mut operations)
            .map_err(Error::Interface)?;

        Ok(())
    }

    fn write_registers(&mut self, start_register: u8, data: &[u8]) -> Result<(), Self::Error> {
        let header = [start_register];

        // adjacent writes are merged by the bus, no repeated start between header and data
        let mut operations = [i2c::Operation::Write(&header), i2c::Operation::Write(data)];

        self.i2c
            .transaction(self.address, &mut operations)
            .map_err(Error::Interface)?;

        Ok(())
    }
}
