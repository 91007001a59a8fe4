use crate::timing::{MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};

/// Default 7-bit I2C address (A0..A5 tied low)
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Default PWM frequency in Hz
pub const DEFAULT_FREQUENCY_HZ: u16 = 1000;

/// Largest valid 7-bit I2C address
pub const MAX_ADDRESS: u8 = 0x7f;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Configuration {
    pub(crate) address: u8,
    pub(crate) frequency: u16,
}

impl Configuration {
    pub(crate) fn address_valid(&self) -> bool {
        self.address <= MAX_ADDRESS
    }

    pub(crate) fn frequency_valid(&self) -> bool {
        (MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&self.frequency)
    }
}

/// Builder for creating the device configuration.
///
/// Values are validated when the driver is constructed, before the bus is touched.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    pub(crate) configuration: Configuration,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! builder_property {
    ($field:ident, $field_type:path, $doc:literal) => {
        #[doc = $doc]
        pub fn $field(mut self, $field: $field_type) -> Self {
            self.configuration.$field = $field;
            self
        }
    };
}

impl ConfigBuilder {
    /// Create a new configuration with address 0x40 and a PWM frequency of 1 kHz.
    pub fn new() -> Self {
        ConfigBuilder {
            configuration: Configuration {
                address: DEFAULT_ADDRESS,
                frequency: DEFAULT_FREQUENCY_HZ,
            },
        }
    }

    builder_property!(address, u8, "7-bit I2C address of the chip (0x00..=0x7f)");
    builder_property!(frequency, u16, "Output PWM frequency in Hz (24..=1526)");
}
