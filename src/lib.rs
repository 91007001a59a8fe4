//! Driver for the NXP PCA9685 16-channel, 12-bit PWM LED/servo controller, with a
//! small brightness layer on top for driving LEDs.
//!
//! Datasheet: <https://www.nxp.com/docs/en/data-sheet/PCA9685.pdf>
//!
//! The driver never logs. With the `defmt` feature enabled, [`Error`] and the value
//! types implement `defmt::Format` so applications can log them.
//!
//! ```no_run
//! use pca9685_leds::{ConfigBuilder, Leds};
//!
//! // placeholders, replace with instances from your HAL
//! let mut i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! let mut delay = embedded_hal_mock::eh1::delay::NoopDelay::new();
//!
//! let config = ConfigBuilder::new().address(0x40).frequency(1000);
//! let mut leds = Leds::new_with_i2c(&config, &mut i2c, &mut delay).unwrap();
//!
//! leds.set_brightness(0, 50.0).unwrap();
//! leds.turn_off(0).unwrap();
//! ```

#![cfg_attr(not(test), no_std)]

mod configuration;
pub mod interface;
pub mod leds;
mod register;
pub mod timing;

pub use configuration::{ConfigBuilder, DEFAULT_ADDRESS, DEFAULT_FREQUENCY_HZ};
pub use leds::Leds;
pub use timing::PwmTiming;

use embedded_hal::delay::DelayNs;
use interface::RegisterAccess;
use register::{BitFlags, Register};
use timing::MAX_TICK;

/// Error enum for the PCA9685 driver
///
/// All variants except [`Error::Interface`] are argument errors. They are detected before
/// any bus access, so the chip is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<IE> {
    /// An interface related error has occured
    Interface(IE),

    /// Channel index outside 0..=15
    ChannelOutOfRange,

    /// On or off tick outside 0..=4095
    PwmOutOfRange,

    /// Duty value outside 0..=4095
    DutyOutOfRange,

    /// Brightness outside 0.0..=100.0 %
    BrightnessOutOfRange,

    /// PWM frequency outside 24..=1526 Hz
    FrequencyOutOfRange,

    /// I2C address wider than 7 bit
    AddressOutOfRange,
}

impl<IE> Error<IE> {
    /// True, if the error was caused by an invalid argument rather than the bus.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Error::Interface(_))
    }
}

/// Number of PWM channels
pub const NUM_CHANNELS: u8 = 16;

/// Time to wait after waking the oscillator before restarting the PWM channels
pub const T_OSC_US: u32 = 5000;

pub(crate) fn check_channel<IE>(channel: u8) -> Result<(), Error<IE>> {
    if channel < NUM_CHANNELS {
        Ok(())
    } else {
        Err(Error::ChannelOutOfRange)
    }
}

/// Register level driver for the PCA9685.
pub struct Pca9685<I> {
    interface: I,
}

impl<IE, I2C> Pca9685<interface::I2cInterface<I2C>>
where
    I2C: embedded_hal::i2c::I2c<Error = IE>,
{
    /// Create a driver talking to the chip at the configured address on `i2c`.
    ///
    /// Pass `&mut bus` to keep ownership of the bus with the caller.
    pub fn new_with_i2c<D: DelayNs>(
        config: &ConfigBuilder,
        i2c: I2C,
        delay: &mut D,
    ) -> Result<Pca9685<interface::I2cInterface<I2C>>, Error<IE>> {
        if !config.configuration.address_valid() {
            return Err(Error::AddressOutOfRange);
        }

        Pca9685::new(
            config,
            interface::I2cInterface::new(i2c, config.configuration.address),
            delay,
        )
    }
}

impl<I, IE> Pca9685<I>
where
    I: RegisterAccess<Error = Error<IE>>,
{
    /// Create a new PCA9685 driver instance with the given `config` and `interface`.
    /// A `delay` is required for the oscillator start-up time.
    ///
    /// The chip is reset and the PWM frequency is configured, which also enables
    /// register auto-increment.
    pub fn new<D: DelayNs>(
        config: &ConfigBuilder,
        interface: I,
        delay: &mut D,
    ) -> Result<Pca9685<I>, Error<IE>> {
        if !config.configuration.frequency_valid() {
            return Err(Error::FrequencyOutOfRange);
        }

        let mut driver = Pca9685 { interface };
        driver.reset()?;
        driver.set_frequency(config.configuration.frequency, delay)?;

        Ok(driver)
    }

    /// Puts the chip into normal mode: oscillator running, no auto-increment.
    pub fn reset(&mut self) -> Result<(), Error<IE>> {
        self.interface.write_register(Register::MODE1, 0x00)
    }

    /// Sets the PWM frequency (24..=1526 Hz) of all channels.
    ///
    /// The prescaler can only be written while the oscillator is stopped, so the chip is
    /// put to sleep, the prescaler written, and the previous mode restored. After waiting
    /// [`T_OSC_US`] the channels are restarted with auto-increment enabled.
    pub fn set_frequency<D: DelayNs>(
        &mut self,
        frequency_hz: u16,
        delay: &mut D,
    ) -> Result<(), Error<IE>> {
        let Some(prescale) = timing::prescale_from_frequency(frequency_hz) else {
            return Err(Error::FrequencyOutOfRange);
        };

        let old_mode = self.interface.read_register(Register::MODE1)?;
        self.interface.write_register(
            Register::MODE1,
            (old_mode & BitFlags::MODE1_NO_RESTART_MASK) | BitFlags::MODE1_SLEEP,
        )?;
        self.interface.write_register(Register::PRESCALE, prescale)?;
        self.interface.write_register(Register::MODE1, old_mode)?;
        delay.delay_us(T_OSC_US);
        self.interface
            .write_register(Register::MODE1, old_mode | BitFlags::MODE1_RUN)?;

        Ok(())
    }

    /// Gets the PWM frequency derived from the current prescaler value.
    pub fn get_frequency(&mut self) -> Result<u16, Error<IE>> {
        let prescale = self.interface.read_register(Register::PRESCALE)?;
        Ok(timing::frequency_from_prescale(prescale))
    }

    /// Sets the on and off ticks (0..=4095) of a channel.
    pub fn set_pwm(&mut self, channel: u8, on: u16, off: u16) -> Result<(), Error<IE>> {
        check_channel(channel)?;
        if on > MAX_TICK || off > MAX_TICK {
            return Err(Error::PwmOutOfRange);
        }

        self.write_timing(channel, PwmTiming::new(on, off))
    }

    /// Gets the on and off ticks of a channel, including full on / full off codes.
    pub fn get_pwm(&mut self, channel: u8) -> Result<PwmTiming, Error<IE>> {
        check_channel(channel)?;

        self.read_timing(channel)
    }

    /// Sets the duty value (0..=4095) of a channel. 0 and 4095 switch the output
    /// fully off / fully on.
    ///
    /// With `invert`, `value` is mirrored first, for outputs driven active-low.
    pub fn set_duty(&mut self, channel: u8, value: u16, invert: bool) -> Result<(), Error<IE>> {
        check_channel(channel)?;
        if value > MAX_TICK {
            return Err(Error::DutyOutOfRange);
        }

        let value = if invert {
            timing::invert_duty(value)
        } else {
            value
        };

        self.write_timing(channel, PwmTiming::from_duty(value))
    }

    /// Gets the duty value of a channel. Reading with the same `invert` as used for
    /// [`Self::set_duty`] returns the value that was set.
    pub fn get_duty(&mut self, channel: u8, invert: bool) -> Result<u16, Error<IE>> {
        check_channel(channel)?;

        let duty = self.read_timing(channel)?.duty();

        Ok(if invert {
            timing::invert_duty(duty)
        } else {
            duty
        })
    }

    fn write_timing(&mut self, channel: u8, timing: PwmTiming) -> Result<(), Error<IE>> {
        self.interface
            .write_registers(Register::led_on_l(channel), &timing.to_register_bytes())
    }

    fn read_timing(&mut self, channel: u8) -> Result<PwmTiming, Error<IE>> {
        let mut buffer = [0u8; 4];
        self.interface
            .read_registers(Register::led_on_l(channel), &mut buffer)?;

        Ok(PwmTiming::from_register_bytes(buffer))
    }
}

impl<I2C: embedded_hal::i2c::I2c> Pca9685<interface::I2cInterface<I2C>> {
    /// Destroys the driver and releases the `I2c`-interface.
    pub fn release(self) -> I2C {
        self.interface.release()
    }
}

#[cfg(test)]
impl<I> Pca9685<I> {
    /// Destroys the driver and returns the interface.
    pub(crate) fn into_interface(self) -> I {
        self.interface
    }

    pub(crate) fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }
}
