//! Brightness control for LEDs connected to the PCA9685 outputs.

use embedded_hal::delay::DelayNs;

use crate::{
    check_channel, interface, interface::RegisterAccess, timing, ConfigBuilder, Error, Pca9685,
};

/// LEDs on the 16 channels of a PCA9685, dimmed by percentage.
pub struct Leds<I> {
    driver: Pca9685<I>,
}

impl<IE, I2C> Leds<interface::I2cInterface<I2C>>
where
    I2C: embedded_hal::i2c::I2c<Error = IE>,
{
    /// Create the LED controller for the chip at the configured address on `i2c`.
    pub fn new_with_i2c<D: DelayNs>(
        config: &ConfigBuilder,
        i2c: I2C,
        delay: &mut D,
    ) -> Result<Leds<interface::I2cInterface<I2C>>, Error<IE>> {
        Ok(Leds {
            driver: Pca9685::new_with_i2c(config, i2c, delay)?,
        })
    }

    /// Destroys the controller and releases the `I2c`-interface.
    pub fn release(self) -> I2C {
        self.driver.release()
    }
}

impl<I, IE> Leds<I>
where
    I: RegisterAccess<Error = Error<IE>>,
{
    /// Create the LED controller on top of a freshly reset and configured driver.
    pub fn new<D: DelayNs>(
        config: &ConfigBuilder,
        interface: I,
        delay: &mut D,
    ) -> Result<Leds<I>, Error<IE>> {
        Ok(Leds {
            driver: Pca9685::new(config, interface, delay)?,
        })
    }

    /// Wraps an already configured driver.
    pub fn from_driver(driver: Pca9685<I>) -> Self {
        Leds { driver }
    }

    /// Sets the brightness of the LED on `channel` (0..=15) to `percent` (0.0..=100.0).
    ///
    /// The duty value is truncated, e.g. 50 % results in 2047 of 4095.
    pub fn set_brightness(&mut self, channel: u8, percent: f64) -> Result<(), Error<IE>> {
        check_channel(channel)?;
        if !(0.0..=100.0).contains(&percent) {
            return Err(Error::BrightnessOutOfRange);
        }

        self.driver
            .set_duty(channel, timing::duty_from_percent(percent), false)
    }

    /// Switches the LED on `channel` (0..=15) fully off.
    pub fn turn_off(&mut self, channel: u8) -> Result<(), Error<IE>> {
        check_channel(channel)?;

        self.driver.set_duty(channel, 0, false)
    }

    /// Access to the register level driver, e.g. to change the PWM frequency.
    pub fn driver(&mut self) -> &mut Pca9685<I> {
        &mut self.driver
    }

    pub fn into_driver(self) -> Pca9685<I> {
        self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::mock::{Access, MockInterface, RegisterFile};
    use crate::timing::MAX_TICK;
    use crate::NUM_CHANNELS;

    fn new_simulated() -> Leds<RegisterFile> {
        let mut delay = embedded_hal_mock::eh1::delay::NoopDelay::new();
        Leds::new(&ConfigBuilder::new(), RegisterFile::new(), &mut delay).unwrap()
    }

    fn accesses(leds: &mut Leds<RegisterFile>) -> usize {
        leds.driver().interface_mut().accesses
    }

    #[test]
    fn test_set_brightness() {
        #[rustfmt::skip]
        let interface = MockInterface::new(vec![
            Access::WriteRegister(0x00, 0x00),
            Access::ReadRegister(0x00, 0x00),
            Access::WriteRegister(0x00, 0x10),
            Access::WriteRegister(0xfe, 6),
            Access::WriteRegister(0x00, 0x00),
            Access::WriteRegister(0x00, 0xa1),
            // 50 %
            Access::WriteRegisters(0x06, vec![0x00, 0x00, 0xff, 0x07]),
            // 100 %, full on
            Access::WriteRegisters(0x0a, vec![0x00, 0x10, 0x00, 0x00]),
            // off
            Access::WriteRegisters(0x06, vec![0x00, 0x00, 0x00, 0x10]),
        ]);
        let mut delay = embedded_hal_mock::eh1::delay::NoopDelay::new();

        let mut leds = Leds::new(&ConfigBuilder::new(), interface, &mut delay).unwrap();
        leds.set_brightness(0, 50.0).unwrap();
        leds.set_brightness(1, 100.0).unwrap();
        leds.turn_off(0).unwrap();

        leds.into_driver().into_interface().done();
    }

    #[test]
    fn test_brightness_to_duty() {
        let mut leds = new_simulated();

        for channel in 0..NUM_CHANNELS {
            // (percent, floor(4095 * percent / 100))
            for (percent, expected) in [
                (0.0, 0),
                (0.5, 20),
                (1.0, 40),
                (12.5, 511),
                (33.3, 1363),
                (41.221, 1687),
                (50.0, 2047),
                (75.0, 3071),
                (83.663, 3425),
                (99.9, 4090),
                (100.0, 4095),
            ] {
                leds.set_brightness(channel, percent).unwrap();
                assert_eq!(
                    leds.driver().get_duty(channel, false).unwrap(),
                    expected,
                    "{percent} %"
                );
            }
        }

        leds.set_brightness(4, 0.0).unwrap();
        assert_eq!(leds.driver().get_pwm(4).unwrap(), crate::PwmTiming::FULL_OFF);
        leds.set_brightness(4, 100.0).unwrap();
        assert_eq!(leds.driver().get_pwm(4).unwrap(), crate::PwmTiming::FULL_ON);
    }

    #[test]
    fn test_brightness_sweep() {
        let mut leds = new_simulated();

        // percent = k / 1000, exact duty = floor(4095 * k / 100000)
        for k in 0..=100_000u32 {
            let percent = k as f64 / 1000.0;
            let expected = (MAX_TICK as u32 * k / 100_000) as u16;

            leds.set_brightness(0, percent).unwrap();
            assert_eq!(
                leds.driver().get_duty(0, false).unwrap(),
                expected,
                "{percent} %"
            );
        }
    }

    #[test]
    fn test_turn_off() {
        let mut leds = new_simulated();

        leds.set_brightness(9, 80.0).unwrap();
        leds.turn_off(9).unwrap();

        assert_eq!(leds.driver().get_duty(9, false).unwrap(), 0);
        assert_eq!(leds.driver().get_pwm(9).unwrap(), crate::PwmTiming::FULL_OFF);
    }

    #[test]
    fn test_invalid_arguments() {
        let mut leds = new_simulated();
        let before = accesses(&mut leds);

        assert_eq!(leds.set_brightness(16, 50.0), Err(Error::ChannelOutOfRange));
        assert_eq!(leds.set_brightness(0, -0.1), Err(Error::BrightnessOutOfRange));
        assert_eq!(leds.set_brightness(0, 100.1), Err(Error::BrightnessOutOfRange));
        assert_eq!(leds.set_brightness(0, f64::NAN), Err(Error::BrightnessOutOfRange));
        assert_eq!(leds.turn_off(16), Err(Error::ChannelOutOfRange));

        assert_eq!(accesses(&mut leds), before);
    }

    #[test]
    fn test_new_invalid_frequency() {
        let mut i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
        let mut delay = embedded_hal_mock::eh1::delay::NoopDelay::new();

        let config = ConfigBuilder::new().frequency(23);
        let result = Leds::new_with_i2c(&config, &mut i2c, &mut delay);
        assert!(matches!(result, Err(Error::FrequencyOutOfRange)));

        i2c.done();
    }

    #[test]
    fn test_interface_error() {
        let mut leds = new_simulated();
        leds.driver().interface_mut().failing = true;

        assert_eq!(leds.set_brightness(0, 10.0), Err(Error::Interface(())));
        assert_eq!(leds.turn_off(0), Err(Error::Interface(())));
    }
}
