use embedded_hal::delay::DelayNs;
use pca9685_leds::{ConfigBuilder, Leds, NUM_CHANNELS};

fn main() {
    // placeholders, replace with instances from your HAL
    let mut i2c_bus = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
    let mut delay = embedded_hal_mock::eh1::delay::NoopDelay::new();

    let config = ConfigBuilder::new().frequency(1000);
    let mut leds = match Leds::new_with_i2c(&config, &mut i2c_bus, &mut delay) {
        Ok(leds) => leds,
        Err(e) => {
            eprintln!("failed to set up LEDs: {e:?}");
            return;
        }
    };

    loop {
        // light up one channel after the other
        for channel in 0..NUM_CHANNELS {
            if let Err(e) = leds.set_brightness(channel, 50.0) {
                eprintln!("channel {channel}: {e:?}");
            }
            delay.delay_ms(100);
            if let Err(e) = leds.turn_off(channel) {
                eprintln!("channel {channel}: {e:?}");
            }
        }
    }
}
