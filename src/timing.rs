//! Conversions between user-facing units and the chip's register values.

use crate::register::BitFlags;

/// Frequency of the internal oscillator in Hz
pub const OSCILLATOR_HZ: u32 = 25_000_000;

/// Number of ticks per PWM period (12 bit counter)
pub const PWM_STEPS: u32 = 4096;

/// Highest tick position / duty value that can be set
pub const MAX_TICK: u16 = 4095;

/// Lowest PWM frequency reachable with prescale 255
pub const MIN_FREQUENCY_HZ: u16 = 24;

/// Highest PWM frequency reachable with prescale 3
pub const MAX_FREQUENCY_HZ: u16 = 1526;

/// The chip forces prescale values below this to this value
pub const MIN_PRESCALE: u8 = 3;

/// On/off tick positions of one channel within a 4096 tick PWM cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTiming {
    pub on: u16,
    pub off: u16,
}

impl PwmTiming {
    /// Output is always off
    pub const FULL_OFF: PwmTiming = PwmTiming {
        on: 0,
        off: BitFlags::LED_FULL,
    };

    /// Output is always on
    pub const FULL_ON: PwmTiming = PwmTiming {
        on: BitFlags::LED_FULL,
        off: 0,
    };

    pub const fn new(on: u16, off: u16) -> Self {
        PwmTiming { on, off }
    }

    /// Timing for a duty value in 0..=4095. The extremes are mapped to the full off / full on
    /// codes, since the chip can't express them as a regular on/off pair.
    pub const fn from_duty(duty: u16) -> Self {
        match duty {
            0 => Self::FULL_OFF,
            MAX_TICK => Self::FULL_ON,
            _ => PwmTiming { on: 0, off: duty },
        }
    }

    /// Duty value represented by this timing. For regular pairs the `off` position is used.
    pub const fn duty(&self) -> u16 {
        match *self {
            Self::FULL_OFF => 0,
            Self::FULL_ON => MAX_TICK,
            PwmTiming { off, .. } => off,
        }
    }

    /// Register layout: LEDn_ON_L, LEDn_ON_H, LEDn_OFF_L, LEDn_OFF_H
    pub fn to_register_bytes(&self) -> [u8; 4] {
        let mut bytes = [0; 4];
        bytes[..2].copy_from_slice(&self.on.to_le_bytes());
        bytes[2..].copy_from_slice(&self.off.to_le_bytes());
        bytes
    }

    pub fn from_register_bytes(bytes: [u8; 4]) -> Self {
        PwmTiming {
            on: u16::from_le_bytes([bytes[0], bytes[1]]),
            off: u16::from_le_bytes([bytes[2], bytes[3]]),
        }
    }
}

/// Mirrors a duty value, 0 becomes 4095 and vice versa.
pub const fn invert_duty(duty: u16) -> u16 {
    MAX_TICK - duty
}

/// Prescale register value for `frequency_hz`, or `None` outside
/// [`MIN_FREQUENCY_HZ`]..=[`MAX_FREQUENCY_HZ`].
///
/// `round(25 MHz / 4096 / f)`, computed as `floor(x + 0.5)` in integer arithmetic.
pub const fn prescale_from_frequency(frequency_hz: u16) -> Option<u8> {
    if frequency_hz < MIN_FREQUENCY_HZ || frequency_hz > MAX_FREQUENCY_HZ {
        return None;
    }

    let divisor = PWM_STEPS * frequency_hz as u32;
    Some(((2 * OSCILLATOR_HZ + divisor) / (2 * divisor)) as u8)
}

/// PWM frequency resulting from a prescale register value.
///
/// `round(25 MHz / 4096 / (prescale - 0.5))`. The `- 0.5` is not the inverse of the
/// `+ 0.5` in [`prescale_from_frequency`]; both are the chip's documented relation.
pub const fn frequency_from_prescale(prescale: u8) -> u16 {
    let prescale = if prescale < MIN_PRESCALE {
        MIN_PRESCALE
    } else {
        prescale
    };

    // 25 MHz / 4096 / (p - 0.5) == 50 MHz / (4096 * (2p - 1))
    let divisor = PWM_STEPS * (2 * prescale as u32 - 1);
    ((4 * OSCILLATOR_HZ + divisor) / (2 * divisor)) as u16
}

/// Duty value for a brightness in percent, `floor(4095 * percent / 100)`.
/// `percent` has to be in 0.0..=100.0.
///
/// Needs double precision, in `f32` some products round up onto the next integer
/// (41.221 % would give 1688 instead of 1687).
pub fn duty_from_percent(percent: f64) -> u16 {
    (MAX_TICK as f64 * percent / 100.0) as u16
}
