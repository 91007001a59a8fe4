/// PCA9685 registers
///
/// Register table: <https://www.nxp.com/docs/en/data-sheet/PCA9685.pdf>
pub struct Register;
impl Register {
    pub const MODE1: u8 = 0x00;

    // Order of channel registers, 4 per channel:
    //  - LEDn_ON_L, LEDn_ON_H, LEDn_OFF_L, LEDn_OFF_H
    pub const LED0_ON_L: u8 = 0x06;
    pub const fn led_on_l(channel: u8) -> u8 {
        Self::LED0_ON_L + 4 * channel
    }

    pub const PRESCALE: u8 = 0xFE;
}

/// Bitflags for registers
pub struct BitFlags;
impl BitFlags {
    pub const MODE1_ALLCALL: u8 = 1 << 0;
    pub const MODE1_SLEEP: u8 = 1 << 4;
    pub const MODE1_AI: u8 = 1 << 5;
    pub const MODE1_RESTART: u8 = 1 << 7;

    /// Everything but the restart bit
    pub const MODE1_NO_RESTART_MASK: u8 = !Self::MODE1_RESTART;

    /// Restart + auto-increment + all-call, set once the oscillator has stabilized.
    pub const MODE1_RUN: u8 = Self::MODE1_RESTART | Self::MODE1_AI | Self::MODE1_ALLCALL;

    /// Bit 4 of LEDn_ON_H / LEDn_OFF_H, full on / full off.
    pub const LED_FULL: u16 = 1 << 12;
}
