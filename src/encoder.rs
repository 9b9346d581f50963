//! Per-LED encoding of a color and brightness into 24 duty-cycle slots.
//!
//! WS2812 expects green, red, then blue, each most-significant bit first. Every bit becomes one
//! slot holding either the `0`-bit or the `1`-bit compare value from [`DutyCycles`].

use smart_leds::RGB8;

use crate::slot::{DutyCycles, DutySlot, SLOTS_PER_LED};

/// Brightness as a percentage, `0..=100`.
///
/// Converting from a larger `u8` saturates at 100.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Brightness(u8);

impl Brightness {
    /// 0 %: every channel encodes as zero bits.
    pub const OFF: Self = Self(0);

    /// 100 %: channels are encoded unscaled.
    pub const FULL: Self = Self(100);

    /// Create from a percentage, saturating at 100.
    #[must_use]
    pub const fn percent(percent: u8) -> Self {
        if percent > 100 { Self::FULL } else { Self(percent) }
    }

    /// The percentage, `0..=100`.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::FULL
    }
}

impl From<u8> for Brightness {
    fn from(percent: u8) -> Self {
        Self::percent(percent)
    }
}

/// Scale one channel by a brightness percentage, truncating toward zero.
///
/// `scale_channel(255, 50.into())` is `127`, not `128`.
#[must_use]
pub const fn scale_channel(value: u8, brightness: Brightness) -> u8 {
    // 255 * 100 / 100 fits back into u8.
    (value as u16 * brightness.0 as u16 / 100) as u8
}

/// Encode one LED into `slots`.
///
/// Only the 24 given slots are written.
pub fn encode_led<S: DutySlot>(
    color: RGB8,
    brightness: Brightness,
    duty_cycles: &DutyCycles<S>,
    slots: &mut [S; SLOTS_PER_LED],
) {
    let channels = [color.g, color.r, color.b].map(|value| scale_channel(value, brightness));
    for (channel_slots, value) in slots.chunks_exact_mut(8).zip(channels) {
        encode_byte(value, duty_cycles, channel_slots);
    }
}

fn encode_byte<S: DutySlot>(value: u8, duty_cycles: &DutyCycles<S>, slots: &mut [S]) {
    for (slot, shift) in slots.iter_mut().zip((0..8u8).rev()) {
        *slot = duty_cycles.for_bit((value >> shift) & 1 == 1);
    }
}
