//! Whole-strip color frames and their encoding into timing slots.

use core::ops::{Deref, DerefMut};

/// Named colors from `smart_leds`: `RED`, `GREEN`, `BLUE`, `WHITE`, `BLACK`, and many more.
#[doc(inline)]
pub use smart_leds::colors;

pub use smart_leds::RGB8;

use crate::encoder::{Brightness, encode_led};
use crate::slot::{DutyCycles, DutySlot, SLOTS_PER_LED};

/// One color per LED, LED 0 first.
///
/// Pixels are reachable through `Deref` to `[RGB8; N]`. Hand the frame to
/// [`Ws2812::write_frame`](crate::Ws2812::write_frame), or encode it into a slot slice of your
/// own with [`encode_into`](Self::encode_into).
///
/// ```rust
/// use ws2812_pwm_dma::{Brightness, DutyCycles, Frame1d, colors};
///
/// let frame = Frame1d::<2>::from_fn(|index| if index == 0 { colors::WHITE } else { colors::BLACK });
/// let mut slots = [0u16; Frame1d::<2>::SLOT_LEN];
///
/// assert_eq!(frame.encode_into(Brightness::FULL, &DutyCycles::<u16>::DEFAULT, &mut slots), 2);
/// assert!(slots[..24].iter().all(|&slot| slot == 51));
/// assert!(slots[24..].iter().all(|&slot| slot == 26));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Frame1d<const N: usize>(pub [RGB8; N]);

impl<const N: usize> Frame1d<N> {
    /// Number of LEDs in this frame.
    pub const LEN: usize = N;

    /// Number of slots the frame encodes to, without any reset slots.
    pub const SLOT_LEN: usize = N * SLOTS_PER_LED;

    /// All LEDs off.
    #[must_use]
    pub const fn new() -> Self {
        Self([RGB8::new(0, 0, 0); N])
    }

    /// Every LED the same color.
    #[must_use]
    pub const fn filled(color: RGB8) -> Self {
        Self([color; N])
    }

    /// Color each LED from its index.
    #[must_use]
    pub fn from_fn(color_at: impl FnMut(usize) -> RGB8) -> Self {
        Self(core::array::from_fn(color_at))
    }

    /// Encode the frame into `slots`, 24 per LED.
    ///
    /// Stops at whichever runs out first, the frame or whole 24-slot groups in `slots`; slots
    /// past that point are untouched. Returns the number of LEDs encoded.
    pub fn encode_into<S: DutySlot>(
        &self,
        brightness: Brightness,
        duty_cycles: &DutyCycles<S>,
        slots: &mut [S],
    ) -> usize {
        let mut encoded = 0;
        for (led_slots, &color) in slots.chunks_exact_mut(SLOTS_PER_LED).zip(self.0.iter()) {
            if let Ok(led_slots) = <&mut [S; SLOTS_PER_LED]>::try_from(led_slots) {
                encode_led(color, brightness, duty_cycles, led_slots);
                encoded += 1;
            }
        }
        encoded
    }
}

impl<const N: usize> Deref for Frame1d<N> {
    type Target = [RGB8; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> DerefMut for Frame1d<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const N: usize> From<[RGB8; N]> for Frame1d<N> {
    fn from(colors: [RGB8; N]) -> Self {
        Self(colors)
    }
}

impl<const N: usize> Default for Frame1d<N> {
    fn default() -> Self {
        Self::new()
    }
}
