//! Duty-cycle slot types and the compile-time constants of the timing buffer.
//!
//! A slot is one timer compare value: the pulse width of a single protocol bit. The slot type
//! must have the same width as the DMA memory word the timer peripheral is configured for,
//! otherwise the stream is read at the wrong stride and the timing falls apart.

use derive_more::Display;

/// Number of slots one LED occupies (8 bits each for green, red, and blue).
pub const SLOTS_PER_LED: usize = 24;

/// Default maximum number of LEDs a strip is sized for (`100`).
pub const CAPACITY_DEFAULT: usize = 100;

/// Default number of trailing zero slots forming the reset low period (`240`, about 300 µs at 800 kHz).
pub const RESET_SLOTS_DEFAULT: usize = 240;

/// Default compare value for a `0` bit (32 % of an 80-tick period).
pub const BIT_ZERO_DUTY_DEFAULT: u8 = 26;

/// Default compare value for a `1` bit (64 % of an 80-tick period).
pub const BIT_ONE_DUTY_DEFAULT: u8 = 51;

/// Length of a timing buffer for `capacity` LEDs followed by `reset_slots` zero slots.
#[must_use]
pub const fn timing_buffer_len(capacity: usize, reset_slots: usize) -> usize {
    capacity * SLOTS_PER_LED + reset_slots
}

// ============================================================================
// WordWidth
// ============================================================================

/// Width of one DMA memory word.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordWidth {
    /// Byte transfers.
    #[display("8-bit")]
    Bits8,
    /// Half-word transfers.
    #[display("16-bit")]
    Bits16,
    /// Word transfers.
    #[display("32-bit")]
    Bits32,
}

// ============================================================================
// DutySlot
// ============================================================================

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// An unsigned integer usable as a timing buffer slot.
///
/// Implemented for `u8`, `u16`, and `u32`.
pub trait DutySlot: sealed::Sealed + Copy + Eq + core::fmt::Debug + 'static {
    /// DMA word width matching this type.
    const WIDTH: WordWidth;
    /// Zero duty, used for the reset tail.
    const ZERO: Self;
    /// Largest value the type holds, as `u32`.
    const MAX_DUTY: u32;

    /// Narrow a compare value computed in `u32`, saturating at [`Self::MAX_DUTY`].
    fn saturating_from_u32(value: u32) -> Self;
}

impl DutySlot for u8 {
    const WIDTH: WordWidth = WordWidth::Bits8;
    const ZERO: Self = 0;
    const MAX_DUTY: u32 = Self::MAX as u32;

    fn saturating_from_u32(value: u32) -> Self {
        Self::try_from(value).unwrap_or(Self::MAX)
    }
}

impl DutySlot for u16 {
    const WIDTH: WordWidth = WordWidth::Bits16;
    const ZERO: Self = 0;
    const MAX_DUTY: u32 = Self::MAX as u32;

    fn saturating_from_u32(value: u32) -> Self {
        Self::try_from(value).unwrap_or(Self::MAX)
    }
}

impl DutySlot for u32 {
    const WIDTH: WordWidth = WordWidth::Bits32;
    const ZERO: Self = 0;
    const MAX_DUTY: u32 = Self::MAX;

    fn saturating_from_u32(value: u32) -> Self {
        value
    }
}

// ============================================================================
// DutyCycles
// ============================================================================

/// The two compare values that encode a `0` bit and a `1` bit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DutyCycles<S> {
    zero: S,
    one: S,
}

impl<S: DutySlot> DutyCycles<S> {
    /// Derive both compare values from the timer period in ticks (`top + 1`).
    ///
    /// A `0` bit is high for 13/40 of the period and a `1` bit for 51/80, which gives the
    /// defaults `26`/`51` for an 80-tick (800 kHz at 64 MHz) period.
    ///
    /// # Panics
    ///
    /// Panics if the period is too short to give two distinct non-zero values, or if the
    /// values do not fit the slot type.
    #[must_use]
    pub fn from_period(ticks: u32) -> Self {
        let zero = ticks.saturating_mul(13) / 40;
        let one = ticks.saturating_mul(51) / 80;
        assert!(zero > 0 && one > zero, "timer period too short for WS2812 timing");
        assert!(one <= S::MAX_DUTY, "timer period too long for the slot width");
        Self {
            zero: S::saturating_from_u32(zero),
            one: S::saturating_from_u32(one),
        }
    }

    /// Compare value for a `0` bit.
    #[must_use]
    pub const fn zero(&self) -> S {
        self.zero
    }

    /// Compare value for a `1` bit.
    #[must_use]
    pub const fn one(&self) -> S {
        self.one
    }

    /// Compare value for a single bit.
    #[inline]
    #[must_use]
    pub const fn for_bit(&self, bit_set: bool) -> S {
        if bit_set { self.one } else { self.zero }
    }
}

macro_rules! impl_duty_cycles {
    ($($slot:ty),*) => {$(
        impl DutyCycles<$slot> {
            /// The default `26`/`51` compare values.
            pub const DEFAULT: Self = Self::new(
                BIT_ZERO_DUTY_DEFAULT as $slot,
                BIT_ONE_DUTY_DEFAULT as $slot,
            );

            /// Build from explicit compare values.
            ///
            /// # Panics
            ///
            /// Panics if either value is zero or both are equal. In a `const` this fails the
            /// build, so a bad timing table never reaches the hardware.
            #[must_use]
            pub const fn new(zero: $slot, one: $slot) -> Self {
                assert!(zero != 0 && one != 0, "duty cycles must be non-zero");
                assert!(zero != one, "zero and one duty cycles must differ");
                Self { zero, one }
            }
        }

        impl Default for DutyCycles<$slot> {
            fn default() -> Self {
                Self::DEFAULT
            }
        }
    )*};
}

impl_duty_cycles!(u8, u16, u32);
