//! The fixed-size timing buffer and the count of LEDs actually in use.

use smart_leds::RGB8;

use crate::encoder::{Brightness, encode_led};
use crate::frame::Frame1d;
use crate::slot::{DutyCycles, DutySlot, SLOTS_PER_LED, timing_buffer_len};
use crate::{Error, Result};

/// Timing buffer for up to `CAPACITY` LEDs followed by `RESET_SLOTS` reset slots.
///
/// `LEN` must equal [`timing_buffer_len(CAPACITY, RESET_SLOTS)`](timing_buffer_len); a mismatch
/// fails the build as soon as [`StripBuffer::new`] is instantiated. The
/// [`ws2812_strip!`](crate::ws2812_strip!) macro computes it for you.
///
/// The buffer never changes length. Only its first `active_len * 24 + RESET_SLOTS` slots are
/// ever handed to the peripheral.
#[derive(Clone, Debug)]
pub struct StripBuffer<S, const CAPACITY: usize, const RESET_SLOTS: usize, const LEN: usize> {
    slots: [S; LEN],
    active_len: usize,
}

impl<S: DutySlot, const CAPACITY: usize, const RESET_SLOTS: usize, const LEN: usize>
    StripBuffer<S, CAPACITY, RESET_SLOTS, LEN>
{
    const LAYOUT_CHECK: () = assert!(
        LEN == timing_buffer_len(CAPACITY, RESET_SLOTS),
        "LEN must equal CAPACITY * 24 + RESET_SLOTS"
    );

    /// Maximum number of LEDs.
    pub const CAPACITY: usize = CAPACITY;

    /// Number of trailing reset slots.
    pub const RESET_SLOTS: usize = RESET_SLOTS;

    /// Total number of slots.
    pub const LEN: usize = LEN;

    /// Create a zeroed buffer with no active LEDs.
    #[must_use]
    pub const fn new() -> Self {
        let () = Self::LAYOUT_CHECK;
        Self {
            slots: [S::ZERO; LEN],
            active_len: 0,
        }
    }

    /// Maximum number of LEDs.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Number of LEDs driven this session.
    #[must_use]
    pub const fn active_len(&self) -> usize {
        self.active_len
    }

    /// Set the number of driven LEDs, clamped to `CAPACITY`. Returns the stored value.
    ///
    /// Slot contents are left alone.
    pub fn set_active_len(&mut self, requested: usize) -> usize {
        self.active_len = requested.min(CAPACITY);
        self.active_len
    }

    /// Encode one LED.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= active_len`; the buffer is unchanged.
    pub fn set_led(
        &mut self,
        index: usize,
        color: RGB8,
        brightness: Brightness,
        duty_cycles: &DutyCycles<S>,
    ) -> Result<()> {
        let out_of_range = Error::IndexOutOfRange {
            index,
            active_len: self.active_len,
        };
        if index >= self.active_len {
            return Err(out_of_range);
        }
        let led_slots = self.led_slots_mut(index).ok_or(out_of_range)?;
        encode_led(color, brightness, duty_cycles, led_slots);
        Ok(())
    }

    /// Encode every active LED with the same color.
    pub fn fill(&mut self, color: RGB8, brightness: Brightness, duty_cycles: &DutyCycles<S>) {
        let mut encoded = [S::ZERO; SLOTS_PER_LED];
        encode_led(color, brightness, duty_cycles, &mut encoded);
        for led_slots in self
            .slots
            .chunks_exact_mut(SLOTS_PER_LED)
            .take(self.active_len)
        {
            led_slots.copy_from_slice(&encoded);
        }
    }

    /// Encode LEDs from a sequence of colors, starting at index 0.
    ///
    /// Colors beyond `active_len` are ignored. Returns how many LEDs were written.
    pub fn write_colors(
        &mut self,
        colors: impl IntoIterator<Item = RGB8>,
        brightness: Brightness,
        duty_cycles: &DutyCycles<S>,
    ) -> usize {
        let mut written = 0;
        for (led_slots, color) in self
            .slots
            .chunks_exact_mut(SLOTS_PER_LED)
            .take(self.active_len)
            .zip(colors)
        {
            if let Ok(led_slots) = <&mut [S; SLOTS_PER_LED]>::try_from(led_slots) {
                encode_led(color, brightness, duty_cycles, led_slots);
                written += 1;
            }
        }
        written
    }

    /// Encode a frame from LED 0. Pixels beyond `active_len` are ignored.
    ///
    /// Returns how many LEDs were written.
    pub fn write_frame<const N: usize>(
        &mut self,
        frame: &Frame1d<N>,
        brightness: Brightness,
        duty_cycles: &DutyCycles<S>,
    ) -> usize {
        let data_len = self.active_len * SLOTS_PER_LED;
        self.slots
            .get_mut(..data_len)
            .map_or(0, |active| frame.encode_into(brightness, duty_cycles, active))
    }

    /// Zero every slot from `active_len * 24` to the end of the buffer.
    ///
    /// Needed before each transfer because the active boundary can move between sessions.
    pub fn prepare_reset_tail(&mut self) {
        let data_len = self.active_len * SLOTS_PER_LED;
        if let Some(tail) = self.slots.get_mut(data_len..) {
            tail.fill(S::ZERO);
        }
    }

    /// Number of slots one transfer sends: `active_len * 24 + RESET_SLOTS`.
    #[must_use]
    pub const fn frame_len(&self) -> usize {
        self.active_len * SLOTS_PER_LED + RESET_SLOTS
    }

    /// The slots one transfer sends.
    #[must_use]
    pub fn frame(&self) -> &[S] {
        self.slots.get(..self.frame_len()).unwrap_or(&self.slots)
    }

    /// The whole buffer, including slots beyond the current frame.
    #[must_use]
    pub const fn as_slice(&self) -> &[S] {
        &self.slots
    }

    fn led_slots_mut(&mut self, index: usize) -> Option<&mut [S; SLOTS_PER_LED]> {
        self.slots
            .chunks_exact_mut(SLOTS_PER_LED)
            .nth(index)
            .and_then(|led_slots| led_slots.try_into().ok())
    }
}

impl<S: DutySlot, const CAPACITY: usize, const RESET_SLOTS: usize, const LEN: usize> Default
    for StripBuffer<S, CAPACITY, RESET_SLOTS, LEN>
{
    fn default() -> Self {
        Self::new()
    }
}
