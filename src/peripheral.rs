//! The seam to the timer + DMA hardware.
//!
//! Configuring the timer (clock, period, compare mode), the DMA stream, and pin muxing happens
//! outside this crate. A [`PwmDma`] implementation only has to start streaming a slice of
//! compare values into a configured channel and stop it again.

use crate::Result;
use crate::slot::{DutySlot, WordWidth};

/// One request to stream `slots` into the compare register of `channel`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransferRequest<'a, S, C> {
    /// Output channel of the timer.
    pub channel: C,
    /// Compare values, one per bit period, ending with the reset slots.
    pub slots: &'a [S],
    /// Element width of `slots`; always equal to the peripheral's configured width.
    pub width: WordWidth,
}

impl<S, C> TransferRequest<'_, S, C> {
    /// Number of DMA items, i.e. bit periods, in the transfer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the request carries no slots.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A timer output whose compare register is fed by DMA.
///
/// `start_transfer` is called by [`Ws2812::show`](crate::Ws2812::show) and must only initiate
/// the transfer; the hardware reads `slots` in the background. Implementations that keep the
/// address of `slots` rely on the strip living at a fixed location (for example a `static`
/// [`SharedWs2812`](crate::SharedWs2812)) and on no write happening until
/// [`Ws2812::on_transfer_complete`](crate::Ws2812::on_transfer_complete) has run.
///
/// Implementations must stop a running transfer when they are dropped: the buffer they stream
/// from may be freed or reused right after. A [`Ws2812`](crate::Ws2812) dropped mid-transfer
/// calls [`stop_transfer`](Self::stop_transfer) itself before its peripheral is dropped.
pub trait PwmDma {
    /// Slot type; its width must match [`Self::word_width`].
    type Slot: DutySlot;
    /// Identifies an output channel of the timer.
    type Channel: Copy + Eq + core::fmt::Debug;
    /// Identifies the timer instance in completion notifications.
    type Instance: Copy + PartialEq + core::fmt::Debug;

    /// DMA memory word width the peripheral was configured with.
    fn word_width(&self) -> WordWidth;

    /// Identity of this timer instance.
    fn instance(&self) -> Self::Instance;

    /// Begin streaming `request.slots` into `request.channel`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransferRejected`](crate::Error::TransferRejected) if the hardware
    /// cannot accept the transfer.
    fn start_transfer(&mut self, request: TransferRequest<'_, Self::Slot, Self::Channel>)
    -> Result<()>;

    /// Stop the transfer on `channel` and leave the output idle (low).
    fn stop_transfer(&mut self, channel: Self::Channel);
}
