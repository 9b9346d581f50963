#![cfg(feature = "host")]
//! A recording [`PwmDma`] for running strips on the host without hardware.

use crate::peripheral::{PwmDma, TransferRequest};
use crate::slot::{DutySlot, WordWidth};
use crate::{Error, Result};

/// Mock timer + DMA output that copies every transfer it is asked to start.
///
/// Channels and instances are plain `u32`s. Transfers never finish on their own; deliver the
/// completion notification yourself with [`Ws2812::on_transfer_complete`](crate::Ws2812::on_transfer_complete).
#[derive(Clone, Debug)]
pub struct RecordingPwmDma<S> {
    instance: u32,
    word_width: WordWidth,
    reject_transfers: bool,
    transfers: Vec<(u32, Vec<S>)>,
    stopped_channels: Vec<u32>,
}

impl<S: DutySlot> RecordingPwmDma<S> {
    /// Instance id used by [`new`](Self::new).
    pub const INSTANCE_DEFAULT: u32 = 0;

    /// A peripheral whose word width matches `S`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instance: Self::INSTANCE_DEFAULT,
            word_width: S::WIDTH,
            reject_transfers: false,
            transfers: Vec::new(),
            stopped_channels: Vec::new(),
        }
    }

    /// Use a different instance id.
    #[must_use]
    pub const fn with_instance(mut self, instance: u32) -> Self {
        self.instance = instance;
        self
    }

    /// Pretend the DMA stream was configured for `word_width`.
    #[must_use]
    pub const fn with_word_width(mut self, word_width: WordWidth) -> Self {
        self.word_width = word_width;
        self
    }

    /// Refuse every transfer with [`Error::TransferRejected`].
    #[must_use]
    pub const fn rejecting_transfers(mut self) -> Self {
        self.reject_transfers = true;
        self
    }

    /// Every started transfer as `(channel, slots)`, oldest first.
    #[must_use]
    pub fn transfers(&self) -> &[(u32, Vec<S>)] {
        &self.transfers
    }

    /// Slots of the most recent transfer.
    #[must_use]
    pub fn last_transfer(&self) -> Option<&[S]> {
        self.transfers.last().map(|(_, slots)| slots.as_slice())
    }

    /// Channels passed to `stop_transfer`, oldest first.
    #[must_use]
    pub fn stopped_channels(&self) -> &[u32] {
        &self.stopped_channels
    }
}

impl<S: DutySlot> Default for RecordingPwmDma<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DutySlot> PwmDma for RecordingPwmDma<S> {
    type Slot = S;
    type Channel = u32;
    type Instance = u32;

    fn word_width(&self) -> WordWidth {
        self.word_width
    }

    fn instance(&self) -> u32 {
        self.instance
    }

    fn start_transfer(&mut self, request: TransferRequest<'_, S, u32>) -> Result<()> {
        if self.reject_transfers {
            return Err(Error::TransferRejected);
        }
        self.transfers
            .push((request.channel, request.slots.to_vec()));
        Ok(())
    }

    fn stop_transfer(&mut self, channel: u32) {
        self.stopped_channels.push(channel);
    }
}
