//! Error and result types shared by every strip operation.

use derive_more::{Display, Error};

use crate::slot::WordWidth;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Why a strip operation did not take effect.
///
/// Callers who want invalid calls ignored silently can discard the error with `.ok()`.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No peripheral has been bound with `init` yet.
    #[display("strip is not initialized")]
    NotInitialized,

    /// The LED index is not below the number of active LEDs.
    #[display("LED index {index} is out of range for {active_len} active LEDs")]
    IndexOutOfRange {
        /// Index that was requested.
        index: usize,
        /// Number of LEDs driven this session.
        active_len: usize,
    },

    /// A transfer is still clocking out the timing buffer.
    #[display("a transfer is already in flight")]
    TransferInFlight,

    /// The slot type does not match the DMA word width of the peripheral.
    #[display("slot width {slot} does not match peripheral width {peripheral}")]
    WordWidthMismatch {
        /// Width of the strip's slot type.
        slot: WordWidth,
        /// Width the peripheral's DMA stream is configured for.
        peripheral: WordWidth,
    },

    /// The peripheral refused to start the transfer.
    #[display("peripheral rejected the transfer")]
    TransferRejected,
}
