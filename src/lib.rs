//! A WS2812B (NeoPixel-style) LED strip driver that encodes colors into a buffer of PWM
//! duty cycles and streams it to a timer through DMA.
//!
//! Each LED becomes 24 slots, one per protocol bit, green then red then blue, most-significant
//! bit first. A slot holds the timer compare value for a `0` bit or a `1` bit. The buffer ends
//! with zero slots that hold the line low long enough for the strip to latch the frame.
//!
//! See [`Ws2812`] for the driver, [`SharedWs2812`] for sharing it with the completion
//! interrupt, and [`PwmDma`] for the hardware seam.
//!
//! # Glossary
//!
//! - **Slot:** one element of the timing buffer; the pulse width of one protocol bit.
//! - **Reset slots:** trailing zero-duty slots; the end-of-frame low period.
//! - **DMA ([Direct Memory Access](https://en.wikipedia.org/wiki/Direct_memory_access)):** moves
//!   the buffer into the timer's compare register without the CPU.
//! - **Completion notification:** the hardware layer's signal that the pulse train has finished.
#![cfg_attr(not(feature = "host"), no_std)]

// Compile-time checks: at most one board, and no board when testing with the host feature
#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

#[cfg(all(feature = "host", any(feature = "pico1", feature = "pico2")))]
compile_error!("The 'host' feature cannot be combined with a board feature; use default-features = false");

pub mod encoder;
mod error;
pub mod frame;
#[cfg(feature = "host")]
pub mod host;
pub mod peripheral;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod rp;
pub mod shared;
pub mod slot;
pub mod strip_buffer;
pub mod ws2812;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};

pub use crate::encoder::Brightness;
pub use crate::frame::{Frame1d, RGB8, colors};
pub use crate::peripheral::{PwmDma, TransferRequest};
pub use crate::shared::SharedWs2812;
pub use crate::slot::{
    BIT_ONE_DUTY_DEFAULT, BIT_ZERO_DUTY_DEFAULT, CAPACITY_DEFAULT, DutyCycles, DutySlot,
    RESET_SLOTS_DEFAULT, SLOTS_PER_LED, WordWidth, timing_buffer_len,
};
pub use crate::strip_buffer::StripBuffer;
pub use crate::ws2812::{TransmissionState, Ws2812};
