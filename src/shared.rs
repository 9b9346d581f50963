//! A strip that lives in a `static` and is shared between the application and the
//! completion interrupt.
//!
//! See [`SharedWs2812`] for usage.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use smart_leds::RGB8;

use crate::Result;
use crate::frame::Frame1d;
use crate::peripheral::PwmDma;
use crate::slot::DutyCycles;
use crate::ws2812::{TransmissionState, Ws2812};

#[doc(hidden)] // Required pub for the `SharedWs2812` signature
pub type Ws2812IdleSignal = Signal<CriticalSectionRawMutex, ()>;

/// A [`Ws2812`] behind a critical-section mutex, with a completion signal.
///
/// The application calls [`show`](Self::show) and friends; the interrupt handler for the
/// transfer-complete event calls [`on_transfer_complete`](Self::on_transfer_complete). Tasks can
/// await [`wait_idle`](Self::wait_idle) before preparing the next frame.
///
/// Because it has a `const` constructor, the strip (and with it the timing buffer the DMA reads
/// from) gets a fixed address for the whole program.
///
/// # Example
///
/// ```rust
/// use ws2812_pwm_dma::host::RecordingPwmDma;
/// use ws2812_pwm_dma::{DutyCycles, SharedWs2812, colors, ws2812_strip};
///
/// ws2812_strip! {
///     Strip: RecordingPwmDma<u16> { capacity: 8 }
/// }
///
/// static STRIP: SharedWs2812<Strip> = SharedWs2812::new(DutyCycles::<u16>::DEFAULT);
///
/// // Registered with the hardware layer as the pulse-finished callback.
/// fn on_pulse_finished(instance: u32) {
///     STRIP.on_transfer_complete(instance);
/// }
///
/// # fn main() -> ws2812_pwm_dma::Result<()> {
/// STRIP.init(RecordingPwmDma::new(), 0, 8)?;
/// STRIP.fill(colors::BLUE, 25)?;
/// STRIP.show()?;
/// on_pulse_finished(0);
/// assert!(!STRIP.is_transmitting());
/// # Ok(())
/// # }
/// ```
pub struct SharedWs2812<S> {
    strip: Mutex<CriticalSectionRawMutex, RefCell<S>>,
    idle_signal: Ws2812IdleSignal,
}

impl<P: PwmDma, const CAPACITY: usize, const RESET_SLOTS: usize, const LEN: usize>
    SharedWs2812<Ws2812<P, CAPACITY, RESET_SLOTS, LEN>>
{
    /// Create an uninitialized shared strip.
    #[must_use]
    pub const fn new(duty_cycles: DutyCycles<P::Slot>) -> Self {
        Self {
            strip: Mutex::new(RefCell::new(Ws2812::new(duty_cycles))),
            idle_signal: Signal::new(),
        }
    }

    /// Run `f` with exclusive access to the strip inside a critical section.
    pub fn lock<T>(&self, f: impl FnOnce(&mut Ws2812<P, CAPACITY, RESET_SLOTS, LEN>) -> T) -> T {
        self.strip.lock(|strip_cell| {
            let mut strip = strip_cell.borrow_mut();
            f(&mut strip)
        })
    }

    /// See [`Ws2812::init`].
    ///
    /// # Errors
    ///
    /// As for [`Ws2812::init`].
    pub fn init(&self, peripheral: P, channel: P::Channel, led_count: usize) -> Result<usize> {
        self.lock(|strip| strip.init(peripheral, channel, led_count))
    }

    /// See [`Ws2812::set_led`].
    ///
    /// # Errors
    ///
    /// As for [`Ws2812::set_led`].
    pub fn set_led(&self, index: usize, color: RGB8, brightness: u8) -> Result<()> {
        self.lock(|strip| strip.set_led(index, color, brightness))
    }

    /// See [`Ws2812::fill`].
    ///
    /// # Errors
    ///
    /// As for [`Ws2812::fill`].
    pub fn fill(&self, color: RGB8, brightness: u8) -> Result<()> {
        self.lock(|strip| strip.fill(color, brightness))
    }

    /// See [`Ws2812::write_frame`].
    ///
    /// # Errors
    ///
    /// As for [`Ws2812::write_frame`].
    pub fn write_frame<const N: usize>(&self, frame: &Frame1d<N>, brightness: u8) -> Result<usize> {
        self.lock(|strip| strip.write_frame(frame, brightness))
    }

    /// See [`Ws2812::show`].
    ///
    /// # Errors
    ///
    /// As for [`Ws2812::show`].
    pub fn show(&self) -> Result<()> {
        self.lock(|strip| {
            // A completion left over from an earlier transfer must not satisfy `wait_idle`.
            self.idle_signal.reset();
            strip.show()
        })
    }

    /// Completion notification; call this from the transfer-complete interrupt.
    ///
    /// Returns `true` if the notification was for this strip's instance and stopped a
    /// transfer. Wakes [`wait_idle`](Self::wait_idle) in that case.
    pub fn on_transfer_complete(&self, instance: P::Instance) -> bool {
        let stopped = self.lock(|strip| strip.on_transfer_complete(instance));
        if stopped {
            self.idle_signal.signal(());
        }
        stopped
    }

    /// Wait until no transfer is in flight.
    pub async fn wait_idle(&self) {
        while self.is_transmitting() {
            self.idle_signal.wait().await;
        }
    }

    /// Current transmission state.
    pub fn state(&self) -> TransmissionState {
        self.lock(|strip| strip.state())
    }

    /// Whether a transfer is in flight.
    pub fn is_transmitting(&self) -> bool {
        self.lock(|strip| strip.is_transmitting())
    }
}
