//! PWM + DMA output on the Pico 1 (RP2040) and Pico 2 (RP2350).
//!
//! Hand a PWM slice, its output pin, a `pwm::Config` whose wrap lasts one WS2812 bit period
//! (1.25 µs), and a DMA channel to [`RpPwmDma`]. Each wrap of the slice raises its
//! DREQ and the DMA channel writes the next slot into the slice's compare register; the compare
//! register is double-buffered, so new values take effect on the following period.
//!
//! The RP DMA completion interrupt belongs to `embassy-rp`, so completion is detected by
//! [`complete_transfer`], which polls the channel's busy flag and then delivers the
//! notification to the strip.

use core::sync::atomic::{Ordering, compiler_fence};

use embassy_rp::Peri;
use embassy_rp::dma::Channel;
use embassy_rp::pac;
use embassy_rp::pac::dma::vals::{DataSize, TreqSel};
use embassy_rp::pwm::{ChannelAPin, ChannelBPin, Config, Pwm, Slice};
use embassy_time::{Duration, Timer};

use crate::peripheral::{PwmDma, TransferRequest};
use crate::shared::SharedWs2812;
use crate::slot::WordWidth;
use crate::ws2812::Ws2812;
use crate::{Error, Result};

// DREQ number of PWM slice 0's wrap; slice n is this plus n.
#[cfg(feature = "pico1")]
const DREQ_PWM_WRAP0: u8 = 24;
#[cfg(feature = "pico2")]
const DREQ_PWM_WRAP0: u8 = 32;

/// How often [`complete_transfer`] checks the DMA channel.
const COMPLETION_POLL_INTERVAL: Duration = Duration::from_micros(50);

/// Which output of the PWM slice carries the data line.
///
/// Half-word writes to RP peripheral registers are replicated across the 32-bit register, so
/// the other output of the slice mirrors the waveform. Leave it unconnected.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmOutput {
    /// Output A (even GPIO).
    A,
    /// Output B (odd GPIO).
    B,
}

/// A PWM slice fed by one DMA channel.
///
/// Slots are `u16`, matching the 16-bit compare fields. The slice number, and with it the
/// compare register address and the DREQ, comes from the slice peripheral itself. Dropping the
/// value aborts a transfer that is still running.
pub struct RpPwmDma<'d, C: Channel> {
    dma: Peri<'d, C>,
    slice: u8,
    output: PwmOutput,
    _pwm: Pwm<'d>,
}

impl<'d, C: Channel> RpPwmDma<'d, C> {
    /// Drive the data line from output A of `slice` on `pin`.
    ///
    /// `config.top` should be one bit period in ticks minus one; derive the duty cycles with
    /// [`DutyCycles::from_period(top + 1)`](crate::DutyCycles::from_period). Pass
    /// [`PwmOutput::A`] as the channel to [`Ws2812::init`](crate::Ws2812::init).
    #[must_use]
    pub fn new_output_a<T: Slice>(
        slice: Peri<'d, T>,
        pin: Peri<'d, impl ChannelAPin<T>>,
        config: Config,
        dma: Peri<'d, C>,
    ) -> Self {
        let number = slice.number();
        Self {
            dma,
            slice: number,
            output: PwmOutput::A,
            _pwm: Pwm::new_output_a(slice, pin, config),
        }
    }

    /// Drive the data line from output B of `slice` on `pin`.
    ///
    /// As [`new_output_a`](Self::new_output_a), with [`PwmOutput::B`] as the channel.
    #[must_use]
    pub fn new_output_b<T: Slice>(
        slice: Peri<'d, T>,
        pin: Peri<'d, impl ChannelBPin<T>>,
        config: Config,
        dma: Peri<'d, C>,
    ) -> Self {
        let number = slice.number();
        Self {
            dma,
            slice: number,
            output: PwmOutput::B,
            _pwm: Pwm::new_output_b(slice, pin, config),
        }
    }

    /// Whether the DMA channel is still streaming.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.dma.regs().ctrl_trig().read().busy()
    }

    /// The output the data line is wired to.
    #[must_use]
    pub const fn output(&self) -> PwmOutput {
        self.output
    }

    fn compare_register_address(&self) -> u32 {
        let cc_address = pac::PWM.ch(usize::from(self.slice)).cc().as_ptr() as u32;
        match self.output {
            PwmOutput::A => cc_address,
            PwmOutput::B => cc_address + 2,
        }
    }

    fn abort(&mut self) {
        let number = self.dma.number();
        pac::DMA
            .chan_abort()
            .modify(|w| w.set_chan_abort(1 << number));
        while self.is_busy() {}
    }
}

impl<C: Channel> Drop for RpPwmDma<'_, C> {
    fn drop(&mut self) {
        // The slots the channel reads from may be freed next.
        if self.is_busy() {
            self.abort();
        }
    }
}

impl<C: Channel> PwmDma for RpPwmDma<'_, C> {
    type Slot = u16;
    type Channel = PwmOutput;
    type Instance = u8;

    fn word_width(&self) -> WordWidth {
        WordWidth::Bits16
    }

    /// The DMA channel number.
    fn instance(&self) -> u8 {
        self.dma.number()
    }

    fn start_transfer(&mut self, request: TransferRequest<'_, u16, PwmOutput>) -> Result<()> {
        if request.channel != self.output || self.is_busy() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "RpPwmDma: transfer for output {} rejected (slice drives {})",
                request.channel,
                self.output
            );
            return Err(Error::TransferRejected);
        }
        let count = u32::try_from(request.len()).map_err(|_| Error::TransferRejected)?;
        let dreq = DREQ_PWM_WRAP0
            .checked_add(self.slice)
            .map(TreqSel::from)
            .ok_or(Error::TransferRejected)?;
        let number = self.dma.number();
        let channel = self.dma.regs();

        channel
            .read_addr()
            .write_value(request.slots.as_ptr() as u32);
        channel
            .write_addr()
            .write_value(self.compare_register_address());
        #[cfg(feature = "pico1")]
        channel.trans_count().write_value(count);
        #[cfg(feature = "pico2")]
        channel.trans_count().write(|w| {
            w.set_mode(0.into());
            w.set_count(count);
        });

        // The slots must be in memory before the channel starts reading them.
        compiler_fence(Ordering::SeqCst);
        channel.ctrl_trig().write(|w| {
            w.set_treq_sel(dreq);
            w.set_data_size(DataSize::SIZE_HALFWORD);
            w.set_incr_read(true);
            w.set_incr_write(false);
            w.set_chain_to(number);
            w.set_en(true);
        });
        compiler_fence(Ordering::SeqCst);
        Ok(())
    }

    fn stop_transfer(&mut self, _output: PwmOutput) {
        self.abort();
    }
}

/// Wait for the in-flight transfer of `strip` to drain, then deliver the completion
/// notification. Returns immediately if nothing is transmitting.
///
/// ```rust,ignore
/// STRIP.show()?;
/// ws2812_pwm_dma::rp::complete_transfer(&STRIP).await;
/// ```
pub async fn complete_transfer<C, const CAPACITY: usize, const RESET_SLOTS: usize, const LEN: usize>(
    strip: &SharedWs2812<Ws2812<RpPwmDma<'_, C>, CAPACITY, RESET_SLOTS, LEN>>,
) where
    C: Channel,
{
    loop {
        let drained = strip.lock(|ws2812| {
            if !ws2812.is_transmitting() {
                return None;
            }
            ws2812
                .peripheral()
                .map(|dma| (!dma.is_busy()).then(|| dma.instance()))
        });
        match drained {
            None => return,
            Some(Some(instance)) => {
                strip.on_transfer_complete(instance);
                return;
            }
            Some(None) => Timer::after(COMPLETION_POLL_INTERVAL).await,
        }
    }
}
