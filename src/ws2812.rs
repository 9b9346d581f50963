//! The strip driver: binds a timing buffer to a timer + DMA output and runs the
//! transmit/complete handshake.
//!
//! See [`Ws2812`] for usage.

use smart_leds::{RGB8, SmartLedsWrite};

use crate::encoder::Brightness;
use crate::frame::Frame1d;
use crate::peripheral::{PwmDma, TransferRequest};
use crate::slot::{DutyCycles, DutySlot};
use crate::strip_buffer::StripBuffer;
use crate::{Error, Result};

/// Whether a transfer is in flight.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmissionState {
    /// No transfer running; the buffer may be written.
    #[default]
    Idle,
    /// The hardware is reading the buffer.
    Transmitting,
}

struct Binding<P: PwmDma> {
    peripheral: P,
    channel: P::Channel,
}

/// A WS2812B strip driven by PWM duty cycles streamed through DMA.
///
/// The strip starts uninitialized with a zeroed buffer. [`init`](Self::init) binds it to a
/// configured peripheral; after that, colors are set with [`set_led`](Self::set_led),
/// [`fill`](Self::fill), or [`write_frame`](Self::write_frame), and [`show`](Self::show) starts
/// the transfer. The hardware layer reports the end of the pulse train through
/// [`on_transfer_complete`](Self::on_transfer_complete), which stops the output and returns the
/// strip to [`TransmissionState::Idle`].
///
/// Only one transfer is outstanding at a time. While it runs, every operation that would write
/// the buffer, and `show` itself, returns [`Error::TransferInFlight`].
///
/// Use [`ws2812_strip!`](crate::ws2812_strip!) to name a concrete strip type without spelling
/// out the buffer length.
///
/// # Example
///
/// ```rust
/// use ws2812_pwm_dma::host::RecordingPwmDma;
/// use ws2812_pwm_dma::{DutyCycles, colors, ws2812_strip};
///
/// ws2812_strip! {
///     pub DemoStrip: RecordingPwmDma<u16> { capacity: 3, reset_slots: 6 }
/// }
///
/// # fn main() -> ws2812_pwm_dma::Result<()> {
/// let mut strip = DemoStrip::new(DutyCycles::<u16>::DEFAULT);
/// strip.init(RecordingPwmDma::new(), 0, 2)?;
/// strip.set_led(0, colors::RED, 100)?;
/// strip.show()?;
/// assert_eq!(strip.frame().len(), 2 * 24 + 6);
///
/// // The interrupt handler forwards the timer instance that finished.
/// assert!(strip.on_transfer_complete(RecordingPwmDma::<u16>::INSTANCE_DEFAULT));
/// # Ok(())
/// # }
/// ```
pub struct Ws2812<P: PwmDma, const CAPACITY: usize, const RESET_SLOTS: usize, const LEN: usize> {
    buffer: StripBuffer<P::Slot, CAPACITY, RESET_SLOTS, LEN>,
    duty_cycles: DutyCycles<P::Slot>,
    binding: Option<Binding<P>>,
    state: TransmissionState,
}

impl<P: PwmDma, const CAPACITY: usize, const RESET_SLOTS: usize, const LEN: usize>
    Ws2812<P, CAPACITY, RESET_SLOTS, LEN>
{
    /// Maximum number of LEDs.
    pub const CAPACITY: usize = CAPACITY;

    /// Number of trailing reset slots.
    pub const RESET_SLOTS: usize = RESET_SLOTS;

    /// Create an uninitialized strip with a zeroed buffer.
    #[must_use]
    pub const fn new(duty_cycles: DutyCycles<P::Slot>) -> Self {
        Self {
            buffer: StripBuffer::new(),
            duty_cycles,
            binding: None,
            state: TransmissionState::Idle,
        }
    }

    /// Bind the strip to `peripheral`/`channel` and set how many LEDs are driven.
    ///
    /// `led_count` is clamped to `CAPACITY`; the stored count is returned. Calling `init` again
    /// replaces the previous binding. The buffer contents are not touched.
    ///
    /// # Errors
    ///
    /// - [`Error::WordWidthMismatch`] if the peripheral's DMA width differs from the slot type.
    /// - [`Error::TransferInFlight`] if the current binding is still transmitting.
    pub fn init(&mut self, peripheral: P, channel: P::Channel, led_count: usize) -> Result<usize> {
        if self.is_transmitting() {
            return Err(Error::TransferInFlight);
        }
        let peripheral_width = peripheral.word_width();
        if peripheral_width != <P::Slot as DutySlot>::WIDTH {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Ws2812::init: slot width {} does not match peripheral width {}",
                <P::Slot as DutySlot>::WIDTH,
                peripheral_width
            );
            return Err(Error::WordWidthMismatch {
                slot: <P::Slot as DutySlot>::WIDTH,
                peripheral: peripheral_width,
            });
        }

        let active_len = self.buffer.set_active_len(led_count);
        if active_len < led_count {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Ws2812::init: {} LEDs requested, clamped to capacity {}",
                led_count,
                CAPACITY
            );
        }
        self.binding = Some(Binding {
            peripheral,
            channel,
        });
        #[cfg(feature = "defmt")]
        defmt::info!("Ws2812::init: driving {} of {} LEDs", active_len, CAPACITY);
        Ok(active_len)
    }

    /// Encode one LED.
    ///
    /// `brightness` is a percentage; values above 100 saturate.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] before [`init`](Self::init).
    /// - [`Error::TransferInFlight`] while transmitting.
    /// - [`Error::IndexOutOfRange`] if `index` is not below the active LED count.
    ///
    /// In every error case the buffer is unchanged.
    pub fn set_led(&mut self, index: usize, color: RGB8, brightness: u8) -> Result<()> {
        self.check_writable()?;
        self.buffer.set_led(
            index,
            color,
            Brightness::percent(brightness),
            &self.duty_cycles,
        )
    }

    /// Encode every active LED with the same color.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] or [`Error::TransferInFlight`], as for [`set_led`](Self::set_led).
    pub fn fill(&mut self, color: RGB8, brightness: u8) -> Result<()> {
        self.check_writable()?;
        self.buffer
            .fill(color, Brightness::percent(brightness), &self.duty_cycles);
        Ok(())
    }

    /// Encode a frame, LED 0 first. Pixels beyond the active LED count are ignored.
    ///
    /// Returns the number of LEDs written.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] or [`Error::TransferInFlight`], as for [`set_led`](Self::set_led).
    pub fn write_frame<const N: usize>(
        &mut self,
        frame: &Frame1d<N>,
        brightness: u8,
    ) -> Result<usize> {
        self.check_writable()?;
        Ok(self.buffer.write_frame(
            frame,
            Brightness::percent(brightness),
            &self.duty_cycles,
        ))
    }

    /// Zero the slots from `active_len * 24` to the end of the buffer.
    ///
    /// [`show`](Self::show) does this itself; it is exposed for callers that hand the
    /// buffer to hardware some other way.
    ///
    /// # Errors
    ///
    /// [`Error::TransferInFlight`] while transmitting.
    pub fn prepare_reset_tail(&mut self) -> Result<()> {
        if self.is_transmitting() {
            return Err(Error::TransferInFlight);
        }
        self.buffer.prepare_reset_tail();
        Ok(())
    }

    /// Start sending `active_len * 24 + RESET_SLOTS` slots and enter
    /// [`TransmissionState::Transmitting`].
    ///
    /// Returns as soon as the peripheral has accepted the transfer.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] before [`init`](Self::init).
    /// - [`Error::TransferInFlight`] if the previous transfer has not completed. It is not
    ///   restarted.
    /// - Any error from [`PwmDma::start_transfer`]; the strip stays idle.
    pub fn show(&mut self) -> Result<()> {
        let Some(binding) = self.binding.as_mut() else {
            return Err(Error::NotInitialized);
        };
        if self.state == TransmissionState::Transmitting {
            #[cfg(feature = "defmt")]
            defmt::warn!("Ws2812::show: previous transfer still in flight");
            return Err(Error::TransferInFlight);
        }

        self.buffer.prepare_reset_tail();
        let request = TransferRequest {
            channel: binding.channel,
            slots: self.buffer.frame(),
            width: <P::Slot as DutySlot>::WIDTH,
        };
        #[cfg(feature = "defmt")]
        defmt::debug!("Ws2812::show: starting transfer of {} slots", request.len());
        binding.peripheral.start_transfer(request)?;
        self.state = TransmissionState::Transmitting;
        Ok(())
    }

    /// Completion notification from the hardware layer.
    ///
    /// If `instance` is the bound timer and a transfer is in flight, the transfer is stopped
    /// and the strip returns to idle; returns `true`. Notifications for other instances (several
    /// timers may share one callback) and stray notifications are ignored; returns `false`.
    pub fn on_transfer_complete(&mut self, instance: P::Instance) -> bool {
        match self.binding.as_mut() {
            Some(binding)
                if self.state == TransmissionState::Transmitting
                    && binding.peripheral.instance() == instance =>
            {
                binding.peripheral.stop_transfer(binding.channel);
                self.state = TransmissionState::Idle;
                #[cfg(feature = "defmt")]
                defmt::debug!("Ws2812::on_transfer_complete: transfer stopped");
                true
            }
            _ => {
                #[cfg(feature = "defmt")]
                defmt::trace!("Ws2812::on_transfer_complete: notification ignored");
                false
            }
        }
    }

    /// Current transmission state.
    #[must_use]
    pub const fn state(&self) -> TransmissionState {
        self.state
    }

    /// Whether a transfer is in flight.
    #[must_use]
    pub fn is_transmitting(&self) -> bool {
        self.state == TransmissionState::Transmitting
    }

    /// Whether [`init`](Self::init) has bound a peripheral.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.binding.is_some()
    }

    /// Number of LEDs driven this session.
    #[must_use]
    pub const fn active_len(&self) -> usize {
        self.buffer.active_len()
    }

    /// The duty-cycle constants used for encoding.
    #[must_use]
    pub const fn duty_cycles(&self) -> &DutyCycles<P::Slot> {
        &self.duty_cycles
    }

    /// The whole timing buffer (`CAPACITY * 24 + RESET_SLOTS` slots).
    #[must_use]
    pub const fn timing_buffer(&self) -> &[P::Slot] {
        self.buffer.as_slice()
    }

    /// The slots the next (or current) transfer sends.
    #[must_use]
    pub fn frame(&self) -> &[P::Slot] {
        self.buffer.frame()
    }

    /// The bound peripheral, if any.
    #[must_use]
    pub fn peripheral(&self) -> Option<&P> {
        self.binding.as_ref().map(|binding| &binding.peripheral)
    }

    /// The bound output channel, if any.
    #[must_use]
    pub fn channel(&self) -> Option<P::Channel> {
        self.binding.as_ref().map(|binding| binding.channel)
    }

    fn check_writable(&self) -> Result<()> {
        if self.binding.is_none() {
            return Err(Error::NotInitialized);
        }
        if self.is_transmitting() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Ws2812: buffer write rejected while transmitting");
            return Err(Error::TransferInFlight);
        }
        Ok(())
    }
}

/// Stops a transfer still in flight so the hardware no longer reads the buffer.
impl<P: PwmDma, const CAPACITY: usize, const RESET_SLOTS: usize, const LEN: usize> Drop
    for Ws2812<P, CAPACITY, RESET_SLOTS, LEN>
{
    fn drop(&mut self) {
        if self.state != TransmissionState::Transmitting {
            return;
        }
        if let Some(binding) = self.binding.as_mut() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Ws2812: dropped while transmitting; stopping transfer");
            binding.peripheral.stop_transfer(binding.channel);
            self.state = TransmissionState::Idle;
        }
    }
}

/// Writes the colors at full brightness from LED 0, then starts the transfer.
///
/// Colors beyond the active LED count are ignored. Use [`Ws2812::write_frame`] with an explicit
/// brightness to dim.
impl<P: PwmDma, const CAPACITY: usize, const RESET_SLOTS: usize, const LEN: usize> SmartLedsWrite
    for Ws2812<P, CAPACITY, RESET_SLOTS, LEN>
{
    type Error = Error;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<()>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.check_writable()?;
        self.buffer.write_colors(
            iterator.into_iter().map(Into::into),
            Brightness::FULL,
            &self.duty_cycles,
        );
        self.show()
    }
}

/// Declare a [`Ws2812`] type alias for a peripheral, capacity, and reset-slot count.
///
/// The timing buffer length (`capacity * 24 + reset_slots`) is computed for you.
/// `reset_slots` defaults to [`RESET_SLOTS_DEFAULT`](crate::RESET_SLOTS_DEFAULT).
///
/// ```rust
/// use ws2812_pwm_dma::host::RecordingPwmDma;
/// use ws2812_pwm_dma::ws2812_strip;
///
/// ws2812_strip! {
///     Ring: RecordingPwmDma<u32> { capacity: 12 }
/// }
///
/// assert_eq!(Ring::CAPACITY, 12);
/// assert_eq!(Ring::RESET_SLOTS, 240);
/// ```
#[macro_export]
macro_rules! ws2812_strip {
    ($vis:vis $name:ident : $peripheral:ty { capacity: $capacity:expr $(,)? }) => {
        $crate::ws2812_strip! {
            $vis $name: $peripheral {
                capacity: $capacity,
                reset_slots: $crate::RESET_SLOTS_DEFAULT,
            }
        }
    };
    ($vis:vis $name:ident : $peripheral:ty {
        capacity: $capacity:expr,
        reset_slots: $reset_slots:expr $(,)?
    }) => {
        $vis type $name = $crate::Ws2812<
            $peripheral,
            { $capacity },
            { $reset_slots },
            { $crate::timing_buffer_len($capacity, $reset_slots) },
        >;
    };
}
