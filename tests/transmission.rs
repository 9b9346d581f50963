#![allow(missing_docs)]
use std::cell::RefCell;
use std::rc::Rc;

use smart_leds::SmartLedsWrite;
use ws2812_pwm_dma::host::RecordingPwmDma;
use ws2812_pwm_dma::{
    DutyCycles, Error, Frame1d, PwmDma, RGB8, Result, TransferRequest, TransmissionState,
    WordWidth, colors, ws2812_strip,
};

ws2812_strip! {
    TinyStrip: RecordingPwmDma<u16> { capacity: 3, reset_slots: 6 }
}

ws2812_strip! {
    ByteStrip: RecordingPwmDma<u8> { capacity: 2, reset_slots: 4 }
}

const INSTANCE: u32 = RecordingPwmDma::<u16>::INSTANCE_DEFAULT;

fn tiny_strip(led_count: usize) -> TinyStrip {
    let mut strip = TinyStrip::new(DutyCycles::<u16>::DEFAULT);
    strip
        .init(RecordingPwmDma::new(), 1, led_count)
        .expect("init should succeed");
    strip
}

#[test]
fn one_red_led_end_to_end() {
    let mut strip = tiny_strip(2);

    strip.set_led(0, RGB8::new(255, 0, 0), 100).unwrap();

    let slots = strip.timing_buffer();
    assert!(slots[0..8].iter().all(|&slot| slot == 26));
    assert!(slots[8..16].iter().all(|&slot| slot == 51));
    assert!(slots[16..24].iter().all(|&slot| slot == 26));

    strip.show().unwrap();
    assert_eq!(strip.state(), TransmissionState::Transmitting);

    let peripheral = strip.peripheral().unwrap();
    assert_eq!(peripheral.transfers().len(), 1);
    let (channel, sent) = &peripheral.transfers()[0];
    assert_eq!(*channel, 1);
    assert_eq!(sent.len(), 2 * 24 + 6);
    assert!(sent[48..54].iter().all(|&slot| slot == 0));

    assert!(strip.on_transfer_complete(INSTANCE));
    assert_eq!(strip.state(), TransmissionState::Idle);
    assert_eq!(strip.peripheral().unwrap().stopped_channels(), [1]);
}

#[test]
fn operations_before_init_are_rejected() {
    let mut strip = TinyStrip::new(DutyCycles::<u16>::DEFAULT);

    assert!(!strip.is_initialized());
    assert_eq!(strip.set_led(0, colors::RED, 100), Err(Error::NotInitialized));
    assert_eq!(strip.fill(colors::RED, 100), Err(Error::NotInitialized));
    assert_eq!(strip.show(), Err(Error::NotInitialized));
    assert!(strip.timing_buffer().iter().all(|&slot| slot == 0));
    assert!(!strip.on_transfer_complete(INSTANCE));
}

#[test]
fn init_clamps_led_count_to_capacity() {
    let mut strip = TinyStrip::new(DutyCycles::<u16>::DEFAULT);

    assert_eq!(strip.init(RecordingPwmDma::new(), 0, 10), Ok(3));
    assert_eq!(strip.active_len(), 3);
    assert_eq!(strip.frame().len(), 3 * 24 + 6);
    assert_eq!(strip.channel(), Some(0));
}

#[test]
fn init_rejects_word_width_mismatch() {
    let mut strip = TinyStrip::new(DutyCycles::<u16>::DEFAULT);
    let peripheral = RecordingPwmDma::new().with_word_width(WordWidth::Bits32);

    assert_eq!(
        strip.init(peripheral, 0, 2),
        Err(Error::WordWidthMismatch {
            slot: WordWidth::Bits16,
            peripheral: WordWidth::Bits32,
        })
    );
    assert!(!strip.is_initialized());
}

#[test]
fn set_led_out_of_range_is_rejected() {
    let mut strip = tiny_strip(2);

    assert_eq!(
        strip.set_led(2, colors::WHITE, 100),
        Err(Error::IndexOutOfRange {
            index: 2,
            active_len: 2
        })
    );
    assert!(strip.timing_buffer().iter().all(|&slot| slot == 0));
}

#[test]
fn show_while_transmitting_is_rejected() {
    let mut strip = tiny_strip(1);
    strip.fill(colors::BLUE, 50).unwrap();
    strip.show().unwrap();

    assert_eq!(strip.show(), Err(Error::TransferInFlight));
    assert_eq!(strip.set_led(0, colors::RED, 100), Err(Error::TransferInFlight));
    assert_eq!(strip.fill(colors::RED, 100), Err(Error::TransferInFlight));
    assert_eq!(strip.prepare_reset_tail(), Err(Error::TransferInFlight));
    assert_eq!(
        strip.init(RecordingPwmDma::new(), 0, 1),
        Err(Error::TransferInFlight)
    );
    assert_eq!(strip.peripheral().unwrap().transfers().len(), 1);
}

#[test]
fn completion_for_another_instance_is_ignored() {
    let mut strip = tiny_strip(1);
    strip.show().unwrap();

    assert!(!strip.on_transfer_complete(INSTANCE + 1));
    assert!(strip.is_transmitting());
    assert!(strip.peripheral().unwrap().stopped_channels().is_empty());

    assert!(strip.on_transfer_complete(INSTANCE));
    assert!(!strip.is_transmitting());
}

#[test]
fn stray_completion_while_idle_is_ignored() {
    let mut strip = tiny_strip(1);

    assert!(!strip.on_transfer_complete(INSTANCE));
    assert_eq!(strip.state(), TransmissionState::Idle);
    assert!(strip.peripheral().unwrap().stopped_channels().is_empty());
}

#[test]
fn rejected_transfer_leaves_strip_idle() {
    let mut strip = TinyStrip::new(DutyCycles::<u16>::DEFAULT);
    strip
        .init(RecordingPwmDma::new().rejecting_transfers(), 0, 1)
        .unwrap();

    assert_eq!(strip.show(), Err(Error::TransferRejected));
    assert_eq!(strip.state(), TransmissionState::Idle);
    assert!(strip.fill(colors::GREEN, 100).is_ok());
}

#[test]
fn shrinking_the_strip_zeroes_the_old_data() {
    let mut strip = tiny_strip(3);
    strip.fill(colors::WHITE, 100).unwrap();
    strip.show().unwrap();
    strip.on_transfer_complete(INSTANCE);

    strip.init(RecordingPwmDma::new(), 1, 1).unwrap();
    strip.show().unwrap();

    let sent = strip.peripheral().unwrap().last_transfer().unwrap();
    assert_eq!(sent.len(), 24 + 6);
    assert!(sent[..24].iter().all(|&slot| slot == 51));
    assert!(strip.timing_buffer()[24..].iter().all(|&slot| slot == 0));
}

#[test]
fn consecutive_frames_send_the_latest_colors() {
    let mut strip = tiny_strip(1);

    strip.fill(colors::BLACK, 100).unwrap();
    strip.show().unwrap();
    strip.on_transfer_complete(INSTANCE);
    strip.fill(colors::WHITE, 100).unwrap();
    strip.show().unwrap();

    let transfers = strip.peripheral().unwrap().transfers();
    assert_eq!(transfers.len(), 2);
    assert!(transfers[0].1[..24].iter().all(|&slot| slot == 26));
    assert!(transfers[1].1[..24].iter().all(|&slot| slot == 51));
}

#[test]
fn write_frame_encodes_each_pixel() {
    let mut strip = tiny_strip(2);
    let mut frame = Frame1d::<3>::new();
    frame[0] = RGB8::new(0, 0xFF, 0);
    frame[2] = colors::WHITE;

    assert_eq!(strip.write_frame(&frame, 100), Ok(2));

    let slots = strip.timing_buffer();
    assert!(slots[..8].iter().all(|&slot| slot == 51));
    assert!(slots[8..48].iter().all(|&slot| slot == 26));
    assert!(slots[48..].iter().all(|&slot| slot == 0));
}

#[test]
fn smart_leds_write_shows_at_full_brightness() {
    let mut strip = tiny_strip(2);

    strip
        .write([RGB8::new(0xFF, 0, 0), RGB8::new(0, 0, 0xFF)].into_iter())
        .unwrap();

    assert!(strip.is_transmitting());
    let sent = strip.peripheral().unwrap().last_transfer().unwrap();
    assert_eq!(sent.len(), 2 * 24 + 6);
    assert!(sent[8..16].iter().all(|&slot| slot == 51));
    assert!(sent[40..48].iter().all(|&slot| slot == 51));
}

#[test]
fn byte_slots_use_byte_transfers() {
    let mut strip = ByteStrip::new(DutyCycles::<u8>::from_period(80));
    strip.init(RecordingPwmDma::new(), 0, 2).unwrap();
    strip.fill(colors::WHITE, 0).unwrap();
    strip.show().unwrap();

    let sent = strip.peripheral().unwrap().last_transfer().unwrap();
    assert_eq!(sent.len(), 2 * 24 + 4);
    assert!(sent[..48].iter().all(|&slot| slot == 26));
}

#[test]
fn macro_defaults_reset_slots() {
    ws2812_strip! {
        DefaultStrip: RecordingPwmDma<u32> { capacity: 5 }
    }

    assert_eq!(DefaultStrip::CAPACITY, 5);
    assert_eq!(DefaultStrip::RESET_SLOTS, 240);

    let strip = DefaultStrip::new(DutyCycles::<u32>::DEFAULT);
    assert_eq!(strip.timing_buffer().len(), 5 * 24 + 240);
}

// Keeps its stop log outside the strip so it can be read after the strip is gone.
struct StopLoggingPwmDma {
    stops: Rc<RefCell<Vec<u32>>>,
}

impl PwmDma for StopLoggingPwmDma {
    type Slot = u16;
    type Channel = u32;
    type Instance = u32;

    fn word_width(&self) -> WordWidth {
        WordWidth::Bits16
    }

    fn instance(&self) -> u32 {
        INSTANCE
    }

    fn start_transfer(&mut self, _request: TransferRequest<'_, u16, u32>) -> Result<()> {
        Ok(())
    }

    fn stop_transfer(&mut self, channel: u32) {
        self.stops.borrow_mut().push(channel);
    }
}

ws2812_strip! {
    LoggedStrip: StopLoggingPwmDma { capacity: 2, reset_slots: 4 }
}

#[test]
fn dropping_a_transmitting_strip_stops_the_transfer() {
    let stops = Rc::new(RefCell::new(Vec::new()));
    let mut strip = LoggedStrip::new(DutyCycles::<u16>::DEFAULT);
    strip
        .init(StopLoggingPwmDma { stops: Rc::clone(&stops) }, 3, 2)
        .unwrap();
    strip.fill(colors::WHITE, 100).unwrap();
    strip.show().unwrap();

    drop(strip);

    assert_eq!(*stops.borrow(), [3]);
}

#[test]
fn dropping_an_idle_strip_leaves_the_output_alone() {
    let stops = Rc::new(RefCell::new(Vec::new()));
    let mut strip = LoggedStrip::new(DutyCycles::<u16>::DEFAULT);
    strip
        .init(StopLoggingPwmDma { stops: Rc::clone(&stops) }, 3, 2)
        .unwrap();
    strip.show().unwrap();
    assert!(strip.on_transfer_complete(INSTANCE));

    drop(strip);

    assert_eq!(*stops.borrow(), [3]);
}
