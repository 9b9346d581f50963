#![allow(missing_docs)]
use ws2812_pwm_dma::{Brightness, DutyCycles, Error, RGB8, StripBuffer, colors, timing_buffer_len};

type SmallBuffer = StripBuffer<u16, 4, 10, { timing_buffer_len(4, 10) }>;

const DUTY_CYCLES: DutyCycles<u16> = DutyCycles::<u16>::DEFAULT;

#[test]
fn buffer_length_covers_capacity_and_reset_slots() {
    let buffer = SmallBuffer::new();

    assert_eq!(SmallBuffer::LEN, 4 * 24 + 10);
    assert_eq!(buffer.as_slice().len(), 106);
    assert!(buffer.as_slice().iter().all(|&slot| slot == 0));
    assert_eq!(buffer.active_len(), 0);
    assert_eq!(buffer.capacity(), 4);
}

#[test]
fn active_len_is_clamped_to_capacity() {
    let mut buffer = SmallBuffer::new();

    assert_eq!(buffer.set_active_len(9), 4);
    assert_eq!(buffer.active_len(), 4);
    assert_eq!(buffer.frame_len(), 4 * 24 + 10);

    assert_eq!(buffer.set_active_len(0), 0);
    assert_eq!(buffer.frame().len(), 10);
}

#[test]
fn out_of_range_index_leaves_buffer_unchanged() {
    let mut buffer = SmallBuffer::new();
    buffer.set_active_len(2);
    buffer.set_led(1, colors::WHITE, Brightness::FULL, &DUTY_CYCLES).unwrap();
    let before = buffer.clone();

    let result = buffer.set_led(2, colors::RED, Brightness::FULL, &DUTY_CYCLES);

    assert_eq!(
        result,
        Err(Error::IndexOutOfRange {
            index: 2,
            active_len: 2
        })
    );
    assert_eq!(buffer.as_slice(), before.as_slice());
}

#[test]
fn reset_tail_is_zeroed_after_shrinking() {
    let mut buffer = SmallBuffer::new();
    buffer.set_active_len(4);
    buffer.fill(colors::WHITE, Brightness::FULL, &DUTY_CYCLES);

    buffer.set_active_len(1);
    buffer.prepare_reset_tail();

    assert!(buffer.as_slice()[..24].iter().all(|&slot| slot == 51));
    assert!(buffer.as_slice()[24..].iter().all(|&slot| slot == 0));
    assert_eq!(buffer.frame().len(), 24 + 10);
}

#[test]
fn fill_writes_only_active_leds() {
    let mut buffer = SmallBuffer::new();
    buffer.set_active_len(3);

    buffer.fill(RGB8::new(0, 0xFF, 0), Brightness::FULL, &DUTY_CYCLES);

    for led in buffer.as_slice()[..3 * 24].chunks(24) {
        assert!(led[..8].iter().all(|&slot| slot == 51));
        assert!(led[8..].iter().all(|&slot| slot == 26));
    }
    assert!(buffer.as_slice()[3 * 24..].iter().all(|&slot| slot == 0));
}

#[test]
fn write_colors_stops_at_active_len() {
    let mut buffer = SmallBuffer::new();
    buffer.set_active_len(2);

    let written = buffer.write_colors(
        [colors::RED, colors::GREEN, colors::BLUE],
        Brightness::FULL,
        &DUTY_CYCLES,
    );

    assert_eq!(written, 2);
    assert!(buffer.as_slice()[2 * 24..].iter().all(|&slot| slot == 0));
}

#[test]
fn write_colors_with_fewer_colors_keeps_later_leds() {
    let mut buffer = SmallBuffer::new();
    buffer.set_active_len(3);
    buffer.fill(colors::WHITE, Brightness::FULL, &DUTY_CYCLES);

    let written = buffer.write_colors([colors::BLACK], Brightness::FULL, &DUTY_CYCLES);

    assert_eq!(written, 1);
    assert!(buffer.as_slice()[..24].iter().all(|&slot| slot == 26));
    assert!(buffer.as_slice()[24..3 * 24].iter().all(|&slot| slot == 51));
}
