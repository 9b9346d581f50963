//! Blink an 8-LED strip red on GPIO 2 (PWM slice 1, output A) of a Pico 1.
//!
//! Build with `--no-default-features --features embedded`.
#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::peripherals::DMA_CH0;
use embassy_rp::pwm::Config;
use embassy_time::{Duration, Timer};
use ws2812_pwm_dma::rp::{PwmOutput, RpPwmDma, complete_transfer};
use ws2812_pwm_dma::{DutyCycles, Result, SharedWs2812, colors, ws2812_strip};
use {defmt_rtt as _, panic_probe as _};

ws2812_strip! {
    Strip8: RpPwmDma<'static, DMA_CH0> { capacity: 8 }
}

// 125 MHz / 156 ticks = 800 kHz bit rate
const PWM_TOP: u16 = 155;

// DutyCycles::from_period(156), spelled out so it can initialize a static.
static STRIP: SharedWs2812<Strip8> = SharedWs2812::new(DutyCycles::<u16>::new(50, 99));

#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    let err = inner_main().await.unwrap_err();
    core::panic!("{err}");
}

async fn inner_main() -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let mut config = Config::default();
    config.top = PWM_TOP;
    config.compare_a = 0;
    let output = RpPwmDma::new_output_a(p.PWM_SLICE1, p.PIN_2, config, p.DMA_CH0);

    let led_count = STRIP.init(output, PwmOutput::A, 8)?;
    info!("strip ready with {} LEDs", led_count);

    loop {
        for brightness in [20, 0] {
            STRIP.fill(colors::RED, brightness)?;
            STRIP.show()?;
            complete_transfer(&STRIP).await;
            Timer::after(Duration::from_millis(500)).await;
        }
    }
}
