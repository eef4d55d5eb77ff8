//! Hardware bring-up check: holds a constant 440 Hz tone on the beeper
//! pin with blocking delays, bypassing the sequencer entirely.

#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embedded_hal::delay::DelayNs;
use panic_probe as _;
use rp_pico::{entry, hal};

use hal::{clocks::init_clocks_and_plls, pac, watchdog::Watchdog, Sio};

use beeper_core::note;
use beeper_firmware::{beeper::Beeper, TIMER_CLOCK_HZ};

#[entry]
fn main() -> ! {
    info!("Beeper steady tone check v{}", env!("CARGO_PKG_VERSION"));

    let mut pac = pac::Peripherals::take().unwrap();
    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let sio = Sio::new(pac.SIO);

    let clocks = init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let mut timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut beeper = Beeper::new(pins.gpio15.into_push_pull_output());

    let half_period_us = TIMER_CLOCK_HZ / (2 * note::A4 as u32);

    info!("toggling GPIO15 at {} Hz", note::A4);

    loop {
        beeper.toggle();
        timer.delay_us(half_period_us);
    }
}
