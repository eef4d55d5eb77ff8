#![no_std]
#![no_main]

use core::cell::RefCell;

use critical_section::Mutex;
use defmt_rtt as _;
use panic_probe as _;
use rp_pico::{
    entry,
    hal::{
        self,
        fugit::ExtU32,
        timer::{Alarm, Alarm0},
    },
};

use hal::{
    clocks::init_clocks_and_plls,
    pac::{self, interrupt},
    watchdog::Watchdog,
    Sio,
};

use beeper_core::{note, NoteSequencer};
use beeper_firmware::{beeper::Beeper, TIMER_CLOCK_HZ};

// These can be static mut because they're set once and only ever accessed in
// the timer interrupt
static mut ALARM0: Option<Alarm0> = None;
static mut BEEPER: Option<Beeper> = None;

/* State */

static SEQUENCER: Mutex<RefCell<NoteSequencer>> =
    Mutex::new(RefCell::new(NoteSequencer::new(TIMER_CLOCK_HZ)));

/// Power-on jingle: C major scale up, a breath, then the octave.
const MELODY: [(u16, u16); 9] = [
    (note::C5, 150),
    (note::D5, 150),
    (note::E5, 150),
    (note::F5, 150),
    (note::G5, 150),
    (note::A5, 150),
    (note::B5, 150),
    (note::REST, 100),
    (note::C6, 300),
];

#[entry]
fn main() -> ! {
    defmt::info!("Beeper Firmware v{}", env!("CARGO_PKG_VERSION"));

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

    /* Set up the beeper pin */

    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let beeper = Beeper::new(pins.gpio15.into_push_pull_output());

    unsafe {
        BEEPER = Some(beeper);
    }

    /* Set up the note timer */

    let mut timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let alarm0 = timer.alarm_0().unwrap();

    unsafe {
        ALARM0 = Some(alarm0);
    };

    /* Queue the jingle and start playback */

    critical_section::with(|cs| {
        let mut sequencer = SEQUENCER.borrow(cs).borrow_mut();

        for (frequency, duration_ms) in MELODY {
            if !sequencer.add_note(frequency, duration_ms) {
                defmt::warn!("note queue full, dropped {} Hz note", frequency);
            }
        }

        defmt::info!("playing {} notes", sequencer.pending());

        if let Some(reload) = sequencer.play() {
            let alarm = unsafe { ALARM0.as_mut().unwrap() };
            alarm.schedule(reload.micros()).unwrap();
            alarm.enable_interrupt();
        }
    });

    unsafe {
        pac::NVIC::unmask(hal::pac::Interrupt::TIMER_IRQ_0);
    };

    /* Do nothing on the main thread */

    loop {
        cortex_m::asm::wfi();
    }
}

/// Fires once per square-wave edge while a tone plays, and once per
/// full window while a rest plays. Reschedules itself from the
/// sequencer's reload value until the queue drains.
#[interrupt]
fn TIMER_IRQ_0() {
    // Grab the global objects. This is OK as we only access them under
    // interrupt.
    let alarm = unsafe { ALARM0.as_mut().unwrap() };
    let beeper = unsafe { BEEPER.as_mut().unwrap() };

    alarm.clear_interrupt();

    critical_section::with(|cs| {
        let outcome = SEQUENCER.borrow(cs).borrow_mut().on_timer_tick();

        if outcome.toggle {
            beeper.toggle();
        }

        match outcome.next_reload {
            // One reload tick is one microsecond on the 1 MHz system timer.
            Some(reload) => {
                alarm.schedule(reload.micros()).unwrap();
                alarm.enable_interrupt();
            }
            None => {
                alarm.disable_interrupt();
                beeper.silence();
                defmt::debug!("note queue drained, beeper idle");
            }
        }
    });
}
