#![no_std]

pub mod beeper;

/// RP2040 system timer tick rate: one tick per microsecond.
pub const TIMER_CLOCK_HZ: u32 = 1_000_000;
