use embedded_hal::digital::{OutputPin, StatefulOutputPin};
use rp_pico::hal::gpio::{bank0::Gpio15, FunctionSio, Pin, PullDown, SioOutput};

type BeeperPin = Pin<Gpio15, FunctionSio<SioOutput>, PullDown>;

/// Push-pull output pin driving a passive piezo beeper.
pub struct Beeper {
    pin: BeeperPin,
}

impl Beeper {
    pub fn new(mut pin: BeeperPin) -> Self {
        pin.set_low().unwrap();

        Self { pin }
    }

    /// Drives one square-wave edge.
    #[inline]
    pub fn toggle(&mut self) {
        self.pin.toggle().unwrap();
    }

    /// Parks the pin low between melodies.
    #[inline]
    pub fn silence(&mut self) {
        self.pin.set_low().unwrap();
    }
}
