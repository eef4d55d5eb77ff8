/// One segment of the playback sequence: a square-wave tone at
/// `frequency` Hz held for `duration_ms` milliseconds, or silence for
/// the same window when the frequency is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    pub frequency: u16,
    pub duration_ms: u16,
}

impl Note {
    pub const fn new(frequency: u16, duration_ms: u16) -> Self {
        Self {
            frequency,
            duration_ms,
        }
    }

    pub const fn is_rest(&self) -> bool {
        self.frequency == 0
    }
}

/// Frequency of a silent segment.
pub const REST: u16 = 0;

// Equal-tempered pitches (Hz, truncated), octaves 4 through 6.
pub const C4: u16 = 261;
pub const CS4: u16 = 277;
pub const D4: u16 = 293;
pub const DS4: u16 = 311;
pub const E4: u16 = 329;
pub const F4: u16 = 349;
pub const FS4: u16 = 369;
pub const G4: u16 = 392;
pub const GS4: u16 = 415;
pub const A4: u16 = 440;
pub const AS4: u16 = 466;
pub const B4: u16 = 493;
pub const C5: u16 = 523;
pub const CS5: u16 = 554;
pub const D5: u16 = 587;
pub const DS5: u16 = 622;
pub const E5: u16 = 659;
pub const F5: u16 = 698;
pub const FS5: u16 = 739;
pub const G5: u16 = 783;
pub const GS5: u16 = 830;
pub const A5: u16 = 880;
pub const AS5: u16 = 932;
pub const B5: u16 = 987;
pub const C6: u16 = 1046;
pub const CS6: u16 = 1108;
pub const D6: u16 = 1174;
pub const DS6: u16 = 1244;
pub const E6: u16 = 1318;
pub const F6: u16 = 1396;
pub const FS6: u16 = 1479;
pub const G6: u16 = 1567;
pub const GS6: u16 = 1661;
pub const A6: u16 = 1760;
pub const AS6: u16 = 1864;
pub const B6: u16 = 1975;
pub const C7: u16 = 2093;
