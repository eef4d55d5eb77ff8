use heapless::Deque;

use crate::note::Note;

/// Maximum number of notes that can be waiting in the queue.
pub const QUEUE_CAPACITY: usize = 255;

/// Auto-reload value programmed before the first note starts.
const PLACEHOLDER_RELOAD: u32 = 1000;

/// Where the playback engine currently is, derived from the head of
/// the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    /// Queue empty, update interrupt disabled.
    Idle,
    /// Head note has a nonzero frequency and the output pin is toggling.
    Tone,
    /// Head note is a rest; the output pin holds its level.
    Silence,
}

/// Hardware actions requested by one invocation of
/// [`NoteSequencer::on_timer_tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// Drive one square-wave edge on the beeper pin.
    pub toggle: bool,
    /// Timer ticks until the next update event, or `None` once the
    /// queue has drained and the update interrupt should be disabled.
    pub next_reload: Option<u32>,
}

/// FIFO queue of notes played back as a square wave by a hardware
/// timer. The owner wires it to the real timer and pin: foreground
/// code calls [`add_note`]/[`play`], the timer interrupt handler calls
/// [`on_timer_tick`] once per update event and applies the returned
/// [`TickOutcome`]. Both sides must hold the same critical section,
/// since the queue length is shared between them.
///
/// [`add_note`]: NoteSequencer::add_note
/// [`play`]: NoteSequencer::play
/// [`on_timer_tick`]: NoteSequencer::on_timer_tick
#[derive(Debug)]
pub struct NoteSequencer {
    queue: Deque<Note, QUEUE_CAPACITY>,
    elapsed_ms: f32,
    reload: u32,
    timer_clock_hz: u32,
    armed: bool,
}

impl NoteSequencer {
    /// Creates an idle sequencer for a timer counting at
    /// `timer_clock_hz`. `const` so it can live in a
    /// `critical_section::Mutex` static.
    pub const fn new(timer_clock_hz: u32) -> Self {
        Self {
            queue: Deque::new(),
            elapsed_ms: 0.0,
            reload: PLACEHOLDER_RELOAD,
            timer_clock_hz,
            armed: false,
        }
    }

    /// Appends a note to the playback queue. A frequency of zero is a
    /// rest. Returns `false` when the queue already holds
    /// [`QUEUE_CAPACITY`] notes and the note was dropped.
    ///
    /// Enqueueing never touches the timer; playback starts with
    /// [`play`](NoteSequencer::play).
    pub fn add_note(&mut self, frequency: u16, duration_ms: u16) -> bool {
        self.queue
            .push_back(Note::new(frequency, duration_ms))
            .is_ok()
    }

    /// Starts playback from the head of the queue. Returns the
    /// auto-reload value the caller must program into the timer before
    /// enabling the update interrupt, or `None` (no-op) when nothing
    /// is queued.
    pub fn play(&mut self) -> Option<u32> {
        let head = *self.queue.front()?;
        self.reload = self.reload_for(head);
        self.elapsed_ms = 0.0;
        self.armed = true;
        Some(self.reload)
    }

    /// True while notes remain queued, the head note included.
    pub fn is_playing(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Number of queued notes, the head note included.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The note currently being played, if any.
    pub fn current_note(&self) -> Option<Note> {
        self.queue.front().copied()
    }

    /// True while the update interrupt is meant to be enabled.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn state(&self) -> PlaybackState {
        match self.queue.front() {
            None => PlaybackState::Idle,
            Some(note) if note.is_rest() => PlaybackState::Silence,
            Some(_) => PlaybackState::Tone,
        }
    }

    /// Advances playback by one timer update event. The caller clears
    /// the hardware update flag before invoking this.
    ///
    /// A tone tick drives one square-wave edge and accounts for the
    /// half period it spans; a rest has no edges to accumulate
    /// against, so its single update event lands at the end of its
    /// window and finishes it outright. A finished note is popped and
    /// the reload recomputed for the new head. Once the queue is
    /// empty the following event disarms the interrupt.
    pub fn on_timer_tick(&mut self) -> TickOutcome {
        let Some(&head) = self.queue.front() else {
            self.armed = false;
            return TickOutcome {
                toggle: false,
                next_reload: None,
            };
        };

        let mut toggle = false;

        if head.frequency != 0 {
            toggle = true;
            self.elapsed_ms += 1000.0 / (2.0 * head.frequency as f32);
        } else {
            self.elapsed_ms = head.duration_ms as f32 + 1.0;
        }

        if self.elapsed_ms > head.duration_ms as f32 {
            self.queue.pop_front();
            self.elapsed_ms = 0.0;
            if let Some(&next) = self.queue.front() {
                self.reload = self.reload_for(next);
            }
        }

        TickOutcome {
            toggle,
            next_reload: Some(self.reload),
        }
    }

    /// Auto-reload value for one note. A tone fires the timer twice
    /// per cycle (once per edge); a rest fires it once, after the full
    /// window.
    fn reload_for(&self, note: Note) -> u32 {
        if note.frequency != 0 {
            (self.timer_clock_hz as f32 / (2.0 * note.frequency as f32)) as u32
        } else {
            (self.timer_clock_hz as f32 / 1000.0 * note.duration_ms as f32) as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::REST;

    // Matches the RP2040 system timer: one tick per microsecond.
    const TIMER_CLOCK_HZ: u32 = 1_000_000;

    fn sequencer() -> NoteSequencer {
        NoteSequencer::new(TIMER_CLOCK_HZ)
    }

    /// Ticks until the head note changes (or the queue drains).
    /// Returns the number of toggles observed and the outcome of the
    /// tick that retired the note.
    fn play_out_head(seq: &mut NoteSequencer) -> (u32, TickOutcome) {
        let head = seq.current_note().expect("no head note to play out");
        let mut toggles = 0;

        for _ in 0..10_000_000 {
            let outcome = seq.on_timer_tick();
            if outcome.toggle {
                toggles += 1;
            }
            if seq.current_note() != Some(head) {
                return (toggles, outcome);
            }
        }

        panic!("head note never finished");
    }

    #[test]
    fn play_on_empty_queue_is_a_noop() {
        let mut seq = sequencer();

        assert_eq!(seq.play(), None);
        assert!(!seq.is_playing());
        assert!(!seq.is_armed());
        assert_eq!(seq.state(), PlaybackState::Idle);
    }

    #[test]
    fn pending_tracks_queued_notes() {
        let mut seq = sequencer();

        assert_eq!(seq.pending(), 0);
        assert!(seq.add_note(440, 10));
        assert!(seq.add_note(REST, 10));
        assert!(seq.add_note(880, 10));
        assert_eq!(seq.pending(), 3);
        assert!(seq.is_playing());

        seq.play().unwrap();
        play_out_head(&mut seq);
        assert_eq!(seq.pending(), 2);
        play_out_head(&mut seq);
        assert_eq!(seq.pending(), 1);
        play_out_head(&mut seq);
        assert_eq!(seq.pending(), 0);
        assert!(!seq.is_playing());
    }

    #[test]
    fn notes_drain_in_fifo_order() {
        let mut seq = sequencer();
        for freq in [100, 200, 300] {
            assert!(seq.add_note(freq, 5));
        }
        seq.play().unwrap();

        let mut order = Vec::new();
        while let Some(head) = seq.current_note() {
            order.push(head.frequency);
            play_out_head(&mut seq);
        }

        assert_eq!(order, [100, 200, 300]);
    }

    #[test]
    fn queue_saturation_drops_notes() {
        let mut seq = sequencer();

        for _ in 0..QUEUE_CAPACITY {
            assert!(seq.add_note(440, 1));
        }
        assert_eq!(seq.pending(), QUEUE_CAPACITY);

        // 256th note does not fit and must be silently dropped.
        assert!(!seq.add_note(880, 1));
        assert_eq!(seq.pending(), QUEUE_CAPACITY);
        assert_eq!(seq.current_note(), Some(Note::new(440, 1)));
    }

    #[test]
    fn tone_reload_matches_clock_formula() {
        let mut seq = sequencer();
        seq.add_note(440, 100);
        // 1 MHz / (2 * 440 Hz), truncated.
        assert_eq!(seq.play(), Some(1136));
        assert!(seq.is_armed());

        let mut seq = sequencer();
        seq.add_note(500, 100);
        assert_eq!(seq.play(), Some(1000));
    }

    #[test]
    fn tone_toggles_once_per_half_period() {
        // 500 Hz has an exact 1.0 ms half period, so the elapsed-time
        // accounting is exact: the note retires on the first tick past
        // its 100 ms window, after 101 edges.
        let mut seq = sequencer();
        seq.add_note(500, 100);
        seq.play().unwrap();
        assert_eq!(seq.state(), PlaybackState::Tone);

        let (toggles, _) = play_out_head(&mut seq);
        assert_eq!(toggles, 101);
    }

    #[test]
    fn rest_produces_no_toggles_and_spans_its_window() {
        let mut seq = sequencer();
        seq.add_note(REST, 50);
        // 50 ms of silence is a single 50_000-tick timer period.
        assert_eq!(seq.play(), Some(50_000));
        assert_eq!(seq.state(), PlaybackState::Silence);

        let outcome = seq.on_timer_tick();
        assert!(!outcome.toggle);
        assert_eq!(seq.pending(), 0);

        // Queue is empty now; the next event disarms the interrupt.
        let outcome = seq.on_timer_tick();
        assert!(!outcome.toggle);
        assert_eq!(outcome.next_reload, None);
        assert!(!seq.is_armed());
        assert_eq!(seq.state(), PlaybackState::Idle);
    }

    #[test]
    fn zero_duration_rest_advances_immediately() {
        let mut seq = sequencer();
        seq.add_note(REST, 0);
        seq.add_note(440, 10);
        seq.play().unwrap();

        let outcome = seq.on_timer_tick();
        assert!(!outcome.toggle);
        assert_eq!(outcome.next_reload, Some(1136));
        assert_eq!(seq.current_note(), Some(Note::new(440, 10)));
    }

    #[test]
    fn end_to_end_queue_playback() {
        let mut seq = sequencer();
        assert!(seq.add_note(440, 100));
        assert!(seq.add_note(REST, 50));
        assert!(seq.add_note(880, 200));

        assert_eq!(seq.play(), Some(1136));
        assert_eq!(seq.state(), PlaybackState::Tone);

        // ~100 ms at 440 Hz: one toggle per 1000/880 ms half period.
        let (toggles, outcome) = play_out_head(&mut seq);
        assert!((88..=89).contains(&toggles), "got {toggles} toggles");
        assert_eq!(outcome.next_reload, Some(50_000));
        assert_eq!(seq.state(), PlaybackState::Silence);

        // 50 ms rest: a single silent firing.
        let (toggles, outcome) = play_out_head(&mut seq);
        assert_eq!(toggles, 0);
        assert_eq!(outcome.next_reload, Some(568));
        assert_eq!(seq.state(), PlaybackState::Tone);

        // ~200 ms at 880 Hz.
        let (toggles, _) = play_out_head(&mut seq);
        assert!((352..=353).contains(&toggles), "got {toggles} toggles");
        assert!(!seq.is_playing());

        let outcome = seq.on_timer_tick();
        assert_eq!(outcome.next_reload, None);
        assert!(!seq.is_armed());
        assert_eq!(seq.state(), PlaybackState::Idle);
    }
}
