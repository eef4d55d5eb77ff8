#![cfg_attr(not(test), no_std)]

pub mod note;
pub mod sequencer;

pub use note::Note;
pub use sequencer::{NoteSequencer, PlaybackState, TickOutcome, QUEUE_CAPACITY};
