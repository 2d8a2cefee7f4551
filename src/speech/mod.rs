//! Read-aloud output for the word modal.

mod sequencer;

pub use sequencer::SpeechSequencer;
