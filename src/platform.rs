//! Trait seams to the host platform.
//!
//! The browser owns the actual speech recognition and synthesis objects,
//! navigation, and the preference store. The core talks to them through
//! these narrow traits so everything is injectable and testable with
//! in-memory fakes.
//!
//! The concurrency model is a single-threaded callback loop: the host
//! delivers recognition events into [`crate::session::SessionManager`],
//! synthesis completions into [`crate::speech::SpeechSequencer`], and timer
//! fires into both. Shared collaborators are passed as `Rc<RefCell<dyn ...>>`
//! handles; no `Send`/`Sync` bounds are imposed.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::error::VoiceError;

/// Identifier for a queued synthesis utterance.
///
/// Completion events carry the id back; the sequencer uses it to reject
/// late callbacks from utterances it has already cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u64);

/// Identifier for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// One piece of text to speak, with fixed prosody parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Events the platform recognizer delivers into the session manager.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// The recognition session actually started.
    Started,
    /// A recognized (interim or final) transcript.
    Result {
        transcript: String,
        confidence: f32,
        is_final: bool,
    },
    /// The platform reported an error; the session is over.
    Error(RecognitionErrorKind),
    /// The platform ended the session on its own (continuous recognizers
    /// do this after silence).
    Ended,
}

/// Known platform recognition error codes, mapped from the browser's
/// error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    NoSpeech,
    AudioCapture,
    Network,
    NotAllowed,
    Aborted,
    Other,
}

/// Completion events the platform synthesizer delivers into the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisEvent {
    /// The utterance finished playing.
    Ended(UtteranceId),
    /// Playback failed; the utterance will not finish.
    Error(UtteranceId),
}

/// The platform's speech recognition object.
///
/// Exactly one recognition session is active at a time; the session manager
/// owns this exclusively and guards against double starts.
pub trait SpeechRecognizer {
    /// Capability probe, checked once at construction. When false, the
    /// session manager turns every start attempt into a no-op.
    fn is_supported(&self) -> bool;

    /// Start a continuous recognition session.
    fn start(&mut self) -> Result<(), VoiceError>;

    /// Stop the current session. Idempotent.
    fn stop(&mut self);
}

/// The platform's speech synthesis object.
///
/// Owned exclusively by the sequencer at any moment; dispatch feedback goes
/// through the same handle. Work queued before [`Self::cancel`] may still
/// report completion afterwards, which is why completions carry ids.
pub trait SpeechSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> UtteranceId;

    /// Drop the current utterance and anything queued.
    fn cancel(&mut self);

    /// Pause playback of the current utterance.
    fn pause(&mut self);

    /// Resume a paused utterance.
    fn resume(&mut self);
}

/// Page navigation, e.g. a router push in the hosting UI.
pub trait Navigator {
    fn navigate_to(&mut self, path: &str);
}

/// Minimal persisted key-value store (the local-storage analog).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// One-shot timers for backoff, segment pauses and auto-advance.
///
/// The host delivers fires into `handle_timer(TimerId)` of whichever
/// component scheduled them; components ignore ids they don't know, so a
/// single fan-out to both manager and sequencer is fine. Cancelled timers
/// must never fire.
pub trait TimerScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

pub type SharedSynthesizer = Rc<RefCell<dyn SpeechSynthesizer>>;
pub type SharedScheduler = Rc<RefCell<dyn TimerScheduler>>;
pub type SharedNavigator = Rc<RefCell<dyn Navigator>>;
