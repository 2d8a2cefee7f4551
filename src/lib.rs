//! Lexivox voice core.
//!
//! The voice command engine of the Lexivox vocabulary trainer: a grammar
//! table of recognizable utterances, a matcher, a dispatcher that turns
//! matches into navigation / typed UI events / spoken feedback, a
//! recognition session manager (explicit state machine with confidence
//! gating and auto-restart), and a speech output sequencer that reads a
//! word card aloud segment by segment.
//!
//! The platform speech APIs, navigation, and the preference store are
//! reached through the traits in [`platform`], so the core runs unchanged
//! against a browser bridge, the console demo in `main.rs`, or the in-memory
//! fakes used by the tests.
//!
//! Flow: platform recognizer → [`session::SessionManager`] (lifecycle,
//! confidence gating) → [`grammar::GrammarTable`] (matching) →
//! [`dispatch::Dispatcher`] (effects) → [`events::EventBus`] / navigation /
//! speech feedback.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod grammar;
pub mod platform;
pub mod session;
pub mod speech;
pub mod store;
pub mod words;

pub use config::VoiceConfig;
pub use dispatch::Dispatcher;
pub use error::VoiceError;
pub use events::{EventBus, SortOrder, UiCommand, WordFilter};
pub use grammar::{CommandDefinition, CommandMatch, GrammarTable, actions};
pub use platform::{
    KeyValueStore, Navigator, RecognitionErrorKind, RecognitionEvent, SharedNavigator,
    SharedScheduler, SharedSynthesizer, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent,
    TimerId, TimerScheduler, Utterance, UtteranceId,
};
pub use session::{SessionManager, SessionState, VOICE_ENABLED_KEY, VoiceSessionStatus};
pub use speech::SpeechSequencer;
pub use store::{JsonFileStore, MemoryStore};
pub use words::{Word, WordList};
