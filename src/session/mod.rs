//! Speech recognition session lifecycle.
//!
//! The browser's recognizer ends sessions whenever it likes (silence,
//! transient audio errors, network hiccups), so "listening" is modeled as
//! an explicit state machine plus a desired-listening flag that survives
//! platform restarts. See [`SessionManager`].

mod manager;
mod state;

pub use manager::{SessionManager, VOICE_ENABLED_KEY};
pub use state::{SessionState, VoiceSessionStatus};
