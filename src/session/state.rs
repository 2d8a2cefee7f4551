//! Session state machine states and observable status.

/// Recognition session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session, none wanted.
    #[default]
    Idle,
    /// Platform start issued, waiting for its start callback.
    Starting,
    /// Session active, results flowing.
    Listening,
    /// Session died on its own; a restart is (possibly) pending.
    ErrorBackoff,
    /// Explicitly stopped by the user; terminal until the next start.
    Stopped,
}

impl SessionState {
    /// True while a platform session exists or is being created.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Starting | SessionState::Listening)
    }

    pub fn is_listening(&self) -> bool {
        matches!(self, SessionState::Listening)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Starting => write!(f, "Starting"),
            SessionState::Listening => write!(f, "Listening"),
            SessionState::ErrorBackoff => write!(f, "ErrorBackoff"),
            SessionState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Status fields the hosting UI renders.
///
/// One instance per running application; recreated on reload, never
/// persisted (except the `voice_enabled` preference, which goes through
/// the injected store).
#[derive(Debug, Clone, Default)]
pub struct VoiceSessionStatus {
    /// True while the recognition session is active.
    pub is_listening: bool,
    /// Platform capability, probed once at construction.
    pub is_supported: bool,
    /// Last interim-or-final transcript; overwritten each result.
    pub transcript: String,
    /// Last error message; auto-cleared after a short delay.
    pub error: Option<String>,
    /// Last normalized utterance that was routed to the dispatcher.
    pub last_command: Option<String>,
    /// User preference, persisted through the injected key-value store.
    pub voice_enabled: bool,
}
