//! The recognition session manager.

use std::rc::Rc;
use std::time::Duration;

use crate::config::VoiceConfig;
use crate::dispatch::Dispatcher;
use crate::grammar::GrammarTable;
use crate::platform::{
    KeyValueStore, RecognitionErrorKind, RecognitionEvent, SharedScheduler, SpeechRecognizer,
    TimerId,
};

use super::state::{SessionState, VoiceSessionStatus};

/// Store key for the persisted voice preference.
pub const VOICE_ENABLED_KEY: &str = "voice-enabled";

/// Owns the continuous listening session: start/stop, auto-restart with
/// backoff after transient errors, confidence gating, and routing of final
/// transcripts through the grammar to the dispatcher.
///
/// The platform delivers its callbacks into [`SessionManager::handle_event`]
/// and timer fires into [`SessionManager::handle_timer`]. All failures end
/// up in [`VoiceSessionStatus`] or spoken feedback; nothing here panics the
/// hosting UI.
pub struct SessionManager {
    state: SessionState,
    status: VoiceSessionStatus,
    config: VoiceConfig,
    grammar: Rc<GrammarTable>,
    dispatcher: Dispatcher,
    recognizer: Box<dyn SpeechRecognizer>,
    scheduler: SharedScheduler,
    store: Box<dyn KeyValueStore>,
    /// What the user wants, independent of what the platform is doing.
    /// Drives whether auto-restart is attempted.
    desired_listening: bool,
    pending_restart: Option<TimerId>,
    pending_error_clear: Option<TimerId>,
}

impl SessionManager {
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        scheduler: SharedScheduler,
        store: Box<dyn KeyValueStore>,
        grammar: Rc<GrammarTable>,
        dispatcher: Dispatcher,
        config: VoiceConfig,
    ) -> Self {
        let is_supported = recognizer.is_supported();
        if !is_supported {
            tracing::info!("speech recognition unsupported, voice commands disabled");
        }

        // A missing key means the user never opted out.
        let voice_enabled = store
            .get(VOICE_ENABLED_KEY)
            .map(|v| v == "true")
            .unwrap_or(true);

        Self {
            state: SessionState::Idle,
            status: VoiceSessionStatus {
                is_supported,
                voice_enabled,
                ..VoiceSessionStatus::default()
            },
            config,
            grammar,
            dispatcher,
            recognizer,
            scheduler,
            store,
            desired_listening: false,
            pending_restart: None,
            pending_error_clear: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn status(&self) -> &VoiceSessionStatus {
        &self.status
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Atomically replace the grammar table (after a word-list change).
    pub fn set_grammar(&mut self, grammar: Rc<GrammarTable>) {
        self.grammar = grammar;
    }

    pub fn grammar(&self) -> &GrammarTable {
        &self.grammar
    }

    /// Begin continuous listening.
    ///
    /// No-op when the platform is unsupported, when voice is disabled, or
    /// when a session is already starting or running (double-start guard).
    pub fn start_listening(&mut self) {
        if !self.status.is_supported {
            tracing::debug!("start_listening ignored: unsupported platform");
            return;
        }
        if !self.status.voice_enabled {
            tracing::debug!("start_listening ignored: voice disabled");
            return;
        }
        if self.state.is_active() {
            tracing::debug!(state = %self.state, "start_listening ignored: already active");
            return;
        }

        self.desired_listening = true;
        self.begin_session();
    }

    /// Stop listening and cancel any pending auto-restart.
    pub fn stop_listening(&mut self) {
        self.desired_listening = false;
        self.cancel_pending_restart();
        self.cancel_pending_error_clear();
        self.recognizer.stop();
        self.state = SessionState::Stopped;
        self.status.is_listening = false;
        tracing::debug!("listening stopped");
    }

    /// Flip and persist the voice preference. Disabling mid-session stops
    /// the session. Returns the new value.
    pub fn toggle_voice_enabled(&mut self) -> bool {
        let enabled = !self.status.voice_enabled;
        self.status.voice_enabled = enabled;
        self.store
            .set(VOICE_ENABLED_KEY, if enabled { "true" } else { "false" });
        if !enabled && (self.state.is_active() || self.pending_restart.is_some()) {
            self.stop_listening();
        }
        enabled
    }

    /// Feed a platform recognition event through the state machine.
    pub fn handle_event(&mut self, event: RecognitionEvent) {
        if self.state == SessionState::Stopped {
            // Late platform callbacks after an explicit stop must not
            // resurrect the session.
            tracing::trace!(?event, "dropping event after stop");
            return;
        }

        match event {
            RecognitionEvent::Started => {
                self.state = SessionState::Listening;
                self.status.is_listening = true;
            }
            RecognitionEvent::Result {
                transcript,
                confidence,
                is_final,
            } => {
                self.on_result(transcript, confidence, is_final);
            }
            RecognitionEvent::Error(kind) => {
                self.set_error(error_message(kind));
                self.status.is_listening = false;
                self.state = SessionState::ErrorBackoff;
                tracing::debug!(?kind, "recognition error");
                if self.desired_listening {
                    self.schedule_restart();
                }
            }
            RecognitionEvent::Ended => {
                self.status.is_listening = false;
                if self.desired_listening {
                    // Continuous mode: the platform gave up, we didn't.
                    self.state = SessionState::ErrorBackoff;
                    self.schedule_restart();
                } else if self.state != SessionState::Stopped {
                    self.state = SessionState::Idle;
                }
            }
        }
    }

    /// Deliver a timer fire. Ids this manager didn't schedule are ignored.
    pub fn handle_timer(&mut self, id: TimerId) {
        if self.pending_restart == Some(id) {
            self.pending_restart = None;
            if self.desired_listening {
                self.begin_session();
            }
        } else if self.pending_error_clear == Some(id) {
            self.pending_error_clear = None;
            self.status.error = None;
        }
    }

    fn on_result(&mut self, transcript: String, confidence: f32, is_final: bool) {
        self.status.transcript = transcript.clone();
        if !is_final {
            return;
        }

        if confidence < self.config.confidence_threshold {
            // Low-confidence finals must never trigger actions.
            tracing::debug!(confidence, transcript = %transcript, "final below confidence threshold");
            self.set_error("I didn't catch that clearly, please try again".to_string());
            return;
        }

        self.status.error = None;
        match self.grammar.match_utterance(&transcript) {
            Some(m) => {
                self.status.last_command = Some(m.raw_text.clone());
                tracing::debug!(action = %m.action, utterance = %m.raw_text, "voice command matched");
                self.dispatcher.dispatch(&m.action, Some(&m.raw_text));
            }
            None => {
                // Not a command: last_command and error stay untouched.
                tracing::trace!(transcript = %transcript, "utterance matched no command");
            }
        }
    }

    fn begin_session(&mut self) {
        self.state = SessionState::Starting;
        if let Err(e) = self.recognizer.start() {
            tracing::warn!(error = %e, "failed to start recognition session");
            self.set_error(format!("Could not start listening: {e}"));
            self.state = SessionState::Idle;
            self.status.is_listening = false;
        }
    }

    /// Schedule a single restart; any earlier pending restart is cancelled
    /// first so backoffs never stack into overlapping sessions.
    fn schedule_restart(&mut self) {
        self.cancel_pending_restart();
        let id = self
            .scheduler
            .borrow_mut()
            .schedule(Duration::from_millis(self.config.restart_delay_ms));
        self.pending_restart = Some(id);
    }

    fn cancel_pending_restart(&mut self) {
        if let Some(id) = self.pending_restart.take() {
            self.scheduler.borrow_mut().cancel(id);
        }
    }

    fn cancel_pending_error_clear(&mut self) {
        if let Some(id) = self.pending_error_clear.take() {
            self.scheduler.borrow_mut().cancel(id);
        }
    }

    /// Set a transient status message that clears itself after a while.
    fn set_error(&mut self, message: String) {
        self.status.error = Some(message);
        self.cancel_pending_error_clear();
        let id = self
            .scheduler
            .borrow_mut()
            .schedule(Duration::from_millis(self.config.error_clear_ms));
        self.pending_error_clear = Some(id);
    }
}

fn error_message(kind: RecognitionErrorKind) -> String {
    match kind {
        RecognitionErrorKind::NoSpeech => "No speech was detected",
        RecognitionErrorKind::AudioCapture => "Microphone is unavailable",
        RecognitionErrorKind::Network => "Network error during recognition",
        RecognitionErrorKind::NotAllowed => "Microphone permission was denied",
        RecognitionErrorKind::Aborted => "Listening was interrupted",
        RecognitionErrorKind::Other => "Speech recognition error",
    }
    .to_string()
}
