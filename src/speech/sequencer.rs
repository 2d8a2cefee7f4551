//! Speaks an ordered list of text segments, one at a time.

use std::time::Duration;

use crate::config::VoiceConfig;
use crate::platform::{
    SharedScheduler, SharedSynthesizer, SynthesisEvent, TimerId, Utterance, UtteranceId,
};

/// One read-aloud run: the segments of a single word, spoken in order.
struct Job {
    segments: Vec<String>,
    current: usize,
    paused: bool,
    /// The utterance currently playing. Synthesis events for any other id
    /// belong to a cancelled job and are dropped.
    current_utterance: Option<UtteranceId>,
    /// Timer for the pause before the next segment.
    pending_next: Option<TimerId>,
    /// Set when the inter-segment timer fired while paused; the advance
    /// happens on resume instead.
    advance_on_resume: bool,
}

/// Sequences text-to-speech segments for the word modal.
///
/// At most one job is active; starting a new one always cancels the old one
/// first. Cancellation clears all local timers and the current-utterance id
/// before touching the platform, so a late platform callback can never
/// resurrect a dead job. On natural completion (never on cancel) an
/// installed advance callback fires after a delay, which is what chains
/// read-aloud across the whole word list.
pub struct SpeechSequencer {
    synthesizer: SharedSynthesizer,
    scheduler: SharedScheduler,
    config: VoiceConfig,
    job: Option<Job>,
    /// Segments kept around for `repeat` across the settle delay.
    pending_repeat: Option<(TimerId, Vec<String>)>,
    pending_advance: Option<TimerId>,
    on_advance: Option<Box<dyn FnMut()>>,
}

impl SpeechSequencer {
    pub fn new(
        synthesizer: SharedSynthesizer,
        scheduler: SharedScheduler,
        config: VoiceConfig,
    ) -> Self {
        Self {
            synthesizer,
            scheduler,
            config,
            job: None,
            pending_repeat: None,
            pending_advance: None,
            on_advance: None,
        }
    }

    /// Install the auto-advance hook. It fires after a full read-through
    /// plus the configured delay; the host reacts by moving to the next
    /// word and calling [`SpeechSequencer::speak_all`] for it. The callback
    /// must not re-enter the sequencer synchronously.
    pub fn set_on_advance(&mut self, callback: impl FnMut() + 'static) {
        self.on_advance = Some(Box::new(callback));
    }

    pub fn clear_on_advance(&mut self) {
        self.on_advance = None;
    }

    pub fn is_speaking(&self) -> bool {
        self.job.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.job.as_ref().is_some_and(|j| j.paused)
    }

    /// Speak `segments` strictly in order. Any prior job is cancelled
    /// before the first segment plays.
    pub fn speak_all(&mut self, segments: Vec<String>) {
        self.cancel();
        if segments.is_empty() {
            return;
        }

        let mut job = Job {
            segments,
            current: 0,
            paused: false,
            current_utterance: None,
            pending_next: None,
            advance_on_resume: false,
        };
        job.current_utterance = Some(self.speak_segment(&job.segments[0]));
        self.job = Some(job);
    }

    /// Stop immediately. Local state and timers are torn down before the
    /// platform cancel so nothing queued can fire into a dead job.
    pub fn cancel(&mut self) {
        if let Some((id, _)) = self.pending_repeat.take() {
            self.scheduler.borrow_mut().cancel(id);
        }
        if let Some(id) = self.pending_advance.take() {
            self.scheduler.borrow_mut().cancel(id);
        }
        if let Some(job) = self.job.take() {
            if let Some(id) = job.pending_next {
                self.scheduler.borrow_mut().cancel(id);
            }
            self.synthesizer.borrow_mut().cancel();
        }
    }

    /// Pause the current utterance. The sequencer does not advance while
    /// paused.
    pub fn pause(&mut self) {
        if let Some(job) = &mut self.job {
            if !job.paused {
                job.paused = true;
                self.synthesizer.borrow_mut().pause();
            }
        }
    }

    pub fn resume(&mut self) {
        let mut advance = false;
        if let Some(job) = &mut self.job {
            if job.paused {
                job.paused = false;
                if job.advance_on_resume {
                    job.advance_on_resume = false;
                    advance = true;
                } else {
                    self.synthesizer.borrow_mut().resume();
                }
            }
        }
        if advance {
            self.advance_to_next_segment();
        }
    }

    /// Start the current job over from segment 0: cancel outright, then
    /// restart after a settle delay so the platform finishes cancelling.
    pub fn repeat(&mut self) {
        let Some(job) = &self.job else {
            return;
        };
        let segments = job.segments.clone();
        self.cancel();

        let id = self
            .scheduler
            .borrow_mut()
            .schedule(Duration::from_millis(self.config.settle_delay_ms));
        self.pending_repeat = Some((id, segments));
    }

    /// Deliver a platform synthesis completion or error.
    pub fn handle_synth_event(&mut self, event: SynthesisEvent) {
        let (SynthesisEvent::Ended(id) | SynthesisEvent::Error(id)) = event;

        let Some(job) = &mut self.job else {
            return;
        };
        if job.current_utterance != Some(id) {
            // Stale callback from an utterance we already cancelled.
            return;
        }
        job.current_utterance = None;

        if matches!(event, SynthesisEvent::Error(_)) {
            tracing::warn!("speech synthesis failed, aborting read-aloud");
            self.job = None;
            return;
        }

        if job.current + 1 < job.segments.len() {
            let id = self
                .scheduler
                .borrow_mut()
                .schedule(Duration::from_millis(self.config.segment_pause_ms));
            job.pending_next = Some(id);
        } else {
            // Natural completion of the whole list.
            self.job = None;
            if self.on_advance.is_some() {
                let id = self
                    .scheduler
                    .borrow_mut()
                    .schedule(Duration::from_millis(self.config.advance_delay_ms));
                self.pending_advance = Some(id);
            }
        }
    }

    /// Deliver a timer fire. Ids this sequencer didn't schedule are ignored.
    pub fn handle_timer(&mut self, id: TimerId) {
        if let Some((pending, segments)) = self.pending_repeat.take() {
            if pending == id {
                self.speak_all(segments);
                return;
            }
            self.pending_repeat = Some((pending, segments));
        }

        if self.pending_advance == Some(id) {
            self.pending_advance = None;
            if let Some(mut callback) = self.on_advance.take() {
                callback();
                // A callback may have installed a replacement.
                if self.on_advance.is_none() {
                    self.on_advance = Some(callback);
                }
            }
            return;
        }

        let mut advance = false;
        if let Some(job) = &mut self.job {
            if job.pending_next == Some(id) {
                job.pending_next = None;
                if job.paused {
                    job.advance_on_resume = true;
                } else {
                    advance = true;
                }
            }
        }
        if advance {
            self.advance_to_next_segment();
        }
    }

    fn advance_to_next_segment(&mut self) {
        let mut next_segment = None;
        if let Some(job) = &mut self.job {
            job.current += 1;
            next_segment = Some(job.segments[job.current].clone());
        }
        if let Some(text) = next_segment {
            let utterance_id = self.speak_segment(&text);
            if let Some(job) = &mut self.job {
                job.current_utterance = Some(utterance_id);
            }
        }
    }

    fn speak_segment(&self, text: &str) -> UtteranceId {
        let utterance = Utterance {
            text: text.to_string(),
            rate: self.config.rate,
            pitch: self.config.pitch,
            volume: self.config.volume,
        };
        self.synthesizer.borrow_mut().speak(&utterance)
    }
}

impl Drop for SpeechSequencer {
    fn drop(&mut self) {
        self.cancel();
    }
}
