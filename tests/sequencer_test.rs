//! Speech output sequencer tests: strict ordering, cancellation,
//! pause/resume, repeat, auto-advance, stale-callback suppression.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{FakeScheduler, FakeSynthesizer};
use lexivox::{SharedScheduler, SharedSynthesizer, SpeechSequencer, SynthesisEvent, VoiceConfig};

struct Rig {
    sequencer: SpeechSequencer,
    synth: Rc<RefCell<FakeSynthesizer>>,
    scheduler: Rc<RefCell<FakeScheduler>>,
    config: VoiceConfig,
}

fn rig() -> Rig {
    let config = VoiceConfig::default();
    let synth = Rc::new(RefCell::new(FakeSynthesizer::default()));
    let shared_synth: SharedSynthesizer = synth.clone();
    let scheduler = Rc::new(RefCell::new(FakeScheduler::default()));
    let shared_scheduler: SharedScheduler = scheduler.clone();

    Rig {
        sequencer: SpeechSequencer::new(shared_synth, shared_scheduler, config.clone()),
        synth,
        scheduler,
        config,
    }
}

fn segments(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| s.to_string()).collect()
}

impl Rig {
    /// Finish the current utterance and let the inter-segment pause elapse.
    fn finish_current_segment(&mut self) {
        let id = self.synth.borrow().last_id().expect("something spoken");
        self.sequencer.handle_synth_event(SynthesisEvent::Ended(id));
        let pending = self
            .scheduler
            .borrow()
            .timer_with_delay(self.config.segment_pause_ms);
        if let Some(timer) = pending {
            let timer = self.scheduler.borrow_mut().fire(timer);
            self.sequencer.handle_timer(timer);
        }
    }
}

#[test]
fn test_segments_spoken_strictly_in_order() {
    let mut r = rig();
    r.sequencer.speak_all(segments(&["a", "b", "c"]));

    // Only the first segment plays until its completion is delivered.
    assert_eq!(r.synth.borrow().texts(), vec!["a"]);

    r.finish_current_segment();
    assert_eq!(r.synth.borrow().texts(), vec!["a", "b"]);

    r.finish_current_segment();
    assert_eq!(r.synth.borrow().texts(), vec!["a", "b", "c"]);

    r.finish_current_segment();
    assert!(!r.sequencer.is_speaking(), "job complete after last segment");
}

#[test]
fn test_empty_segment_list_is_a_noop() {
    let mut r = rig();
    r.sequencer.speak_all(Vec::new());
    assert!(!r.sequencer.is_speaking());
    assert!(r.synth.borrow().spoken.is_empty());
}

#[test]
fn test_cancel_mid_sequence_stops_everything() {
    let mut r = rig();
    r.sequencer.speak_all(segments(&["a", "b", "c"]));

    // First segment ends; the pause timer for "b" is pending.
    let id = r.synth.borrow().last_id().unwrap();
    r.sequencer.handle_synth_event(SynthesisEvent::Ended(id));
    assert_eq!(r.scheduler.borrow().live_count(), 1);

    r.sequencer.cancel();

    assert!(!r.sequencer.is_speaking());
    assert_eq!(r.scheduler.borrow().live_count(), 0, "pause timer cancelled");
    assert_eq!(r.synth.borrow().cancels, 1);
    assert_eq!(r.synth.borrow().texts(), vec!["a"], "no further segment spoken");
}

#[test]
fn test_new_job_cancels_prior_job_first() {
    let mut r = rig();
    r.sequencer.speak_all(segments(&["old one", "old two"]));
    let stale = r.synth.borrow().last_id().unwrap();

    r.sequencer.speak_all(segments(&["new one"]));

    assert_eq!(r.synth.borrow().cancels, 1, "prior job cancelled first");
    assert_eq!(r.synth.borrow().last_spoken().as_deref(), Some("new one"));

    // The old job's completion arrives late; it must not advance anything.
    r.sequencer.handle_synth_event(SynthesisEvent::Ended(stale));
    assert_eq!(r.scheduler.borrow().live_count(), 0);
    assert_eq!(r.synth.borrow().texts(), vec!["old one", "new one"]);
}

#[test]
fn test_stale_callback_after_cancel_is_ignored() {
    let mut r = rig();
    r.sequencer.speak_all(segments(&["a", "b"]));
    let id = r.synth.borrow().last_id().unwrap();

    r.sequencer.cancel();
    r.sequencer.handle_synth_event(SynthesisEvent::Ended(id));

    assert!(!r.sequencer.is_speaking());
    assert_eq!(r.scheduler.borrow().live_count(), 0);
    assert_eq!(r.synth.borrow().texts(), vec!["a"]);
}

#[test]
fn test_pause_blocks_advance_until_resume() {
    let mut r = rig();
    r.sequencer.speak_all(segments(&["a", "b"]));

    let id = r.synth.borrow().last_id().unwrap();
    r.sequencer.handle_synth_event(SynthesisEvent::Ended(id));
    let timer = r
        .scheduler
        .borrow()
        .timer_with_delay(r.config.segment_pause_ms)
        .unwrap();

    r.sequencer.pause();
    assert!(r.sequencer.is_paused());
    assert_eq!(r.synth.borrow().pauses, 1);

    // The pause timer fires while paused: nothing may play.
    let timer = r.scheduler.borrow_mut().fire(timer);
    r.sequencer.handle_timer(timer);
    assert_eq!(r.synth.borrow().texts(), vec!["a"]);

    r.sequencer.resume();
    assert!(!r.sequencer.is_paused());
    assert_eq!(r.synth.borrow().texts(), vec!["a", "b"], "deferred advance");
}

#[test]
fn test_pause_resume_mid_utterance_forwards_to_platform() {
    let mut r = rig();
    r.sequencer.speak_all(segments(&["a", "b"]));

    r.sequencer.pause();
    r.sequencer.resume();

    assert_eq!(r.synth.borrow().pauses, 1);
    assert_eq!(r.synth.borrow().resumes, 1);
    assert_eq!(r.synth.borrow().texts(), vec!["a"], "no advance happened");
}

#[test]
fn test_repeat_restarts_from_first_segment() {
    let mut r = rig();
    r.sequencer.speak_all(segments(&["a", "b"]));
    r.finish_current_segment();
    assert_eq!(r.synth.borrow().texts(), vec!["a", "b"]);

    r.sequencer.repeat();
    assert_eq!(r.synth.borrow().cancels, 1, "repeat cancels outright");
    assert!(!r.sequencer.is_speaking(), "nothing plays during settle delay");

    let settle = r
        .scheduler
        .borrow()
        .timer_with_delay(r.config.settle_delay_ms)
        .expect("settle timer scheduled");
    let settle = r.scheduler.borrow_mut().fire(settle);
    r.sequencer.handle_timer(settle);

    assert_eq!(r.synth.borrow().texts(), vec!["a", "b", "a"]);
    assert!(r.sequencer.is_speaking());
}

#[test]
fn test_auto_advance_fires_on_natural_completion() {
    let mut r = rig();
    let advanced = Rc::new(Cell::new(false));
    let flag = advanced.clone();
    r.sequencer.set_on_advance(move || flag.set(true));

    r.sequencer.speak_all(segments(&["a"]));
    let id = r.synth.borrow().last_id().unwrap();
    r.sequencer.handle_synth_event(SynthesisEvent::Ended(id));

    let advance = r
        .scheduler
        .borrow()
        .timer_with_delay(r.config.advance_delay_ms)
        .expect("advance timer scheduled");
    assert!(!advanced.get(), "not before the delay elapses");

    let advance = r.scheduler.borrow_mut().fire(advance);
    r.sequencer.handle_timer(advance);
    assert!(advanced.get());
}

#[test]
fn test_no_auto_advance_after_cancel() {
    let mut r = rig();
    let advanced = Rc::new(Cell::new(false));
    let flag = advanced.clone();
    r.sequencer.set_on_advance(move || flag.set(true));

    r.sequencer.speak_all(segments(&["a", "b"]));
    r.sequencer.cancel();

    assert_eq!(r.scheduler.borrow().live_count(), 0);
    assert!(!advanced.get());
}

#[test]
fn test_cancel_before_advance_delay_suppresses_it() {
    let mut r = rig();
    let advanced = Rc::new(Cell::new(false));
    let flag = advanced.clone();
    r.sequencer.set_on_advance(move || flag.set(true));

    r.sequencer.speak_all(segments(&["a"]));
    let id = r.synth.borrow().last_id().unwrap();
    r.sequencer.handle_synth_event(SynthesisEvent::Ended(id));
    assert_eq!(r.scheduler.borrow().live_count(), 1, "advance pending");

    // Closing the modal between completion and advance.
    r.sequencer.cancel();
    assert_eq!(r.scheduler.borrow().live_count(), 0);
    assert!(!advanced.get());
}

#[test]
fn test_synthesis_error_aborts_job_without_retry() {
    let mut r = rig();
    r.sequencer.speak_all(segments(&["a", "b"]));

    let id = r.synth.borrow().last_id().unwrap();
    r.sequencer.handle_synth_event(SynthesisEvent::Error(id));

    assert!(!r.sequencer.is_speaking());
    assert_eq!(r.scheduler.borrow().live_count(), 0, "no retry scheduled");
    assert_eq!(r.synth.borrow().texts(), vec!["a"]);
}
