//! Shared in-memory fakes for the platform seams.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use lexivox::{
    Dispatcher, EventBus, GrammarTable, KeyValueStore, MemoryStore, Navigator, SessionManager,
    SharedNavigator, SharedScheduler, SharedSynthesizer, SpeechRecognizer, SpeechSynthesizer,
    TimerId, TimerScheduler, UiCommand, Utterance, UtteranceId, VoiceConfig, VoiceError, Word,
    WordList,
};

/// Recognizer that only counts start/stop calls; events are injected by the
/// test through `SessionManager::handle_event`.
pub struct FakeRecognizer {
    supported: bool,
    starts: Rc<Cell<usize>>,
    stops: Rc<Cell<usize>>,
}

impl FakeRecognizer {
    pub fn new(supported: bool) -> (Self, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let starts = Rc::new(Cell::new(0));
        let stops = Rc::new(Cell::new(0));
        (
            Self {
                supported,
                starts: starts.clone(),
                stops: stops.clone(),
            },
            starts,
            stops,
        )
    }
}

impl SpeechRecognizer for FakeRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn start(&mut self) -> Result<(), VoiceError> {
        self.starts.set(self.starts.get() + 1);
        Ok(())
    }

    fn stop(&mut self) {
        self.stops.set(self.stops.get() + 1);
    }
}

/// Records every utterance; completion events are delivered manually.
#[derive(Default)]
pub struct FakeSynthesizer {
    next_id: u64,
    pub spoken: Vec<(UtteranceId, String)>,
    pub cancels: usize,
    pub pauses: usize,
    pub resumes: usize,
}

impl FakeSynthesizer {
    pub fn texts(&self) -> Vec<String> {
        self.spoken.iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn last_spoken(&self) -> Option<String> {
        self.spoken.last().map(|(_, t)| t.clone())
    }

    pub fn last_id(&self) -> Option<UtteranceId> {
        self.spoken.last().map(|(id, _)| *id)
    }
}

impl SpeechSynthesizer for FakeSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> UtteranceId {
        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        self.spoken.push((id, utterance.text.clone()));
        id
    }

    fn cancel(&mut self) {
        self.cancels += 1;
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn resume(&mut self) {
        self.resumes += 1;
    }
}

/// Timers never fire on their own; tests fire them explicitly.
#[derive(Default)]
pub struct FakeScheduler {
    next_id: u64,
    pub scheduled: Vec<(TimerId, Duration)>,
    pub cancelled: Vec<TimerId>,
}

impl FakeScheduler {
    /// Pending timer with the given delay; panics if several are live.
    pub fn timer_with_delay(&self, millis: u64) -> Option<TimerId> {
        let mut matching = self
            .scheduled
            .iter()
            .filter(|(_, d)| *d == Duration::from_millis(millis));
        let found = matching.next().map(|(id, _)| *id);
        assert!(
            matching.next().is_none(),
            "more than one pending timer with delay {millis}ms"
        );
        found
    }

    pub fn live_count(&self) -> usize {
        self.scheduled.len()
    }

    fn remove(&mut self, id: TimerId) {
        self.scheduled.retain(|(t, _)| *t != id);
    }

    /// Consume a pending timer, as the host does right before delivering
    /// its fire.
    pub fn fire(&mut self, id: TimerId) -> TimerId {
        assert!(
            self.scheduled.iter().any(|(t, _)| *t == id),
            "firing a timer that is not pending"
        );
        self.remove(id);
        id
    }
}

impl TimerScheduler for FakeScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.scheduled.push((id, delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.cancelled.push(id);
        self.remove(id);
    }
}

#[derive(Default)]
pub struct FakeNavigator {
    pub paths: Vec<String>,
}

impl Navigator for FakeNavigator {
    fn navigate_to(&mut self, path: &str) {
        self.paths.push(path.to_string());
    }
}

/// Store fake that stays inspectable after the manager takes ownership.
#[derive(Clone, Default)]
pub struct SharedStore(pub Rc<RefCell<MemoryStore>>);

impl SharedStore {
    pub fn seeded(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.0.borrow_mut().set(key, value);
        store
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.0.borrow_mut().set(key, value);
    }
}

/// A fully wired session manager plus handles to all its fakes.
pub struct Fixture {
    pub manager: SessionManager,
    pub synth: Rc<RefCell<FakeSynthesizer>>,
    pub scheduler: Rc<RefCell<FakeScheduler>>,
    pub navigator: Rc<RefCell<FakeNavigator>>,
    pub commands: Receiver<UiCommand>,
    pub store: SharedStore,
    pub starts: Rc<Cell<usize>>,
    pub stops: Rc<Cell<usize>>,
    pub config: VoiceConfig,
}

pub fn sample_words() -> WordList {
    WordList::new(vec![
        Word::new("1", "Ephemeral"),
        Word::new("2", "Serendipity"),
    ])
}

pub fn fixture(words: WordList) -> Fixture {
    fixture_with(words, true, SharedStore::default())
}

pub fn fixture_with(words: WordList, supported: bool, store: SharedStore) -> Fixture {
    let config = VoiceConfig::default();
    let words = Rc::new(words);
    let grammar = Rc::new(GrammarTable::build(&words));

    let bus = Rc::new(RefCell::new(EventBus::new()));
    let commands = bus.borrow_mut().subscribe();

    let synth = Rc::new(RefCell::new(FakeSynthesizer::default()));
    let shared_synth: SharedSynthesizer = synth.clone();
    let scheduler = Rc::new(RefCell::new(FakeScheduler::default()));
    let shared_scheduler: SharedScheduler = scheduler.clone();
    let navigator = Rc::new(RefCell::new(FakeNavigator::default()));
    let shared_navigator: SharedNavigator = navigator.clone();

    let dispatcher = Dispatcher::new(bus, shared_navigator, shared_synth, words, &config);

    let (recognizer, starts, stops) = FakeRecognizer::new(supported);
    let manager = SessionManager::new(
        Box::new(recognizer),
        shared_scheduler,
        Box::new(store.clone()),
        grammar,
        dispatcher,
        config.clone(),
    );

    Fixture {
        manager,
        synth,
        scheduler,
        navigator,
        commands,
        store,
        starts,
        stops,
        config,
    }
}
