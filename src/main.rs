//! Console demo for the Lexivox voice core.
//!
//! Runs the whole pipeline without a browser: typed lines stand in for
//! final recognizer transcripts, synthesis prints instead of speaking, and
//! timers fire off a monotonic clock between inputs.

use std::cell::{Cell, RefCell};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lexivox::{
    Dispatcher, EventBus, GrammarTable, JsonFileStore, Navigator, RecognitionEvent,
    SessionManager, SharedNavigator, SharedScheduler, SharedSynthesizer, SpeechRecognizer,
    SpeechSequencer, SpeechSynthesizer, SynthesisEvent, TimerId, TimerScheduler, UiCommand,
    Utterance, UtteranceId, VoiceConfig, VoiceError, Word, WordList,
};

#[derive(Parser)]
#[command(name = "lexivox")]
#[command(about = "Voice command engine for the Lexivox vocabulary trainer")]
#[command(version)]
struct Cli {
    /// Path to a TOML voice config (defaults to built-in values)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to a JSON word list (defaults to a built-in sample)
    #[arg(short, long, global = true)]
    words: Option<PathBuf>,

    /// Path to the preference store (defaults to ./lexivox-prefs.json)
    #[arg(short, long, global = true)]
    prefs: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive console session (type utterances, watch effects)
    Run,
    /// Print the command grammar
    Grammar,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = load_config(cli.config.as_deref())?;
    let words = load_words(cli.words.as_deref())?;

    match cli.command {
        Some(Commands::Grammar) => {
            print_grammar(&words);
            Ok(())
        }
        _ => run_session(config, words, cli.prefs),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<VoiceConfig> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("invalid voice config in {}", path.display()))
        }
        None => Ok(VoiceConfig::default()),
    }
}

fn load_words(path: Option<&std::path::Path>) -> Result<WordList> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read word list from {}", path.display()))?;
            let words: Vec<Word> = serde_json::from_str(&contents)
                .with_context(|| format!("invalid word list in {}", path.display()))?;
            Ok(WordList::new(words))
        }
        None => Ok(sample_words()),
    }
}

fn sample_words() -> WordList {
    let mut serendipity = Word::new("1", "Serendipity");
    serendipity.definition =
        Some("The occurrence of happy events by chance, in a beneficial way".to_string());
    serendipity.example =
        Some("Finding that book at the flea market was pure serendipity".to_string());

    let mut ephemeral = Word::new("2", "Ephemeral");
    ephemeral.definition = Some("Lasting for a very short time".to_string());
    ephemeral.example = Some("The beauty of the cherry blossoms is ephemeral".to_string());

    let mut ubiquitous = Word::new("3", "Ubiquitous");
    ubiquitous.definition = Some("Present, appearing, or found everywhere".to_string());
    ubiquitous.example = Some("Smartphones have become ubiquitous".to_string());

    WordList::new(vec![serendipity, ephemeral, ubiquitous])
}

fn print_grammar(words: &WordList) {
    let table = GrammarTable::build(words);
    println!("{:<22} {:<28} patterns", "action", "feedback");
    for definition in table.definitions() {
        println!(
            "{:<22} {:<28} {}",
            definition.action(),
            definition.description(),
            definition
                .patterns()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join("  ")
        );
    }
}

/// Recognizer backed by the console loop: `start` just acknowledges with a
/// `Started` event on the shared queue; transcripts are injected by the
/// loop itself.
struct ConsoleRecognizer {
    pending: Rc<RefCell<Vec<RecognitionEvent>>>,
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&mut self) -> Result<(), VoiceError> {
        self.pending.borrow_mut().push(RecognitionEvent::Started);
        Ok(())
    }

    fn stop(&mut self) {}
}

/// Synthesizer that prints instead of speaking. Each spoken utterance is
/// queued as finished so the loop can deliver its `Ended` event.
#[derive(Default)]
struct ConsoleSynthesizer {
    next_id: u64,
    finished: Vec<UtteranceId>,
}

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> UtteranceId {
        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        println!("  (voice) {}", utterance.text);
        self.finished.push(id);
        id
    }

    fn cancel(&mut self) {
        self.finished.clear();
    }

    fn pause(&mut self) {
        println!("  (voice paused)");
    }

    fn resume(&mut self) {
        println!("  (voice resumed)");
    }
}

struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate_to(&mut self, path: &str) {
        println!("  -> navigate to {path}");
    }
}

/// Deadline-based scheduler; the loop drains due timers between inputs.
#[derive(Default)]
struct LoopScheduler {
    next_id: u64,
    timers: Vec<(TimerId, Instant)>,
}

impl LoopScheduler {
    fn take_due(&mut self, now: Instant) -> Vec<TimerId> {
        let (due, rest): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|(_, at)| *at <= now);
        self.timers = rest;
        due.into_iter().map(|(id, _)| id).collect()
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|(_, at)| *at).min()
    }
}

impl TimerScheduler for LoopScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push((id, Instant::now() + delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|(t, _)| *t != id);
    }
}

fn run_session(config: VoiceConfig, words: WordList, prefs: Option<PathBuf>) -> Result<()> {
    let words = Rc::new(words);
    let grammar = Rc::new(GrammarTable::build(&words));

    let bus = Rc::new(RefCell::new(EventBus::new()));
    let commands = bus.borrow_mut().subscribe();

    let synthesizer = Rc::new(RefCell::new(ConsoleSynthesizer::default()));
    let shared_synth: SharedSynthesizer = synthesizer.clone();
    let scheduler = Rc::new(RefCell::new(LoopScheduler::default()));
    let shared_scheduler: SharedScheduler = scheduler.clone();
    let navigator: SharedNavigator = Rc::new(RefCell::new(ConsoleNavigator));
    let recognizer_events = Rc::new(RefCell::new(Vec::new()));

    let dispatcher = Dispatcher::new(
        bus.clone(),
        navigator,
        shared_synth.clone(),
        words.clone(),
        &config,
    );
    let store = JsonFileStore::load(prefs.unwrap_or_else(|| PathBuf::from("lexivox-prefs.json")));
    let mut manager = SessionManager::new(
        Box::new(ConsoleRecognizer {
            pending: recognizer_events.clone(),
        }),
        shared_scheduler.clone(),
        Box::new(store),
        grammar,
        dispatcher,
        config.clone(),
    );

    let mut sequencer = SpeechSequencer::new(shared_synth, shared_scheduler, config);
    let advance_requested = Rc::new(Cell::new(false));
    let advance_flag = advance_requested.clone();
    sequencer.set_on_advance(move || advance_flag.set(true));

    println!("Lexivox console session. Type an utterance and press enter.");
    println!("Prefix with a confidence like `0.2: next card` to simulate noise.");
    println!("Meta: !start !stop !toggle !status !pause !resume !repeat !quit");

    manager.start_listening();

    let mut current_word: usize = 0;
    let stdin = io::stdin();
    pump(
        &mut manager,
        &mut sequencer,
        &recognizer_events,
        &synthesizer,
        &scheduler,
        &commands,
        &words,
        &mut current_word,
        &advance_requested,
    );

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        match input {
            "" => {}
            "!quit" => break,
            "!start" => manager.start_listening(),
            "!stop" => manager.stop_listening(),
            "!toggle" => {
                let enabled = manager.toggle_voice_enabled();
                println!("  voice enabled: {enabled}");
            }
            "!status" => {
                let status = manager.status();
                println!(
                    "  state={} listening={} transcript={:?} last={:?} error={:?}",
                    manager.state(),
                    status.is_listening,
                    status.transcript,
                    status.last_command,
                    status.error
                );
            }
            "!pause" => sequencer.pause(),
            "!resume" => sequencer.resume(),
            "!repeat" => sequencer.repeat(),
            _ => {
                if manager.state().is_active() {
                    let (confidence, transcript) = parse_confidence(input);
                    manager.handle_event(RecognitionEvent::Result {
                        transcript: transcript.to_string(),
                        confidence,
                        is_final: true,
                    });
                } else {
                    println!("  (not listening; use !start)");
                }
            }
        }

        pump(
            &mut manager,
            &mut sequencer,
            &recognizer_events,
            &synthesizer,
            &scheduler,
            &commands,
            &words,
            &mut current_word,
            &advance_requested,
        );
    }

    manager.stop_listening();
    Ok(())
}

/// "0.2: next card" -> (0.2, "next card"); anything else is full confidence.
fn parse_confidence(input: &str) -> (f32, &str) {
    if let Some((head, tail)) = input.split_once(':') {
        if let Ok(confidence) = head.trim().parse::<f32>() {
            return (confidence, tail.trim());
        }
    }
    (1.0, input)
}

/// Drain platform queues, fire due timers (sleeping through short gaps so
/// read-aloud chains play out), and react to published UI commands.
#[allow(clippy::too_many_arguments)]
fn pump(
    manager: &mut SessionManager,
    sequencer: &mut SpeechSequencer,
    recognizer_events: &Rc<RefCell<Vec<RecognitionEvent>>>,
    synthesizer: &Rc<RefCell<ConsoleSynthesizer>>,
    scheduler: &Rc<RefCell<LoopScheduler>>,
    commands: &std::sync::mpsc::Receiver<UiCommand>,
    words: &Rc<WordList>,
    current_word: &mut usize,
    advance_requested: &Rc<Cell<bool>>,
) {
    // Bounded so a stuck timer chain cannot hang the console.
    let deadline = Instant::now() + Duration::from_secs(10);

    loop {
        for event in recognizer_events.borrow_mut().drain(..) {
            manager.handle_event(event);
        }
        let finished: Vec<UtteranceId> = synthesizer.borrow_mut().finished.drain(..).collect();
        for id in finished {
            sequencer.handle_synth_event(SynthesisEvent::Ended(id));
        }
        for id in scheduler.borrow_mut().take_due(Instant::now()) {
            manager.handle_timer(id);
            sequencer.handle_timer(id);
        }

        while let Ok(command) = commands.try_recv() {
            handle_ui_command(command, sequencer, words, current_word);
        }

        if advance_requested.take() {
            if *current_word + 1 < words.len() {
                *current_word += 1;
                let word = &words.words()[*current_word];
                println!("  [modal] auto-advance to {}", word.term);
                sequencer.speak_all(word.spoken_segments());
            } else {
                println!("  [modal] reached the end of the list");
            }
        }

        let next = scheduler.borrow().next_deadline();
        match next {
            Some(at) if Instant::now() < deadline => {
                let now = Instant::now();
                if at > now {
                    std::thread::sleep(at - now);
                }
            }
            _ => break,
        }
    }
}

fn handle_ui_command(
    command: UiCommand,
    sequencer: &mut SpeechSequencer,
    words: &Rc<WordList>,
    current_word: &mut usize,
) {
    if words.is_empty() {
        println!("  [ui] no words loaded, {command:?} ignored");
        return;
    }

    match command {
        UiCommand::Next => {
            if *current_word + 1 < words.len() {
                *current_word += 1;
            }
            println!("  [grid] now on {}", words.words()[*current_word].term);
        }
        UiCommand::Previous => {
            *current_word = current_word.saturating_sub(1);
            println!("  [grid] now on {}", words.words()[*current_word].term);
        }
        UiCommand::OpenWord { word } => {
            if let Some(index) = words.words().iter().position(|w| w.id == word.id) {
                *current_word = index;
            }
            println!("  [modal] opened {}", word.term);
        }
        UiCommand::Read => {
            let word = &words.words()[*current_word];
            println!("  [modal] reading {}", word.term);
            sequencer.speak_all(word.spoken_segments());
        }
        UiCommand::Close => {
            sequencer.cancel();
            println!("  [modal] closed");
        }
        other => println!("  [ui] {other:?}"),
    }
}
