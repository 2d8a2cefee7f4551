//! Turns matched actions into side effects.
//!
//! Dispatch is total: every known action maps to exactly one effect
//! (navigation, a published [`UiCommand`], or spoken feedback), and unknown
//! identifiers are logged and ignored so the grammar table and dispatcher
//! never need to change in lockstep. When an action implies both a state
//! change and feedback, the state change goes out first; speech is
//! fire-and-forget.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::VoiceConfig;
use crate::events::{EventBus, SortOrder, UiCommand, WordFilter};
use crate::grammar::actions;
use crate::platform::{SharedNavigator, SharedSynthesizer, Utterance};
use crate::words::WordList;

pub struct Dispatcher {
    bus: Rc<RefCell<EventBus>>,
    navigator: SharedNavigator,
    synthesizer: SharedSynthesizer,
    words: Rc<WordList>,
    rate: f32,
    pitch: f32,
    volume: f32,
}

impl Dispatcher {
    pub fn new(
        bus: Rc<RefCell<EventBus>>,
        navigator: SharedNavigator,
        synthesizer: SharedSynthesizer,
        words: Rc<WordList>,
        config: &VoiceConfig,
    ) -> Self {
        Self {
            bus,
            navigator,
            synthesizer,
            words,
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
        }
    }

    /// Swap in a new word-list snapshot. Paired with rebuilding the grammar
    /// table when the host's word list changes.
    pub fn set_words(&mut self, words: Rc<WordList>) {
        self.words = words;
    }

    /// Execute the effect bound to `action`.
    ///
    /// `raw_text` is the normalized utterance that produced the match; only
    /// the word-open actions look at it.
    pub fn dispatch(&mut self, action: &str, raw_text: Option<&str>) {
        if action.starts_with('/') {
            self.navigate(action);
            return;
        }

        match action {
            actions::NEXT_CARD => self.publish_and_speak(UiCommand::Next, "Moving to next card"),
            actions::PREVIOUS_CARD => {
                self.publish_and_speak(UiCommand::Previous, "Moving to previous card")
            }
            actions::OPEN_CARD => self.publish_and_speak(UiCommand::OpenCard, "Opening card"),
            actions::EXPLAIN => self.publish_and_speak(UiCommand::Explain, "Explaining word"),
            actions::SAVE_WORD => self.publish_and_speak(UiCommand::Save, "Saving word"),
            actions::READ_WORD => self.publish_and_speak(UiCommand::Read, "Reading word aloud"),
            actions::SEARCH => self.publish_and_speak(UiCommand::Search, "Opening search"),
            actions::CLOSE => self.publish_and_speak(UiCommand::Close, "Closing"),
            actions::TOGGLE_THEME => {
                self.publish_and_speak(UiCommand::ToggleTheme, "Switching theme")
            }
            actions::SORT_ALPHABETICAL => self.publish_and_speak(
                UiCommand::Sort {
                    order: SortOrder::Alphabetical,
                },
                "Sorting alphabetically",
            ),
            actions::SORT_NEWEST => self.publish_and_speak(
                UiCommand::Sort {
                    order: SortOrder::Newest,
                },
                "Sorting by newest",
            ),
            actions::FILTER_FAVORITES => self.publish_and_speak(
                UiCommand::Filter {
                    filter: WordFilter::Favorites,
                },
                "Showing favorites",
            ),
            actions::FILTER_LEARNED => self.publish_and_speak(
                UiCommand::Filter {
                    filter: WordFilter::Learned,
                },
                "Showing learned words",
            ),
            actions::FILTER_ALL => self.publish_and_speak(
                UiCommand::Filter {
                    filter: WordFilter::All,
                },
                "Showing all words",
            ),
            actions::OPEN_WORD | actions::OPEN_WORD_FLEXIBLE => {
                self.open_word(raw_text.unwrap_or_default());
            }
            other => {
                // Forward compatibility: grammar entries the dispatcher
                // doesn't know yet must not crash anything.
                tracing::debug!(action = other, "ignoring unknown voice action");
            }
        }
    }

    fn navigate(&mut self, path: &str) {
        self.navigator.borrow_mut().navigate_to(path);
        let name = path.trim_start_matches('/');
        if name.is_empty() {
            self.speak("Navigating home");
        } else {
            self.speak(&format!("Navigating to {name}"));
        }
    }

    /// Resolve the word named after "open "/"show " and open its card.
    /// A name that resolves to nothing is reported aloud and otherwise
    /// dropped; no event, no navigation, no error flag.
    fn open_word(&mut self, raw_text: &str) {
        let query = strip_open_prefix(raw_text);
        if query.is_empty() {
            self.speak("Which word should I open?");
            return;
        }

        match self.words.resolve(query) {
            Some(word) => {
                let word = word.clone();
                let feedback = format!("Opening {}", word.term);
                self.bus.borrow_mut().publish(UiCommand::OpenWord { word });
                self.speak(&feedback);
            }
            None => {
                tracing::debug!(query, "no word matched spoken name");
                self.speak(&format!("Sorry, I couldn't find {query}"));
            }
        }
    }

    fn publish_and_speak(&mut self, command: UiCommand, feedback: &str) {
        self.bus.borrow_mut().publish(command);
        self.speak(feedback);
    }

    fn speak(&mut self, text: &str) {
        let utterance = Utterance {
            text: text.to_string(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        };
        self.synthesizer.borrow_mut().speak(&utterance);
    }
}

/// Strip a leading "open " or "show " token, case-insensitively.
fn strip_open_prefix(text: &str) -> &str {
    let trimmed = text.trim();
    for prefix in ["open ", "show "] {
        let head = trimmed.get(..prefix.len());
        if head.is_some_and(|h| h.eq_ignore_ascii_case(prefix)) {
            return trimmed[prefix.len()..].trim();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_open_prefix() {
        assert_eq!(strip_open_prefix("open serendipity"), "serendipity");
        assert_eq!(strip_open_prefix("show sere"), "sere");
        assert_eq!(strip_open_prefix("Open Ephemeral"), "Ephemeral");
        assert_eq!(strip_open_prefix("serendipity"), "serendipity");
        assert_eq!(strip_open_prefix("  open   spaced  "), "spaced");
    }
}
