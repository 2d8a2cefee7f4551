//! The grammar table and the matcher over it.

use crate::words::WordList;

use super::actions;
use super::definition::CommandDefinition;

/// Result of matching an utterance against the grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandMatch {
    /// Action identifier to dispatch.
    pub action: String,
    /// The normalized (trimmed, lowercased) utterance that matched. The
    /// dispatcher strips "open "/"show " from this for word resolution.
    pub raw_text: String,
    /// Feedback text for the matched command, for status display.
    pub description: String,
}

/// Ordered, immutable table of command definitions.
pub struct GrammarTable {
    definitions: Vec<CommandDefinition>,
}

impl GrammarTable {
    /// Build the full grammar: the static command set plus a dynamic
    /// "open/show <term>" definition derived from the loaded word list.
    /// An empty word list simply omits the dynamic definition.
    pub fn build(words: &WordList) -> Self {
        let mut definitions = static_definitions();
        if !words.is_empty() {
            definitions.push(open_word_definition(words));
        }
        Self { definitions }
    }

    /// A table with only the static command set.
    pub fn without_words() -> Self {
        Self {
            definitions: static_definitions(),
        }
    }

    pub fn definitions(&self) -> &[CommandDefinition] {
        &self.definitions
    }

    /// Match an utterance against the table.
    ///
    /// The utterance is normalized (trimmed, lowercased) first; the empty
    /// string never matches. Definitions are tried in table order and the
    /// first hit wins. If nothing matches but the utterance starts with
    /// "open " or "show ", a synthetic [`actions::OPEN_WORD_FLEXIBLE`]
    /// match is returned so the dispatcher can still attempt fuzzy word
    /// resolution. Otherwise `None`: not an error, just silence.
    pub fn match_utterance(&self, utterance: &str) -> Option<CommandMatch> {
        let normalized = utterance.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        for definition in &self.definitions {
            if definition.matches(&normalized) {
                return Some(CommandMatch {
                    action: definition.action().to_string(),
                    raw_text: normalized,
                    description: definition.description().to_string(),
                });
            }
        }

        if normalized.starts_with("open ") || normalized.starts_with("show ") {
            return Some(CommandMatch {
                action: actions::OPEN_WORD_FLEXIBLE.to_string(),
                raw_text: normalized,
                description: "Opening word".to_string(),
            });
        }

        None
    }
}

/// The built-in command set, in match priority order.
///
/// Navigation definitions come first so "go back" and friends are not
/// swallowed by the card controls; the dynamic word definition is appended
/// last by [`GrammarTable::build`].
fn static_definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("/dashboard", "Navigating to dashboard")
            .with_pattern(r"^go to (the )?dashboard$")
            .with_pattern(r"^(open|show) (the )?dashboard$")
            .with_pattern(r"^dashboard$"),
        CommandDefinition::new("/", "Navigating home")
            .with_pattern(r"^go (back )?home$")
            .with_pattern(r"^go to (the )?home ?page$")
            .with_pattern(r"^home ?page$"),
        CommandDefinition::new("/favorites", "Navigating to favorites")
            .with_pattern(r"^go to (my )?favo(u?)rites$")
            .with_pattern(r"^open (my )?favo(u?)rites( page)?$"),
        CommandDefinition::new(actions::NEXT_CARD, "Moving to next card")
            .with_pattern(r"^next( card| word)?$")
            .with_pattern(r"^go forward$"),
        CommandDefinition::new(actions::PREVIOUS_CARD, "Moving to previous card")
            .with_pattern(r"^previous( card| word)?$")
            .with_pattern(r"^go back$")
            .with_pattern(r"^back$"),
        CommandDefinition::new(actions::OPEN_CARD, "Opening card")
            .with_pattern(r"^open (the )?card$")
            .with_pattern(r"^(flip|show) (the )?card$"),
        CommandDefinition::new(actions::EXPLAIN, "Explaining word")
            .with_pattern(r"^explain( this| it| word)?$")
            .with_pattern(r"^what does (it|this|that) mean$"),
        CommandDefinition::new(actions::SAVE_WORD, "Saving word")
            .with_pattern(r"^save( this| it| word)?$")
            .with_pattern(r"^favo(u?)rite (this|it)$")
            .with_pattern(r"^add to favo(u?)rites$"),
        CommandDefinition::new(actions::READ_WORD, "Reading word aloud")
            .with_pattern(r"^read( this| it| word)?( aloud| out loud)?$")
            .with_pattern(r"^speak( it)?$"),
        CommandDefinition::new(actions::SEARCH, "Opening search")
            .with_pattern(r"^(open )?search$")
            .with_pattern(r"^find( a)? word$"),
        CommandDefinition::new(actions::CLOSE, "Closing")
            .with_pattern(r"^close( card| it| this)?$")
            .with_pattern(r"^dismiss$"),
        CommandDefinition::new(actions::TOGGLE_THEME, "Switching theme")
            .with_pattern(r"^(toggle|switch|change) (the )?theme$")
            .with_pattern(r"^(dark|light) mode$"),
        CommandDefinition::new(actions::SORT_ALPHABETICAL, "Sorting alphabetically")
            .with_pattern(r"^sort (alphabetically|by name|a to z)$"),
        CommandDefinition::new(actions::SORT_NEWEST, "Sorting by newest")
            .with_pattern(r"^sort by (newest|date|recent)$"),
        CommandDefinition::new(actions::FILTER_FAVORITES, "Showing favorites")
            .with_pattern(r"^(show|filter) favo(u?)rites$")
            .with_pattern(r"^only favo(u?)rites$"),
        CommandDefinition::new(actions::FILTER_LEARNED, "Showing learned words")
            .with_pattern(r"^(show|filter) learned( words)?$"),
        CommandDefinition::new(actions::FILTER_ALL, "Showing all words")
            .with_pattern(r"^show (all|everything)( words)?$")
            .with_pattern(r"^clear (the )?filter$"),
    ]
}

/// Builds the "open/show <term>" definition from the loaded words.
fn open_word_definition(words: &WordList) -> CommandDefinition {
    let alternation = words
        .terms()
        .map(|t| regex::escape(&t.to_lowercase()))
        .collect::<Vec<_>>()
        .join("|");

    CommandDefinition::new(actions::OPEN_WORD, "Opening word")
        .with_pattern(&format!("^(open|show) (?:{alternation})$"))
}
