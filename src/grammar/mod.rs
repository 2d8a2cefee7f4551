//! Command grammar: what the user can say and what it maps to.
//!
//! The grammar is an ordered table of [`CommandDefinition`]s, each holding
//! one or more regex patterns, an action identifier and a spoken-feedback
//! description. Matching is first-definition-wins in table order, with a
//! flexible "open/show <anything>" fallback when nothing matches.
//!
//! The table is immutable after construction. When the word list changes,
//! the host builds a fresh table and swaps the `Rc` on the session manager,
//! so readers never observe a half-built table.

mod definition;
mod table;

pub use definition::CommandDefinition;
pub use table::{CommandMatch, GrammarTable};

/// Action identifiers bound by the built-in grammar.
///
/// Navigation actions are literal route paths (`"/dashboard"`) and are not
/// listed here; the dispatcher recognizes them by the leading slash.
pub mod actions {
    pub const NEXT_CARD: &str = "next-card";
    pub const PREVIOUS_CARD: &str = "previous-card";
    pub const OPEN_CARD: &str = "open-card";
    pub const EXPLAIN: &str = "explain";
    pub const SAVE_WORD: &str = "save-word";
    pub const READ_WORD: &str = "read-word";
    pub const SEARCH: &str = "search";
    pub const CLOSE: &str = "close";
    pub const TOGGLE_THEME: &str = "toggle-theme";
    pub const SORT_ALPHABETICAL: &str = "sort-alphabetical";
    pub const SORT_NEWEST: &str = "sort-newest";
    pub const FILTER_FAVORITES: &str = "filter-favorites";
    pub const FILTER_LEARNED: &str = "filter-learned";
    pub const FILTER_ALL: &str = "filter-all";
    /// "open <word>" where the word matched the loaded list exactly.
    pub const OPEN_WORD: &str = "open-word";
    /// Fallback when the utterance starts with "open "/"show " but no
    /// pattern matched; the dispatcher resolves the rest fuzzily.
    pub const OPEN_WORD_FLEXIBLE: &str = "open-word-flexible";
}
