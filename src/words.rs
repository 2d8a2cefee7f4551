//! Word list snapshot used for "open <word>" commands.
//!
//! The voice core consumes the host's word list read-only: the terms feed
//! the dynamic grammar pattern, and spoken word names are resolved against
//! them when the user says "open serendipity".

use serde::{Deserialize, Serialize};

/// A single vocabulary word, as loaded by the host application.
///
/// Only `term` matters for voice matching; the display fields are carried
/// so a read-aloud job can be assembled from the same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub term: String,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
}

impl Word {
    pub fn new(id: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            definition: None,
            example: None,
        }
    }

    /// The text segments a read-aloud job speaks for this word, in order.
    pub fn spoken_segments(&self) -> Vec<String> {
        let mut segments = vec![self.term.clone()];
        if let Some(ref definition) = self.definition {
            segments.push(definition.clone());
        }
        if let Some(ref example) = self.example {
            segments.push(example.clone());
        }
        segments
    }
}

/// Immutable snapshot of the host's loaded words.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<Word>,
}

impl WordList {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.term.as_str())
    }

    /// Resolve a spoken word name against the list.
    ///
    /// Tries an exact case-insensitive match on the term first, then
    /// substring containment in either direction (the recognizer often
    /// hears only part of a word, or pads it). Within each pass the first
    /// word in list order wins; that tie-break is deliberate and documented,
    /// not ranked.
    pub fn resolve(&self, query: &str) -> Option<&Word> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        if let Some(word) = self.words.iter().find(|w| w.term.to_lowercase() == query) {
            return Some(word);
        }

        self.words.iter().find(|w| {
            let term = w.term.to_lowercase();
            term.contains(&query) || query.contains(&term)
        })
    }
}
