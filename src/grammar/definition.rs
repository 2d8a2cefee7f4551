//! A single voice command definition.

use regex::Regex;

/// One recognizable command: patterns, action identifier, feedback text.
///
/// Patterns are tried in the order they were added; several overlapping
/// phrasings per command are intentional, since the recognizer rarely hears
/// the canonical one.
#[derive(Debug, Clone)]
pub struct CommandDefinition {
    patterns: Vec<Regex>,
    action: String,
    description: String,
}

impl CommandDefinition {
    pub fn new(action: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            patterns: Vec::new(),
            action: action.into(),
            description: description.into(),
        }
    }

    /// Add a match pattern. Patterns are authored in-crate (or built from
    /// regex-escaped word terms), so a pattern that fails to compile is a
    /// programming error.
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.patterns
            .push(Regex::new(pattern).expect("grammar pattern must compile"));
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Test a normalized utterance against this definition's patterns.
    pub fn matches(&self, utterance: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(utterance))
    }
}
