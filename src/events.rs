//! Typed event channel between the voice core and UI components.
//!
//! The dispatcher publishes [`UiCommand`]s; the word modal, the word grid
//! and the theme control each hold a receiver and match on the variants
//! they care about. A closed tagged union instead of string-keyed custom
//! events means handlers are exhaustively matched.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::words::Word;

/// Sort order requested by a "sort ..." voice command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Alphabetical,
    Newest,
}

/// Word-grid filter requested by a "show ..." voice command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordFilter {
    All,
    Favorites,
    Learned,
}

/// Commands published to UI components.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    /// Move to the next word card
    Next,
    /// Move to the previous word card
    Previous,
    /// Open the focused card's detail modal
    OpenCard,
    /// Show the explanation for the current word
    Explain,
    /// Save the current word to favorites
    Save,
    /// Read the current word aloud
    Read,
    /// Focus the search field
    Search,
    /// Close the open modal
    Close,
    /// Toggle dark/light theme
    ToggleTheme,
    /// Open a specific word's detail modal
    OpenWord { word: Word },
    /// Re-sort the word grid
    Sort { order: SortOrder },
    /// Filter the word grid
    Filter { filter: WordFilter },
}

/// Broadcast channel for [`UiCommand`]s.
///
/// Every live subscriber receives a clone of each published command;
/// subscribers whose receiver was dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<UiCommand>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<UiCommand> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, command: UiCommand) {
        self.subscribers.retain(|tx| tx.send(command.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(UiCommand::Next);

        assert_eq!(a.try_recv().unwrap(), UiCommand::Next);
        assert_eq!(b.try_recv().unwrap(), UiCommand::Next);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(UiCommand::Close);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(a.try_recv().unwrap(), UiCommand::Close);
    }
}
