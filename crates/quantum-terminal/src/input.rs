//! Edit buffer, history recall cursor and command-name completion.

use crate::history::History;
use crate::interpreter::CommandRegistry;

/// Position of the history recall cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryCursor {
    /// Not recalling; the buffer holds fresh input.
    #[default]
    None,
    /// Recalling `History` entry at this index (0 = oldest).
    At(usize),
}

/// Result of a tab-completion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Exactly one match; the buffer now holds it.
    Replaced(String),
    /// Several matches; the buffer is unchanged.
    Candidates(Vec<String>),
    /// Nothing matched.
    NoMatch,
}

/// Session cursor state: the edit buffer plus the history cursor.
#[derive(Debug, Default, Clone)]
pub struct InputController {
    buffer: String,
    cursor: HistoryCursor,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> HistoryCursor {
        self.cursor
    }

    /// Append a typed character. Control characters are ignored.
    pub fn insert(&mut self, ch: char) {
        if !ch.is_control() {
            self.buffer.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Step to an older entry. Stops at the oldest one.
    pub fn history_up(&mut self, history: &History) {
        if history.is_empty() {
            return;
        }
        let index = match self.cursor {
            HistoryCursor::None => history.len() - 1,
            HistoryCursor::At(i) => i.saturating_sub(1),
        };
        self.recall(history, index);
    }

    /// Step to a newer entry; moving past the newest clears the buffer.
    pub fn history_down(&mut self, history: &History) {
        let HistoryCursor::At(i) = self.cursor else {
            return;
        };
        if i + 1 >= history.len() {
            self.cursor = HistoryCursor::None;
            self.buffer.clear();
        } else {
            self.recall(history, i + 1);
        }
    }

    fn recall(&mut self, history: &History, index: usize) {
        if let Some(line) = history.get(index) {
            self.cursor = HistoryCursor::At(index);
            self.buffer = line.to_string();
        }
    }

    /// Complete the buffer against registered command names.
    pub fn complete(&mut self, registry: &CommandRegistry) -> Completion {
        let mut matches = registry.completions(&self.buffer);
        match matches.len() {
            0 => Completion::NoMatch,
            1 => {
                let name = matches.remove(0);
                self.buffer.clone_from(&name);
                Completion::Replaced(name)
            },
            _ => Completion::Candidates(matches),
        }
    }

    /// Take the buffer for submission and reset to `("", None)`.
    pub fn take(&mut self) -> String {
        self.cursor = HistoryCursor::None;
        std::mem::take(&mut self.buffer)
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = HistoryCursor::None;
    }
}
