//! Platform-agnostic key events.
//!
//! Every front end maps its native input to [`KeyEvent`]. The interpreter
//! never sees raw terminal or browser input.

/// A single key press delivered to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Printable character typed into the edit buffer.
    Char(char),
    /// Delete the character left of the cursor.
    Backspace,
    /// Submit the edit buffer.
    Enter,
    /// Recall an older history entry.
    Up,
    /// Recall a newer history entry (or return to an empty buffer).
    Down,
    /// Complete the command name in the edit buffer.
    Tab,
    /// Ctrl-C: leave the terminal.
    Interrupt,
    /// Any key the terminal ignores.
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_events_compare_by_value() {
        assert_eq!(KeyEvent::Char('a'), KeyEvent::Char('a'));
        assert_ne!(KeyEvent::Char('a'), KeyEvent::Char('b'));
    }
}
