//! Ordered log of rendered terminal output.
//!
//! Entries are append-only. The only in-place mutation is replacing a
//! pending assistant entry once its reply arrives, addressed by the entry's
//! stable [`EntryId`] rather than by its index.

/// Kind of a transcript entry; drives colouring and reveal behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// The banner shown when the terminal opens.
    Welcome,
    /// Echo of a submitted command line.
    CommandEcho,
    /// Normal command output.
    Output,
    /// Informational notice (e.g. tab-completion candidates).
    Info,
    /// Error output.
    Error,
    /// Placeholder shown while the assistant is thinking.
    Pending,
    /// Reply from the remote assistant.
    AssistantResponse,
}

impl EntryKind {
    /// Whether entries of this kind are revealed line by line.
    pub fn is_typed_out(self) -> bool {
        !matches!(self, EntryKind::CommandEcho | EntryKind::Pending)
    }
}

/// Stable identifier of a transcript entry.
///
/// Ids increase monotonically and are never reused within a session, not
/// even after `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    /// The raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// One rendered block of terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub text: String,
}

/// The terminal transcript.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<OutputEntry>,
    next_id: u64,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its id.
    pub fn push(&mut self, kind: EntryKind, text: impl Into<String>) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(OutputEntry {
            id,
            kind,
            text: text.into(),
        });
        id
    }

    /// Replace the kind and text of an existing entry, keeping its position.
    ///
    /// Returns `false` when the entry no longer exists (the transcript was
    /// cleared after it was appended).
    pub fn replace(&mut self, id: EntryId, kind: EntryKind, text: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.kind = kind;
                entry.text = text.into();
                true
            },
            None => false,
        }
    }

    /// Look up an entry by id.
    pub fn get(&self, id: EntryId) -> Option<&OutputEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Remove every entry. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[OutputEntry] {
        &self.entries
    }

    /// The most recently appended entry.
    pub fn last(&self) -> Option<&OutputEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_increasing_ids() {
        let mut t = Transcript::new();
        let a = t.push(EntryKind::Output, "a");
        let b = t.push(EntryKind::Output, "b");
        assert!(b > a);
        assert_eq!(t.len(), 2);
        assert_eq!(t.last().map(|e| e.text.as_str()), Some("b"));
    }

    #[test]
    fn replace_keeps_position() {
        let mut t = Transcript::new();
        t.push(EntryKind::CommandEcho, "$ ai - hi");
        let pending = t.push(EntryKind::Pending, "Thinking...");
        t.push(EntryKind::CommandEcho, "$ pwd");
        t.push(EntryKind::Output, "/home/ahraz");

        assert!(t.replace(pending, EntryKind::AssistantResponse, "hello"));
        let entries = t.entries();
        assert_eq!(entries[1].id, pending);
        assert_eq!(entries[1].kind, EntryKind::AssistantResponse);
        assert_eq!(entries[1].text, "hello");
        assert_eq!(entries[3].text, "/home/ahraz");
    }

    #[test]
    fn replace_after_clear_is_rejected() {
        let mut t = Transcript::new();
        let pending = t.push(EntryKind::Pending, "Thinking...");
        t.clear();
        assert!(!t.replace(pending, EntryKind::AssistantResponse, "late"));
        assert!(t.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut t = Transcript::new();
        let before = t.push(EntryKind::Output, "x");
        t.clear();
        let after = t.push(EntryKind::Output, "y");
        assert_ne!(before, after);
        assert!(t.get(before).is_none());
        assert_eq!(t.get(after).map(|e| e.text.as_str()), Some("y"));
    }

    #[test]
    fn echo_and_pending_are_not_typed_out() {
        assert!(!EntryKind::CommandEcho.is_typed_out());
        assert!(!EntryKind::Pending.is_typed_out());
        assert!(EntryKind::Welcome.is_typed_out());
        assert!(EntryKind::AssistantResponse.is_typed_out());
    }
}
