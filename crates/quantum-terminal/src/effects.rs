//! Time-driven cosmetic effects: the typewriter reveal and the matrix tint.
//!
//! Both are pure functions of an `Instant` supplied by the caller, so the
//! front end can redraw on any tick and tests can step time explicitly.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::TypewriterConfig;
use crate::transcript::{EntryId, EntryKind, OutputEntry};

/// Line-by-line reveal schedule for transcript entries.
#[derive(Debug, Default)]
pub struct Typewriter {
    config: TypewriterConfig,
    starts: HashMap<EntryId, (Instant, Duration)>,
}

impl Typewriter {
    pub fn new(config: TypewriterConfig) -> Self {
        Self {
            config,
            starts: HashMap::new(),
        }
    }

    /// Start (or restart) the reveal of an entry appended at `now`.
    pub fn schedule(&mut self, id: EntryId, kind: EntryKind, now: Instant) {
        if !kind.is_typed_out() {
            self.starts.remove(&id);
            return;
        }
        let delay = match kind {
            EntryKind::Welcome => self.config.welcome_delay_ms,
            _ => self.config.entry_delay_ms,
        };
        self.starts.insert(id, (now, Duration::from_millis(delay)));
    }

    /// Drop every schedule (the transcript was cleared).
    pub fn clear(&mut self) {
        self.starts.clear();
    }

    /// Number of lines of `entry` visible at `now`.
    pub fn visible_lines(&self, entry: &OutputEntry, now: Instant) -> usize {
        let total = line_count(&entry.text);
        let Some(&(start, delay)) = self.starts.get(&entry.id) else {
            return total;
        };
        let elapsed = now.saturating_duration_since(start);
        if elapsed < delay {
            return 0;
        }
        let step = self.config.line_delay_ms;
        if step == 0 {
            return total;
        }
        let after = (elapsed - delay).as_millis();
        let shown = 1 + after / u128::from(step);
        usize::try_from(shown).map_or(total, |n| n.min(total))
    }
}

fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// The cosmetic "matrix" tint. Never touches the transcript.
#[derive(Debug, Clone)]
pub struct MatrixEffect {
    duration: Duration,
    until: Option<Instant>,
}

impl MatrixEffect {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            until: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.until = Some(now + self.duration);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}
