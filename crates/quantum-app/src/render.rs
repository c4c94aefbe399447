//! Screen layout and drawing.
//!
//! [`layout`] turns the session into a list of coloured rows that fit the
//! screen; [`draw`] writes those rows with crossterm. Only `draw` touches
//! the terminal.

use std::io::{self, Write};
use std::time::Instant;

use crossterm::cursor::{MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use quantum_terminal::{EntryKind, Terminal};

/// One screen row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub color: Color,
}

fn color_for(kind: EntryKind) -> Color {
    match kind {
        EntryKind::Welcome => Color::Cyan,
        EntryKind::CommandEcho => Color::Green,
        EntryKind::Output => Color::White,
        EntryKind::Info => Color::DarkYellow,
        EntryKind::Error => Color::Red,
        EntryKind::Pending => Color::Yellow,
        EntryKind::AssistantResponse => Color::Magenta,
    }
}

/// Split `line` into chunks that each fit in `width` terminal columns.
/// Wide characters (emoji, CJK) count as two columns.
fn wrap(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.is_empty() {
        return vec![line.to_string()];
    }
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(ch);
        used += w;
    }
    rows.push(current);
    rows
}

/// Rows for a `width` x `height` screen: the tail of the revealed
/// transcript followed by the prompt line.
pub fn layout(term: &Terminal, now: Instant, width: u16, height: u16) -> Vec<Row> {
    let width = usize::from(width);
    let matrix = term.is_matrix_active(now);

    let mut rows = Vec::new();
    for entry in term.transcript().entries() {
        let color = if matrix {
            Color::Green
        } else {
            color_for(entry.kind)
        };
        let shown = term.visible_lines(entry, now);
        for line in entry.text.split('\n').take(shown) {
            rows.extend(wrap(line, width).into_iter().map(|text| Row { text, color }));
        }
    }

    let prompt = format!("{}{}", term.prompt(), term.input());
    let prompt_rows: Vec<Row> = wrap(&prompt, width)
        .into_iter()
        .map(|text| Row {
            text,
            color: Color::Green,
        })
        .collect();
    rows.extend(prompt_rows);

    let keep = usize::from(height.max(1));
    if rows.len() > keep {
        rows.drain(..rows.len() - keep);
    }
    rows
}

/// Draw `rows` from the top of the screen and park the cursor after the
/// last one.
pub fn draw(out: &mut impl Write, rows: &[Row]) -> io::Result<()> {
    let mut y: u16 = 0;
    for row in rows {
        queue!(
            out,
            MoveTo(0, y),
            SetForegroundColor(row.color),
            Print(&row.text),
            ResetColor,
            Clear(ClearType::UntilNewLine)
        )?;
        y = y.saturating_add(1);
    }
    queue!(out, Clear(ClearType::FromCursorDown))?;
    if let Some(last) = rows.last() {
        let x = u16::try_from(last.text.width()).unwrap_or(u16::MAX);
        queue!(out, MoveTo(x, y.saturating_sub(1)), Show)?;
    }
    out.flush()
}
