//! crossterm key events to interpreter key events.

use crossterm::event::{KeyCode, KeyEvent as CtKeyEvent, KeyModifiers};
use quantum_types::KeyEvent;

pub fn map_key(key: CtKeyEvent) -> KeyEvent {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => KeyEvent::Interrupt,
        KeyCode::Char(_) if ctrl => KeyEvent::Other,
        KeyCode::Char(ch) => KeyEvent::Char(ch),
        KeyCode::Backspace => KeyEvent::Backspace,
        KeyCode::Enter => KeyEvent::Enter,
        KeyCode::Up => KeyEvent::Up,
        KeyCode::Down => KeyEvent::Down,
        KeyCode::Tab => KeyEvent::Tab,
        _ => KeyEvent::Other,
    }
}
