//! Raw-mode interactive loop.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::execute;

use quantum_terminal::{KeyOutcome, Terminal};

use crate::keys::map_key;
use crate::render::{draw, layout};

/// Redraw interval; also the input poll timeout.
const TICK: Duration = Duration::from_millis(30);

/// Longest wait for the farewell to finish typing out after `exit`.
const FAREWELL_LIMIT: Duration = Duration::from_secs(2);

/// Restores the screen when dropped, including on early `?` returns.
struct ScreenGuard;

impl ScreenGuard {
    fn enter(out: &mut Stdout) -> io::Result<Self> {
        execute!(out, EnterAlternateScreen)?;
        if let Err(e) = enable_raw_mode() {
            let _ = execute!(out, LeaveAlternateScreen);
            return Err(e);
        }
        set_panic_hook();
        Ok(Self)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        if let Err(e) = restore() {
            log::warn!("failed to restore terminal: {e}");
        }
    }
}

fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        hook(info);
    }));
}

/// Run the session until `exit`, `logout` or Ctrl-C.
pub fn run(term: &mut Terminal) -> io::Result<()> {
    let mut out = io::stdout();
    let _guard = ScreenGuard::enter(&mut out)?;

    loop {
        term.poll();
        let (width, height) = terminal::size()?;
        draw(&mut out, &layout(term, Instant::now(), width, height))?;

        if !event::poll(TICK)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if term.on_key(map_key(key)) == KeyOutcome::Exit {
                    break;
                }
            },
            _ => {},
        }
    }

    // Let the farewell type out before the screen is restored.
    let leaving = Instant::now();
    loop {
        let now = Instant::now();
        let (width, height) = terminal::size()?;
        draw(&mut out, &layout(term, now, width, height))?;
        if fully_revealed(term, now) || now.duration_since(leaving) >= FAREWELL_LIMIT {
            break;
        }
        std::thread::sleep(TICK);
    }

    log::info!("leaving terminal; {} assistant requests still running", term.pending_requests());
    out.flush()
}

/// True once every transcript line is on screen at `now`.
fn fully_revealed(term: &Terminal, now: Instant) -> bool {
    term.transcript()
        .entries()
        .iter()
        .all(|entry| term.visible_lines(entry, now) >= entry.text.split('\n').count())
}
