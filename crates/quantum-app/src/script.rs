//! Non-interactive mode: run a file of command lines and print the transcript.

use std::io::{self, Write};

use quantum_terminal::Terminal;

/// Submit every line of `script`, waiting for assistant replies after each
/// one, then write the whole transcript to `out`. Stops early at `exit`.
pub fn run_script(term: &mut Terminal, script: &str, out: &mut impl Write) -> io::Result<()> {
    for line in script.lines() {
        term.submit(line);
        term.settle();
        if term.should_exit() {
            log::info!("script stopped at {line:?}");
            break;
        }
    }
    for entry in term.transcript().entries() {
        writeln!(out, "{}", entry.text)?;
    }
    out.flush()
}
