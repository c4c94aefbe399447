//! The terminal session: single owner of every piece of interpreter state.
//!
//! Key events and submitted lines come in through [`Terminal::on_key`] and
//! [`Terminal::submit`]; assistant replies arrive from worker threads and are
//! applied in [`Terminal::poll`]. All transcript and history mutation happens
//! on the thread that owns the `Terminal`.

use std::time::Instant;

use log::{debug, info};

use quantum_types::KeyEvent;

use crate::assistant::{Assistant, AssistantOutcome};
use crate::commands::register_builtins;
use crate::config::TerminalConfig;
use crate::effects::{MatrixEffect, Typewriter};
use crate::fs::PortfolioFs;
use crate::history::History;
use crate::input::{Completion, InputController};
use crate::interpreter::{CommandOutput, CommandRegistry, Environment, tokenize};
use crate::transcript::{EntryId, EntryKind, OutputEntry, Transcript};
use crate::worker::AssistantWorker;

const WELCOME: &str = include_str!("../content/welcome.txt");

/// What the front end should do after a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    /// Close the terminal (`exit`, `logout` or Ctrl-C).
    Exit,
}

/// An interactive terminal session.
pub struct Terminal {
    config: TerminalConfig,
    registry: CommandRegistry,
    transcript: Transcript,
    history: History,
    input: InputController,
    fs: PortfolioFs,
    cwd: String,
    worker: AssistantWorker,
    typewriter: Typewriter,
    matrix: MatrixEffect,
    started: Instant,
    exit_requested: bool,
}

impl Terminal {
    /// Start a session with the built-in commands and the welcome banner.
    pub fn new(config: TerminalConfig, assistant: Assistant) -> Self {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        info!(
            "terminal session started: {} commands, assistant at {}",
            registry.len(),
            assistant.endpoint().url()
        );

        let mut term = Self {
            fs: PortfolioFs::new(&config.home),
            cwd: config.home.clone(),
            typewriter: Typewriter::new(config.typewriter),
            matrix: MatrixEffect::new(config.matrix_duration()),
            worker: AssistantWorker::new(assistant),
            registry,
            transcript: Transcript::new(),
            history: History::new(),
            input: InputController::new(),
            started: Instant::now(),
            exit_requested: false,
            config,
        };
        term.push(EntryKind::Welcome, WELCOME.trim_end());
        term
    }

    // -- input ----------------------------------------------------------------

    /// Feed one key press.
    pub fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key {
            KeyEvent::Char(ch) => self.input.insert(ch),
            KeyEvent::Backspace => self.input.backspace(),
            KeyEvent::Up => self.input.history_up(&self.history),
            KeyEvent::Down => self.input.history_down(&self.history),
            KeyEvent::Tab => {
                if let Completion::Candidates(names) = self.input.complete(&self.registry) {
                    self.push(
                        EntryKind::Info,
                        format!("💡 Possible completions: {}", names.join(", ")),
                    );
                }
            },
            KeyEvent::Enter => {
                let line = self.input.take();
                self.submit(&line);
            },
            KeyEvent::Interrupt => self.exit_requested = true,
            KeyEvent::Other => {},
        }
        if self.exit_requested {
            KeyOutcome::Exit
        } else {
            KeyOutcome::Continue
        }
    }

    /// Submit a command line.
    pub fn submit(&mut self, line: &str) {
        let line = line.trim();
        let Some((name, args)) = tokenize(line) else {
            return;
        };
        self.push(EntryKind::CommandEcho, format!("{}$ {line}", self.cwd));

        let result = match self.registry.lookup(&name) {
            Some(cmd) => {
                let mut env = Environment {
                    cwd: self.cwd.clone(),
                    home: &self.config.home,
                    user: &self.config.user,
                    host: &self.config.host,
                    fs: &self.fs,
                    history: self.history.entries(),
                    registry: &self.registry,
                    started: self.started,
                };
                let result = cmd.execute(&args, &mut env);
                self.cwd = env.cwd;
                Some(result)
            },
            None => None,
        };

        match result {
            Some(Ok(output)) => self.apply(output),
            Some(Err(e)) => {
                debug!("{name} failed: {e}");
                self.push(EntryKind::Error, e.to_string());
            },
            None => {
                debug!("unknown command {name:?}");
                let text = self.unknown_command(&name);
                self.push(EntryKind::Error, text);
            },
        }

        self.history.push(line);
        self.input.reset();
    }

    fn apply(&mut self, output: CommandOutput) {
        match output {
            CommandOutput::Text(text) => {
                self.push(EntryKind::Output, text);
            },
            CommandOutput::None => {},
            CommandOutput::Clear => {
                self.transcript.clear();
                self.typewriter.clear();
            },
            CommandOutput::Ask { prompt } => self.ask(prompt),
            CommandOutput::Matrix(text) => {
                self.push(EntryKind::Output, text);
                self.matrix.start(Instant::now());
            },
            CommandOutput::Exit(text) => {
                self.push(EntryKind::Output, text);
                self.exit_requested = true;
            },
        }
    }

    fn ask(&mut self, prompt: String) {
        if prompt.trim().is_empty() {
            let usage = self.worker.assistant().usage();
            self.push(EntryKind::AssistantResponse, usage);
            return;
        }
        let pending = self.worker.assistant().pending_text();
        let id = self.push(EntryKind::Pending, pending);
        self.worker.dispatch(id, prompt);
    }

    fn unknown_command(&self, name: &str) -> String {
        let mut text = format!("❌ Command not found: {name}\n");
        let suggestions = self.registry.suggestions(name);
        if !suggestions.is_empty() {
            text.push_str(&format!(
                "\n💡 Did you mean one of these?\n   {}\n",
                suggestions.join(", ")
            ));
        }
        text.push_str(&format!(
            "\n📖 Type 'help' for all available commands.\n\
             🤖 Try 'ai - your question' to ask {}!",
            self.config.assistant_name
        ));
        text
    }

    fn push(&mut self, kind: EntryKind, text: impl Into<String>) -> EntryId {
        let id = self.transcript.push(kind, text);
        self.typewriter.schedule(id, kind, Instant::now());
        id
    }

    // -- assistant replies ----------------------------------------------------

    /// Apply finished assistant replies without blocking. Returns how many
    /// pending entries were patched.
    pub fn poll(&mut self) -> usize {
        let mut patched = 0;
        while let Some((id, outcome)) = self.worker.try_recv() {
            patched += usize::from(self.resolve(id, outcome));
        }
        patched
    }

    /// Block until no assistant request is in flight.
    pub fn settle(&mut self) -> usize {
        let mut patched = self.poll();
        while let Some((id, outcome)) = self.worker.recv_blocking() {
            patched += usize::from(self.resolve(id, outcome));
        }
        patched
    }

    fn resolve(&mut self, id: EntryId, outcome: AssistantOutcome) -> bool {
        let (kind, text) = match outcome {
            AssistantOutcome::Answered(text) => (EntryKind::AssistantResponse, text),
            AssistantOutcome::Failed(text) => (EntryKind::Error, text),
        };
        if self.transcript.replace(id, kind, text) {
            self.typewriter.schedule(id, kind, Instant::now());
            true
        } else {
            info!("dropping assistant reply for cleared entry {}", id.get());
            false
        }
    }

    /// Assistant requests still running.
    pub fn pending_requests(&self) -> usize {
        self.worker.in_flight()
    }

    // -- rendering state ------------------------------------------------------

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Current edit buffer.
    pub fn input(&self) -> &str {
        self.input.buffer()
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn prompt(&self) -> String {
        format!("{}$ ", self.cwd)
    }

    /// Number of lines of `entry` revealed at `now`.
    pub fn visible_lines(&self, entry: &OutputEntry, now: Instant) -> usize {
        self.typewriter.visible_lines(entry, now)
    }

    pub fn is_matrix_active(&self, now: Instant) -> bool {
        self.matrix.is_active(now)
    }

    /// Whether `exit`, `logout` or Ctrl-C asked to close the terminal.
    pub fn should_exit(&self) -> bool {
        self.exit_requested
    }
}
