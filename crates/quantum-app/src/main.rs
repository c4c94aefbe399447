//! Quantum portfolio terminal entry point.
//!
//! Runs the interpreter in a full-screen raw-mode terminal, or with
//! `--script` feeds a file of command lines through it and prints the
//! transcript.

mod keys;
mod render;
mod script;
#[cfg(test)]
mod test_support;
mod tui;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use quantum_terminal::{Assistant, Terminal, TerminalConfig};

const DEFAULT_CONFIG: &str = "quantum.toml";

#[derive(Parser, Debug)]
#[command(version, about = "Quantum portfolio terminal")]
struct Cli {
    /// TOML configuration file (defaults to ./quantum.toml when present).
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Origin the terminal pretends to be served from; picks the chat endpoint.
    #[arg(long, value_name = "URL")]
    origin: Option<String>,

    /// Run command lines from FILE (`-` for stdin) and print the transcript.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Log to stderr instead of the log file.
    #[arg(long, default_value_t = false)]
    log_stderr: bool,

    /// Log file used in interactive mode.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if !cli.log_stderr {
        let path = cli
            .log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("quantum-terminal.log"));
        let file = File::create(&path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<TerminalConfig> {
    let mut config = match &cli.config {
        Some(path) => TerminalConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => {
            TerminalConfig::load(Path::new(DEFAULT_CONFIG))
                .with_context(|| format!("loading {DEFAULT_CONFIG}"))?
        },
        None => TerminalConfig::default(),
    };
    if let Some(origin) = &cli.origin {
        config.origin = origin.clone();
    }
    Ok(config)
}

fn read_script(path: &Path) -> Result<String> {
    let mut text = String::new();
    if path == Path::new("-") {
        std::io::stdin().read_to_string(&mut text)?;
    } else {
        text = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
    }
    Ok(text)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load_config(&cli)?;
    let assistant = Assistant::from_config(&config)?;
    log::info!("chat endpoint: {}", assistant.endpoint().url());
    let mut term = Terminal::new(config, assistant);

    match &cli.script {
        Some(path) => {
            let text = read_script(path)?;
            script::run_script(&mut term, &text, &mut std::io::stdout().lock())?;
        },
        None => tui::run(&mut term)?,
    }
    Ok(())
}
