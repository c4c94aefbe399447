//! `quantum-chat-api` entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use quantum_chat_api::{ChatServer, GroqUpstream, ProxyConfig};

/// Chat endpoint for the quantum terminal's `ai` command.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ProxyConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    let upstream = GroqUpstream::from_config(&config)?;
    if !upstream.has_key() {
        log::warn!(
            "{} is not set; every chat request will get the fallback reply",
            config.api_key_env
        );
    }

    let server = ChatServer::bind(config, Arc::new(upstream))?;
    server.run();
    Ok(())
}
