//! Terminal stand-in for the chat transport: requests on stdin, answers on stdout.

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use skirmish_core::{RegistryConfig, SessionRegistry};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use repl::Format;

mod config;
mod repl;

#[derive(Parser, Debug)]
#[command(version, about = "Play mines and rock-paper-scissors over stdin/stdout")]
struct Cli {
    /// TOML file with registry settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seconds a mines session accepts reveals
    #[arg(long, value_name = "SECS")]
    time_budget: Option<u64>,

    /// Seconds a finished session stays answerable after its deadline
    #[arg(long, value_name = "SECS")]
    retention: Option<u64>,

    /// Run the expiry sweep every SECS seconds
    #[arg(long, value_name = "SECS")]
    sweep_every: Option<u64>,

    #[arg(long, value_enum, default_value_t)]
    format: Format,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

impl Cli {
    fn registry_config(&self) -> anyhow::Result<RegistryConfig> {
        let mut config = config::load(self.config.as_deref())?;
        if let Some(secs) = self.time_budget {
            config.time_budget_secs = secs;
        }
        if let Some(secs) = self.retention {
            config.retention_secs = secs;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let config = cli.registry_config()?;
    log::info!(
        "{}x{} board with {} mines, {}s budget",
        config.game.size,
        config.game.size,
        config.game.mines,
        config.time_budget_secs
    );
    let registry = Arc::new(SessionRegistry::new(config)?);

    if let Some(secs) = cli.sweep_every.filter(|&secs| secs > 0) {
        let registry = Arc::clone(&registry);
        thread::Builder::new()
            .name("sweeper".into())
            .spawn(move || {
                loop {
                    thread::sleep(Duration::from_secs(secs));
                    registry.sweep();
                }
            })
            .context("starting sweeper thread")?;
    }

    repl::run(&*registry, cli.format, io::stdin().lock(), io::stdout().lock())
}
