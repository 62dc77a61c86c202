//! # till: Coin Register Shell
//!
//! Reads register commands from stdin, one per line, and prints results to
//! stdout. Errors go to stderr and never stop the shell.
//!
//! ## Startup
//! ```text
//! init_tracing ──► Cli::parse ──► TillConfig::load ──► flags override
//!      │                                                     │
//!      │                                                     ▼
//!      │                                  build_register (+ opening float)
//!      │                                                     │
//!      ▼                                                     ▼
//!  logs → stderr                                Shell::run(stdin, stdout)
//! ```
//!
//! ## Example
//! ```text
//! $ printf 'add 10 3\nadd 25\nsale 70 100\n' | till
//! Total: $0.30 (3 coins)
//! Total: $0.55 (4 coins)
//! Change $0.30 (3 coins): 3 x 10
//! ```

mod config;
mod shell;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use till_core::Currency;

use crate::config::TillConfig;
use crate::shell::Shell;

#[derive(Parser)]
#[command(name = "till", author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,

    /// Use a built-in coin table: usd, eur, gbp, cad
    #[arg(long)]
    currency: Option<Currency>,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = TillConfig::load(cli.config).context("Failed to load configuration")?;
    if cli.json {
        config.output.json = true;
    }
    if let Some(currency) = cli.currency {
        config.register.currency = currency;
        config.register.denominations = None;
        config.validate().context("Configuration does not fit --currency")?;
    }

    let register = config.build_register()?;
    let mut shell = Shell::new(register, config.register.name.clone(), config.output.json);

    let stdin = io::stdin();
    shell.run(stdin.lock(), &mut io::stdout().lock(), &mut io::stderr().lock())?;

    debug!(total = shell.register().total(), "Shell closed");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every register mutation
/// - `RUST_LOG=till_core=trace` - Also show change search statistics
/// - Default: warnings, plus info from the till crates
///
/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,till=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
