//! Lingo Control - CLI over the local learning-progress ledger
//!
//! Inspect and adjust the progress record, achievements and history kept in
//! the configured data directory.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use lingo_ledger::{LedgerConfig, LedgerError};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lingoctl")]
#[command(about = "Lingo - learning progress, points and achievements", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show level, points and learning stats
    Status,

    /// Add experience points
    Xp {
        amount: u64,
    },

    /// Add or spend points
    Points {
        #[command(subcommand)]
        action: PointsAction,
    },

    /// Add learning time in minutes
    Time {
        minutes: u64,
    },

    /// Add learned words
    Words {
        count: u64,
    },

    /// Add correct answers
    Correct {
        count: u64,
    },

    /// Unlock an achievement by id
    Unlock {
        id: String,
    },

    /// List achievements and unlock any the record now qualifies for
    Achievements {
        /// Unlock eligible catalog achievements
        #[arg(long)]
        check: bool,
    },

    /// Show learning history
    History {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Record a history entry
    Log {
        activity: String,
        description: String,
    },

    /// Update display name and email
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
    },

    /// Show or set dark mode
    DarkMode {
        state: Option<Toggle>,
    },
}

#[derive(Subcommand)]
pub enum PointsAction {
    Add { amount: u64 },
    Spend { amount: u64 },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config picks the default log level, so read it first and report after
    let path = LedgerConfig::config_path();
    let loaded = LedgerConfig::read_from_path(&path);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // Initialize logging
    let filter = EnvFilter::try_from_env("LINGO_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    report_config(&path, &loaded);

    let code = commands::run(cli.command, &config)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Log where config came from, or why defaults are in use
fn report_config(path: &Path, loaded: &Result<LedgerConfig, LedgerError>) {
    match loaded {
        Ok(_) => info!("Loaded config from {}", path.display()),
        Err(e) => warn!("Config not loaded from {}, using defaults: {}", path.display(), e),
    }
}
