//! `arena2` binary entry point.
//!
//! Parses arguments, initializes logging on stderr and runs the command
//! against stdout. For library usage, see the daggerfall-arena2 crate
//! documentation.

use anyhow::Result;
use clap::Parser;
use daggerfall_arena2::cli::{self, Cli};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level
    let level = Level::from(cli.log_level).to_string().to_lowercase();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(&cli, &mut out)
}
