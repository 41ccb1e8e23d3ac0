//! Command-line interface for the `arena2` binary.
//!
//! The binary is a thin wrapper: it parses [`Cli`], installs a tracing
//! subscriber and calls [`run`]. Commands write their report to any
//! `io::Write`, so they can be exercised without a terminal.

mod commands;

use crate::config::Arena2Config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use daggerfall_formats::bsa::{LoadStrategy, UsageMode};
use std::io::Write;
use std::path::PathBuf;
use tracing::Level;

/// Inspect Daggerfall ARENA2 content
#[derive(Debug, Parser)]
#[command(
    name = "arena2",
    about = "Validate and inspect Daggerfall ARENA2 archives",
    version,
    long_about = "Reads the archives in a Daggerfall ARENA2 directory: validates the inventory, lists records and decodes meshes, maps, sounds and textures."
)]
pub struct Cli {
    /// ARENA2 directory
    #[arg(long, env = "DAGGERFALL_ARENA2", global = true)]
    pub arena2: Option<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// How archive bytes are held while open
    #[arg(long, value_enum, global = true)]
    pub usage: Option<UsageArg>,

    /// How archive directory layouts are determined
    #[arg(long, value_enum, global = true)]
    pub strategy: Option<StrategyArg>,

    /// Set the logging level
    #[arg(short, long, value_enum, global = true, default_value = "info")]
    pub log_level: LogLevel,

    /// Output format
    #[arg(short = 'o', long, value_enum, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the ARENA2 directory holds the expected files
    Validate,

    /// List the records of one kind
    List {
        /// What to list
        #[arg(value_enum)]
        kind: ListKind,
    },

    /// Write a sound record as a WAVE file
    Sound {
        /// Record index in DAGGER.SND
        index: usize,
        /// Output .wav path
        out: PathBuf,
    },

    /// Describe a mesh from ARCH3D.BSA
    Mesh {
        /// Object id
        object_id: u32,
    },

    /// Describe a region from MAPS.BSA
    Region {
        /// Region index
        index: usize,
    },

    /// Describe a location, including its dungeon layout
    Location {
        /// Region index
        region: usize,
        /// Location index within the region
        index: usize,
    },

    /// Describe a texture record
    Texture {
        /// Texture bank number (TEXTURE.nnn)
        archive: u16,
        /// Record within the bank
        record: usize,
        /// Print pixel rows as hex
        #[arg(long)]
        dump: bool,
    },
}

/// Record kinds for `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    /// Sound records in DAGGER.SND
    Sounds,
    /// Mesh records in ARCH3D.BSA
    Meshes,
    /// Block records in BLOCKS.BSA
    Blocks,
    /// Regions in MAPS.BSA
    Regions,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
}

/// `--usage` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UsageArg {
    /// Read whole archives into memory
    Memory,
    /// Memory-map archives
    Mapped,
    /// Read records from disk on demand
    Disk,
}

impl From<UsageArg> for UsageMode {
    fn from(usage: UsageArg) -> Self {
        match usage {
            UsageArg::Memory => Self::Memory,
            UsageArg::Mapped => Self::Mapped,
            UsageArg::Disk => Self::Disk,
        }
    }
}

/// `--strategy` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Trust the declared directory type
    Declared,
    /// Infer the directory layout from the file size
    Discover,
}

impl From<StrategyArg> for LoadStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Declared => Self::Declared,
            StrategyArg::Discover => Self::Discover,
        }
    }
}

/// `--log-level` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace
    Trace,
    /// Debug
    Debug,
    /// Info
    Info,
    /// Warn
    Warn,
    /// Error
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

impl Cli {
    /// Merge defaults, the config file and command-line flags
    pub fn resolve_config(&self) -> Result<Arena2Config> {
        let mut config = match &self.config {
            Some(path) => Arena2Config::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Arena2Config::default(),
        };
        if let Some(root) = &self.arena2 {
            config = config.with_root(root);
        }
        if let Some(usage) = self.usage {
            config = config.with_usage(usage.into());
        }
        if let Some(strategy) = self.strategy {
            config = config.with_strategy(strategy.into());
        }
        Ok(config)
    }
}

/// Execute the parsed command, writing its report to `out`
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let config = cli.resolve_config()?;
    commands::handle(&cli.command, &config, cli.format, out)
}
