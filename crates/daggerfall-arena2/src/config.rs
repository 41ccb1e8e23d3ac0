//! Content root configuration.
//!
//! Configuration can be provided via:
//! - a JSON file (`--config arena2.json`)
//! - CLI arguments and environment variables (`--arena2`, `DAGGERFALL_ARENA2`)
//! - Default values
//!
//! Later sources override earlier ones.
//!
//! # Example
//!
//! ```
//! use daggerfall_arena2::Arena2Config;
//! use daggerfall_formats::bsa::UsageMode;
//!
//! let config: Arena2Config = serde_json::from_str(r#"{ "root": "/games/df/ARENA2", "usage": "mapped" }"#).unwrap();
//! assert_eq!(config.usage, UsageMode::Mapped);
//! ```

use crate::error::ConfigError;
use daggerfall_formats::bsa::{LoadStrategy, UsageMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the ARENA2 content lives and how its archives are opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena2Config {
    /// ARENA2 directory
    pub root: PathBuf,

    /// How archive bytes are held while open
    pub usage: UsageMode,

    /// How archive directory layouts are determined
    pub strategy: LoadStrategy,
}

impl Default for Arena2Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./ARENA2"),
            usage: UsageMode::Memory,
            strategy: LoadStrategy::Declared,
        }
    }
}

impl Arena2Config {
    /// Create a configuration for the given content root
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the content root
    #[must_use]
    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }

    /// Set the archive usage mode
    #[must_use]
    pub const fn with_usage(mut self, usage: UsageMode) -> Self {
        self.usage = usage;
        self
    }

    /// Set the directory loading strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: LoadStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}
