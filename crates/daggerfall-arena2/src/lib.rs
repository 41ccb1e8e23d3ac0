//! Daggerfall ARENA2 content root.
//!
//! This crate sits between a host application and the format parsers in
//! `daggerfall-formats`. It knows where the content lives, checks that the
//! directory looks like a Daggerfall install, and opens the archives with
//! the configured usage mode and loading strategy.
//!
//! # Architecture
//!
//! - `config`: content root configuration (JSON file, CLI, defaults)
//! - `validation`: shallow inventory checks over the root directory
//! - `content`: case-insensitive file resolution and archive opening
//! - `cli`: the `arena2` inspection tool
//!
//! # Example
//!
//! ```no_run
//! use daggerfall_arena2::{Arena2, Arena2Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let arena2 = Arena2::new(Arena2Config::new("/games/daggerfall/ARENA2"));
//!
//! // Validation never fails; it reports what is missing
//! let result = arena2.validate();
//! if !result.appears_valid {
//!     eprintln!("missing: {:?}", result.failed_checks());
//! }
//!
//! let maps = arena2.maps()?;
//! if let Some(location) = maps.find_location(17, "Daggerfall")? {
//!     println!("{} has dungeon: {}", location.name, location.has_dungeon());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod validation;

pub use config::Arena2Config;
pub use content::Arena2;
pub use error::{Arena2Error, ConfigError, Result};
pub use validation::{Check, ValidationResult, validate};
