//! Error types for content root access.

use daggerfall_formats::bsa::BsaError;
use daggerfall_formats::maps::MapError;
use daggerfall_formats::mesh::MeshError;
use daggerfall_formats::sound::SoundError;
use daggerfall_formats::texture::TextureError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read config from {path}: {source}")]
    ReadFailed {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid JSON in a configuration file
    #[error("Invalid JSON in config file: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors raised while locating and decoding ARENA2 content.
#[derive(Debug, Error)]
pub enum Arena2Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Content root directory does not exist
    #[error("ARENA2 directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Required file is not present in the content root
    #[error("{name} not found in {}", .root.display())]
    FileNotFound {
        /// File that was looked up
        name: String,
        /// Content root searched
        root: PathBuf,
    },

    /// Archive error
    #[error(transparent)]
    Archive(#[from] BsaError),

    /// Mesh decoding error
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Map decoding error
    #[error(transparent)]
    Map(#[from] MapError),

    /// Sound decoding error
    #[error(transparent)]
    Sound(#[from] SoundError),

    /// Texture decoding error
    #[error(transparent)]
    Texture(#[from] TextureError),

    /// I/O error while scanning the content root
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Arena2Error {
    /// Check if the error means content is absent (fixable by pointing at a
    /// different ARENA2 directory)
    pub fn is_content_missing(&self) -> bool {
        match self {
            Self::RootNotFound(_) | Self::FileNotFound { .. } => true,
            Self::Archive(e) => e.is_content_missing(),
            Self::Mesh(e) => e.is_content_missing(),
            Self::Map(e) => e.is_content_missing(),
            Self::Sound(e) => e.is_content_missing(),
            Self::Texture(e) => e.is_content_missing(),
            Self::Config(_) | Self::Io(_) => false,
        }
    }

    /// Check if the error means the content is damaged
    pub fn is_corrupt(&self) -> bool {
        match self {
            Self::Archive(e) => e.is_corrupt(),
            Self::Mesh(e) => e.is_corrupt(),
            Self::Map(e) => e.is_corrupt(),
            Self::Sound(e) => e.is_corrupt(),
            Self::Texture(e) => e.is_corrupt(),
            Self::Config(_) | Self::RootNotFound(_) | Self::FileNotFound { .. } | Self::Io(_) => {
                false
            }
        }
    }
}

/// Result type alias for content root operations
pub type Result<T> = std::result::Result<T, Arena2Error>;
