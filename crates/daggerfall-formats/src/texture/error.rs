//! Error types for texture bank files

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading `TEXTURE.nnn` files
#[derive(Debug, Error)]
pub enum TextureError {
    /// Texture file does not exist
    #[error("Texture file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Record index outside the bank
    #[error("Texture record {index} out of range ({count} records)")]
    OutOfRange {
        /// Requested record
        index: usize,
        /// Records in the bank
        count: usize,
    },

    /// File is shorter than a section it declares
    #[error("Truncated texture file: {section} needs {expected} bytes, file has {actual}")]
    Truncated {
        /// Section being read
        section: &'static str,
        /// Bytes required (offset + length)
        expected: usize,
        /// File length
        actual: usize,
    },

    /// Header values are internally inconsistent
    #[error("Malformed texture file: {0}")]
    Malformed(String),

    /// Image uses an encoding this reader does not decode
    #[error(
        "Unsupported texture record {record}: compression {compression:#06x}, {frame_count} frames"
    )]
    Unsupported {
        /// Record index
        record: usize,
        /// Compression word from the record header
        compression: u16,
        /// Frame count from the record header
        frame_count: u16,
    },

    /// Binary parsing error
    #[error("Binary parsing error: {0}")]
    BinRead(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for TextureError {
    fn from(e: binrw::Error) -> Self {
        Self::BinRead(e.to_string())
    }
}

impl TextureError {
    /// Check if the error means content is absent
    pub fn is_content_missing(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if the error means the file is damaged
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. } | Self::Malformed(_) | Self::BinRead(_)
        )
    }
}

/// Result type alias for texture operations
pub type Result<T> = std::result::Result<T, TextureError>;
