//! Error types for ARCH3D mesh records

use crate::bsa::BsaError;
use thiserror::Error;

/// Errors that can occur when decoding mesh records
#[derive(Debug, Error)]
pub enum MeshError {
    /// Record is shorter than a section it declares
    #[error("Truncated mesh record: {section} needs {expected} bytes, record has {actual}")]
    Truncated {
        /// Section being read
        section: &'static str,
        /// Bytes required (offset + length)
        expected: usize,
        /// Record length
        actual: usize,
    },

    /// Version tag is not v2.5, v2.6 or v2.7
    #[error("Unsupported mesh version: {0:?}")]
    UnsupportedVersion([u8; 4]),

    /// Record layout is internally inconsistent
    #[error("Malformed mesh record: {0}")]
    Malformed(String),

    /// Record name is not a numeric object id
    #[error("Invalid object id: {0}")]
    InvalidObjectId(String),

    /// Underlying archive error
    #[error("Archive error: {0}")]
    Archive(#[from] BsaError),

    /// Binary parsing error
    #[error("Binary parsing error: {0}")]
    BinRead(String),

    /// IO error while seeking within the record
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for MeshError {
    fn from(e: binrw::Error) -> Self {
        Self::BinRead(e.to_string())
    }
}

impl MeshError {
    /// Check if the error means content is absent
    pub fn is_content_missing(&self) -> bool {
        matches!(self, Self::Archive(e) if e.is_content_missing())
    }

    /// Check if the error means the record or archive is damaged
    pub fn is_corrupt(&self) -> bool {
        match self {
            Self::Archive(e) => e.is_corrupt(),
            Self::Truncated { .. }
            | Self::UnsupportedVersion(_)
            | Self::Malformed(_)
            | Self::InvalidObjectId(_)
            | Self::BinRead(_) => true,
            Self::Io(_) => false,
        }
    }
}

/// Result type alias for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;
