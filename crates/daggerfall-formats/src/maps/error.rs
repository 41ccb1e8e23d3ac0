//! Error types for MAPS.BSA records

use crate::bsa::BsaError;
use thiserror::Error;

/// Errors that can occur when decoding region and location records
#[derive(Debug, Error)]
pub enum MapError {
    /// Region index outside the archive's regions
    #[error("Region {index} out of range ({count} regions)")]
    RegionOutOfRange {
        /// Requested region
        index: usize,
        /// Regions present
        count: usize,
    },

    /// Location index outside the region's locations
    #[error("Location {index} out of range in region {region} ({count} locations)")]
    LocationOutOfRange {
        /// Region searched
        region: usize,
        /// Requested location
        index: usize,
        /// Locations in the region
        count: usize,
    },

    /// Record is shorter than its declared counts require
    #[error("Truncated {record}: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Record name
        record: String,
        /// Bytes required
        expected: usize,
        /// Record length
        actual: usize,
    },

    /// Record layout is internally inconsistent
    #[error("Malformed map record: {0}")]
    Malformed(String),

    /// Underlying archive error
    #[error("Archive error: {0}")]
    Archive(#[from] BsaError),

    /// Binary parsing error
    #[error("Binary parsing error: {0}")]
    BinRead(String),

    /// IO error while seeking within a record
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for MapError {
    fn from(e: binrw::Error) -> Self {
        Self::BinRead(e.to_string())
    }
}

impl MapError {
    /// Check if the error means content is absent
    pub fn is_content_missing(&self) -> bool {
        matches!(self, Self::Archive(e) if e.is_content_missing())
    }

    /// Check if the error means the records are damaged
    pub fn is_corrupt(&self) -> bool {
        match self {
            Self::Archive(e) => e.is_corrupt(),
            Self::Truncated { .. } | Self::Malformed(_) | Self::BinRead(_) => true,
            Self::RegionOutOfRange { .. } | Self::LocationOutOfRange { .. } | Self::Io(_) => {
                false
            }
        }
    }
}

/// Result type alias for map operations
pub type Result<T> = std::result::Result<T, MapError>;
