//! Error types for BSA archive operations

use std::path::PathBuf;
use thiserror::Error;

/// BSA operation result type
pub type BsaResult<T> = Result<T, BsaError>;

/// Errors raised while opening or reading a BSA archive
#[derive(Debug, Error)]
pub enum BsaError {
    /// Archive file does not exist
    #[error("Archive not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Record index outside `[0, record_count)`
    #[error("Record index {index} out of range (archive has {count} records)")]
    OutOfRange {
        /// Requested record index
        index: usize,
        /// Number of records in the archive
        count: usize,
    },

    /// Header, directory or offset table disagree with the file contents
    #[error("Corrupt archive: {reason}")]
    CorruptArchive {
        /// What was inconsistent
        reason: String,
    },

    /// Directory type word is neither name (0x0100) nor number (0x0200)
    #[error("Unknown BSA directory type: {0:#06x}")]
    UnknownDirectoryType(u16),

    /// Record is not present in the directory
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Record cannot be written into an archive
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Binary read/write error
    #[error("Binary format error: {0}")]
    BinRead(#[from] binrw::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BsaError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptArchive {
            reason: reason.into(),
        }
    }

    /// Check if the error means content is absent (recoverable by reconfiguration)
    pub fn is_content_missing(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::RecordNotFound(_))
    }

    /// Check if the error means the data on disk is damaged or the wrong version
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::CorruptArchive { .. } | Self::UnknownDirectoryType(_) | Self::BinRead(_)
        )
    }
}
