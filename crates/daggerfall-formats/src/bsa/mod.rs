//! BSA archive container
//!
//! BSA files hold many records back to back, followed by a directory that
//! gives each record's size and either a 12-character name or a numeric id.
//!
//! # Binary Layout
//!
//! ```text
//! +--------------------+  offset 0
//! | u16 record_count   |
//! | u16 directory_type |  0x0100 = name, 0x0200 = number
//! +--------------------+  offset 4
//! | record 0 bytes     |
//! | record 1 bytes     |
//! | ...                |
//! +--------------------+  file_len - record_count * entry_size
//! | directory entries  |  18 bytes (name) or 8 bytes (number) each
//! +--------------------+
//! ```
//!
//! Record offsets are not stored; they follow from the directory order.
//!
//! # Usage
//!
//! ```rust,no_run
//! use daggerfall_formats::bsa::{BsaArchive, LoadStrategy, UsageMode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = BsaArchive::open("ARENA2/BLOCKS.BSA", UsageMode::Mapped, LoadStrategy::Declared)?;
//! for info in archive.records().take(5) {
//!     println!("{} {} bytes", info.name, info.length);
//! }
//! let bytes = archive.record_bytes(0)?;
//! assert_eq!(bytes.len(), archive.record_length(0)?);
//! # Ok(())
//! # }
//! ```

mod archive;
mod builder;
mod error;
mod header;

pub use archive::{BsaArchive, LoadStrategy, RecordInfo, UsageMode};
pub use builder::BsaBuilder;
pub use error::{BsaError, BsaResult};
pub use header::{
    BsaHeader, DirectoryEntry, DirectoryType, HEADER_SIZE, MAX_NAME_LENGTH, NAME_ENTRY_SIZE,
    NUMBER_ENTRY_SIZE, NameEntry, NumberEntry,
};
