//! File format parsers for Daggerfall ARENA2 content
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::doc_markdown)] // Many ARENA2-specific terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::derive_partial_eq_without_eq)] // Binary format structs
#![allow(clippy::use_self)] // Type clarity
//! This crate reads the proprietary on-disk formats shipped in the `ARENA2`
//! directory of The Elder Scrolls II: Daggerfall and turns them into
//! immutable, structured records.
//!
//! # Supported Formats
//!
//! - **BSA**: Multi-record container used by `ARCH3D.BSA`, `BLOCKS.BSA`,
//!   `MAPS.BSA` and `DAGGER.SND`
//! - **Mesh**: ARCH3D 3D object records (points, planes, texture references)
//! - **Maps**: Region and location tables, including dungeon block layouts
//! - **Sound**: 8-bit mono PCM sound effects with a ready-made WAVE header
//! - **Texture**: `TEXTURE.nnn` image banks (record tables, uncompressed frames)
//! - **Blocks**: `BLOCKS.BSA` record classification
//!
//! # Design Principles
//!
//! - **Atomic decoding**: a record either decodes fully or is rejected
//! - **Deterministic**: identical bytes always produce identical records
//! - **No sentinels**: absence is expressed with `Option`, never zeroed values
//! - **Scoped resources**: archive buffers, maps and handles are released on drop
//!
//! # Example
//!
//! ```rust,no_run
//! use daggerfall_formats::bsa::{BsaArchive, LoadStrategy, UsageMode};
//! use daggerfall_formats::sound::SoundFile;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = BsaArchive::open("ARENA2/DAGGER.SND", UsageMode::Memory, LoadStrategy::Declared)?;
//! let sounds = SoundFile::new(archive);
//! let sound = sounds.sound(0)?;
//! std::fs::write("sound0.wav", sound.to_wave())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// BSA archive container reading and building
///
/// A BSA file is a flat sequence of records followed by a directory that
/// names (or numbers) each record and gives its size. Record offsets are
/// implied by the directory order.
///
/// See the [`bsa`] module for usage modes and loading strategies.
pub mod bsa;
pub mod blocks;
/// Region and location records from `MAPS.BSA`
///
/// Each of the game's regions is stored as four records (`MAPNAMES`,
/// `MAPTABLE`, `MAPPITEM`, `MAPDITEM`) that together describe every location
/// in the region and the block layout of any dungeon attached to it.
pub mod maps;
/// 3D object records from `ARCH3D.BSA`
pub mod mesh;
pub mod sound;
/// `TEXTURE.nnn` image bank files
///
/// Texture banks are standalone files (not BSA records). Meshes reference
/// them by archive number and record index.
pub mod texture;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

use bsa::{BsaArchive, BsaError};

/// Common decoding trait for record kinds stored one-per-record in a BSA
pub trait BsaRecord: Sized {
    /// Error produced when the record bytes are malformed
    type Error: From<BsaError>;

    /// Decode a record from its directory name and raw bytes
    fn parse_record(name: &str, data: &[u8]) -> Result<Self, Self::Error>;

    /// Read record `index` from `archive` and decode it
    fn decode(archive: &BsaArchive, index: usize) -> Result<Self, Self::Error> {
        let name = archive.record_name(index)?;
        let data = archive.record_bytes(index)?;
        Self::parse_record(&name, &data)
    }
}

/// Read a NUL-padded fixed-width ASCII field, stopping at the first NUL
pub(crate) fn fixed_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}

/// Write `s` into a fixed-width NUL-padded field, truncating if needed
pub(crate) fn pad_str<const N: usize>(s: &str) -> [u8; N] {
    let mut out = [0u8; N];
    let bytes = s.as_bytes();
    let len = bytes.len().min(N);
    out[..len].copy_from_slice(&bytes[..len]);
    out
}
