//! `TEXTURE.nnn` image banks
//!
//! A texture bank is a standalone file: a 26-byte header, a table of
//! 20-byte entries giving each record's position, and per record a 28-byte
//! image header followed by pixel data. Pixels are palette indices.
//!
//! Only uncompressed single-frame records are decoded. Uncompressed rows are
//! stored with a fixed 256-byte stride regardless of image width.

mod error;
mod file;
mod header;

pub use error::{Result, TextureError};
pub use file::{TextureFile, TextureImage, texture_file_name};
pub use header::{
    Compression, FILE_HEADER_SIZE, RECORD_HEADER_SIZE, RECORD_TABLE_ENTRY_SIZE, ROW_STRIDE,
    RecordTableEntry, TextureFileHeader, TextureRecordHeader,
};
