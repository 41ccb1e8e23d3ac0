//! `TEXTURE.nnn` file header, record table and record image header

use crate::fixed_str;
use binrw::{BinRead, BinWrite};

/// Size of the file header in bytes
pub const FILE_HEADER_SIZE: usize = 26;

/// Size of a record table entry in bytes
pub const RECORD_TABLE_ENTRY_SIZE: usize = 20;

/// Size of a record image header in bytes
pub const RECORD_HEADER_SIZE: usize = 28;

/// Row stride of uncompressed image data
pub const ROW_STRIDE: usize = 256;

/// Texture bank header (26 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct TextureFileHeader {
    /// Number of records in the bank
    pub record_count: i16,
    /// NUL-padded bank description
    pub name: [u8; 24],
}

impl TextureFileHeader {
    /// Bank description without padding
    pub fn name(&self) -> String {
        fixed_str(&self.name)
    }
}

/// Record table entry (20 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct RecordTableEntry {
    /// Unknown
    pub unknown1: i16,
    /// Absolute file position of the record image header
    pub record_position: u32,
    /// Unknown
    pub unknown2: i16,
    /// Unknown
    pub unknown3: u32,
    /// Always zero
    pub null: u64,
}

/// Image encoding named by the record header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Raw palette indices
    Uncompressed,
    /// Row-encoded RLE
    RleCompressed,
    /// Image RLE
    ImageRle,
    /// Record RLE
    RecordRle,
    /// Value without a known meaning
    Unknown(u16),
}

impl Compression {
    /// Decode the compression word
    pub const fn from_raw(value: u16) -> Self {
        match value {
            0x0000 => Self::Uncompressed,
            0x0002 => Self::RleCompressed,
            0x0108 => Self::ImageRle,
            0x1108 => Self::RecordRle,
            other => Self::Unknown(other),
        }
    }

    /// The compression word
    pub const fn to_raw(self) -> u16 {
        match self {
            Self::Uncompressed => 0x0000,
            Self::RleCompressed => 0x0002,
            Self::ImageRle => 0x0108,
            Self::RecordRle => 0x1108,
            Self::Unknown(value) => value,
        }
    }
}

/// Record image header (28 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct TextureRecordHeader {
    /// Horizontal draw offset
    pub offset_x: i16,
    /// Vertical draw offset
    pub offset_y: i16,
    /// Image width in pixels
    pub width: i16,
    /// Image height in pixels
    pub height: i16,
    /// Raw compression word
    pub compression: u16,
    /// Size of the record in bytes
    pub record_size: u32,
    /// Offset of the image data from the record header
    pub data_offset: u32,
    /// Non-zero for normal (non-solid) textures
    pub is_normal: u16,
    /// Number of animation frames
    pub frame_count: u16,
    /// Unknown
    pub unknown: i16,
    /// Horizontal scale
    pub x_scale: i16,
    /// Vertical scale
    pub y_scale: i16,
}

impl TextureRecordHeader {
    /// Decoded compression
    pub const fn compression(&self) -> Compression {
        Compression::from_raw(self.compression)
    }

    /// True when more than one frame is stored
    pub const fn is_animated(&self) -> bool {
        self.frame_count > 1
    }
}
