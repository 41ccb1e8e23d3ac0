//! ARCH3D record header and plane structures

use crate::mesh::error::{MeshError, Result};
use binrw::{BinRead, BinWrite};

/// Size of the ARCH3D header in bytes
pub const HEADER_SIZE: usize = 64;

/// Size of a point or normal entry (three i32 components)
pub const VECTOR_SIZE: usize = 12;

/// Size of a plane header in bytes
pub const PLANE_HEADER_SIZE: usize = 8;

/// Size of a plane point entry in bytes
pub const PLANE_POINT_SIZE: usize = 8;

/// ARCH3D format revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshVersion {
    /// `v2.5`
    V25,
    /// `v2.6`
    V26,
    /// `v2.7`
    V27,
}

impl MeshVersion {
    /// Parse the 4-byte version tag
    pub fn from_tag(tag: [u8; 4]) -> Result<Self> {
        match &tag {
            b"v2.5" => Ok(Self::V25),
            b"v2.6" => Ok(Self::V26),
            b"v2.7" => Ok(Self::V27),
            _ => Err(MeshError::UnsupportedVersion(tag)),
        }
    }

    /// The 4-byte version tag
    pub const fn tag(self) -> [u8; 4] {
        match self {
            Self::V25 => *b"v2.5",
            Self::V26 => *b"v2.6",
            Self::V27 => *b"v2.7",
        }
    }

    /// Divisor turning a plane point offset into a point index
    pub const fn point_divisor(self) -> i32 {
        match self {
            Self::V25 => 4,
            Self::V26 | Self::V27 => 12,
        }
    }
}

/// ARCH3D record header (64 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct Arch3dHeader {
    /// Version tag (`v2.5`, `v2.6`, `v2.7`)
    pub version: [u8; 4],
    /// Number of points in the point list
    pub point_count: i32,
    /// Number of planes (and normals)
    pub plane_count: i32,
    /// Bounding radius
    pub radius: i32,
    /// Always zero
    pub null1: u64,
    /// Offset of the per-plane data block
    pub plane_data_offset: i32,
    /// Offset of the object data block
    pub object_data_offset: i32,
    /// Number of object data entries
    pub object_data_count: i32,
    /// Unknown
    pub unknown2: i32,
    /// Always zero
    pub null2: u64,
    /// Offset of the point list
    pub point_list_offset: i32,
    /// Offset of the normal list
    pub normal_list_offset: i32,
    /// Unknown
    pub unknown3: i32,
    /// Offset of the plane list
    pub plane_list_offset: i32,
}

/// Plane header preceding each plane's point list (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PlaneHeader {
    /// Number of points in the plane
    pub point_count: u8,
    /// Unknown
    pub unknown1: u8,
    /// Packed texture reference (`archive << 7 | record`)
    pub texture: u16,
    /// Unknown
    pub unknown2: u32,
}

/// One point of a plane (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PlanePoint {
    /// Byte offset of the point within the point list
    pub point_offset: i32,
    /// Texture U coordinate
    pub u: i16,
    /// Texture V coordinate
    pub v: i16,
}

/// Texture referenced by a plane
///
/// This is a back-reference into a `TEXTURE.nnn` bank, resolved on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureRef {
    /// Texture bank number (`TEXTURE.nnn`)
    pub archive: u16,
    /// Record within the bank
    pub record: u8,
}

impl TextureRef {
    /// Unpack a plane texture word
    pub const fn from_packed(texture: u16) -> Self {
        Self {
            archive: texture >> 7,
            record: (texture & 0x7f) as u8,
        }
    }

    /// Pack into a plane texture word
    pub const fn to_packed(self) -> u16 {
        (self.archive << 7) | (self.record as u16 & 0x7f)
    }
}
