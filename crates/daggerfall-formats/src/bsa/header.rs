//! BSA header and directory entry structures
//!
//! All multi-byte fields are little-endian.

use crate::bsa::error::{BsaError, BsaResult};
use crate::{fixed_str, pad_str};
use binrw::{BinRead, BinWrite};
use serde::{Deserialize, Serialize};

/// Size of the BSA header in bytes
pub const HEADER_SIZE: usize = 4;

/// Size of a name directory entry in bytes
pub const NAME_ENTRY_SIZE: usize = 18;

/// Size of a number directory entry in bytes
pub const NUMBER_ENTRY_SIZE: usize = 8;

/// Maximum length of a record name in a name directory
pub const MAX_NAME_LENGTH: usize = 12;

/// BSA file header (4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct BsaHeader {
    /// Number of records (and directory entries)
    pub record_count: u16,
    /// Raw directory type word
    pub directory_type: u16,
}

impl BsaHeader {
    /// Create a header for `record_count` records of the given directory type
    pub fn new(record_count: u16, directory_type: DirectoryType) -> Self {
        Self {
            record_count,
            directory_type: directory_type.to_raw(),
        }
    }

    /// Decode the directory type word
    pub fn kind(&self) -> BsaResult<DirectoryType> {
        DirectoryType::from_raw(self.directory_type)
    }
}

/// How records are identified in the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectoryType {
    /// Records carry a 12-character name (`BLOCKS.BSA`, `MAPS.BSA`)
    Name,
    /// Records carry a numeric id (`ARCH3D.BSA`, `DAGGER.SND`)
    Number,
}

impl DirectoryType {
    /// Parse the raw header word
    pub fn from_raw(value: u16) -> BsaResult<Self> {
        match value {
            0x0100 => Ok(Self::Name),
            0x0200 => Ok(Self::Number),
            other => Err(BsaError::UnknownDirectoryType(other)),
        }
    }

    /// Raw header word
    pub const fn to_raw(self) -> u16 {
        match self {
            Self::Name => 0x0100,
            Self::Number => 0x0200,
        }
    }

    /// Size of one directory entry of this type
    pub const fn entry_size(self) -> usize {
        match self {
            Self::Name => NAME_ENTRY_SIZE,
            Self::Number => NUMBER_ENTRY_SIZE,
        }
    }
}

/// Name directory entry (18 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct NameEntry {
    /// NUL-padded record name
    pub name: [u8; MAX_NAME_LENGTH],
    /// Compression flag (always zero in shipped data)
    pub compressed: u16,
    /// Record size in bytes
    pub size: u32,
}

impl NameEntry {
    /// Create a name entry; names longer than 12 bytes are truncated
    pub fn new(name: &str, size: u32) -> Self {
        Self {
            name: pad_str(name),
            compressed: 0,
            size,
        }
    }

    /// Record name without padding
    pub fn name(&self) -> String {
        fixed_str(&self.name)
    }
}

/// Number directory entry (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct NumberEntry {
    /// Record identifier
    pub id: u32,
    /// Record size in bytes
    pub size: u32,
}

/// Directory entry of either kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEntry {
    /// Named record
    Name(NameEntry),
    /// Numbered record
    Number(NumberEntry),
}

impl DirectoryEntry {
    /// Record size in bytes
    pub fn size(&self) -> u32 {
        match self {
            Self::Name(e) => e.size,
            Self::Number(e) => e.size,
        }
    }

    /// Record name; number records use the decimal id
    pub fn name(&self) -> String {
        match self {
            Self::Name(e) => e.name(),
            Self::Number(e) => e.id.to_string(),
        }
    }

    /// Record id for number records
    pub fn id(&self) -> Option<u32> {
        match self {
            Self::Name(_) => None,
            Self::Number(e) => Some(e.id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    #[test]
    fn test_header_layout() {
        let data = [0x03, 0x00, 0x00, 0x02];
        let header = BsaHeader::read(&mut Cursor::new(&data)).expect("Should parse header");
        assert_eq!(header.record_count, 3);
        assert_eq!(header.kind().expect("known type"), DirectoryType::Number);
    }

    #[test]
    fn test_unknown_directory_type() {
        let header = BsaHeader {
            record_count: 1,
            directory_type: 0x0300,
        };
        assert!(matches!(
            header.kind(),
            Err(BsaError::UnknownDirectoryType(0x0300))
        ));
    }

    #[test]
    fn test_name_entry_size() {
        let entry = NameEntry::new("MAPNAMES.000", 1234);
        let mut cursor = Cursor::new(Vec::new());
        entry.write(&mut cursor).expect("Should write entry");
        let bytes = cursor.into_inner();
        assert_eq!(bytes.len(), NAME_ENTRY_SIZE);
        assert_eq!(&bytes[..12], b"MAPNAMES.000");
        assert_eq!(&bytes[14..18], &1234u32.to_le_bytes());
    }

    #[test]
    fn test_number_entry_size() {
        let entry = NumberEntry { id: 42, size: 9 };
        let mut cursor = Cursor::new(Vec::new());
        entry.write(&mut cursor).expect("Should write entry");
        assert_eq!(cursor.into_inner().len(), NUMBER_ENTRY_SIZE);
    }

    #[test]
    fn test_directory_entry_names() {
        let named = DirectoryEntry::Name(NameEntry::new("N0000001.RDB", 1));
        assert_eq!(named.name(), "N0000001.RDB");
        assert_eq!(named.id(), None);

        let numbered = DirectoryEntry::Number(NumberEntry { id: 456, size: 1 });
        assert_eq!(numbered.name(), "456");
        assert_eq!(numbered.id(), Some(456));
    }
}
