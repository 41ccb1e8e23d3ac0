//! MAPDITEM dungeon records

use crate::maps::element::LocationElement;
use binrw::{BinRead, BinResult, BinWrite};
use std::io::{Read, Seek, Write};

/// Size of a MAPDITEM offset table entry in bytes
pub const DUNGEON_OFFSET_SIZE: usize = 8;

/// Size of the dungeon header in bytes
pub const DUNGEON_HEADER_SIZE: usize = 17;

/// Size of a dungeon block entry in bytes
pub const DUNGEON_BLOCK_SIZE: usize = 4;

const BLOCK_NUMBER_MASK: u16 = 0x3FF;
const STARTING_BLOCK_FLAG: u16 = 0x400;
const BLOCK_INDEX_SHIFT: u16 = 11;

/// Block file prefixes selected by the block index bits
pub const BLOCK_PREFIXES: [&str; 6] = ["N", "W", "L", "S", "B", "M"];

/// MAPDITEM offset table entry (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct DungeonOffset {
    /// Offset of the dungeon from the end of the offset table
    pub offset: u32,
    /// Non-zero for dungeon entries
    pub is_dungeon: u16,
    /// Location id of the exterior this dungeon belongs to
    pub exterior_location_id: u16,
}

/// Fixed dungeon header following the location element (17 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct DungeonHeader {
    /// Always zero
    pub null1: u16,
    /// Unknown
    pub unknown1: u32,
    /// Unknown
    pub unknown2: u32,
    /// Number of block entries that follow
    pub block_count: u16,
    /// Unknown
    pub unknown3: [u8; 5],
}

/// Raw 4-byte block entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct RawDungeonBlock {
    /// Grid X
    pub x: i8,
    /// Grid Z
    pub z: i8,
    /// Packed block number, starting flag and prefix index
    pub bitfield: u16,
}

impl RawDungeonBlock {
    /// Pack a block entry
    pub fn new(x: i8, z: i8, block_number: u16, is_starting_block: bool, block_index: u8) -> Self {
        let mut bitfield = (block_number & BLOCK_NUMBER_MASK)
            | (u16::from(block_index) << BLOCK_INDEX_SHIFT);
        if is_starting_block {
            bitfield |= STARTING_BLOCK_FLAG;
        }
        Self { x, z, bitfield }
    }
}

/// Decoded dungeon block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonBlock {
    /// Grid X
    pub x: i8,
    /// Grid Z
    pub z: i8,
    /// Block number (10 bits)
    pub block_number: u16,
    /// Player enters the dungeon in this block
    pub is_starting_block: bool,
    /// Prefix index (upper 5 bits)
    pub block_index: u8,
    /// `BLOCKS.BSA` record name, `None` when the prefix index is unknown
    pub block_name: Option<String>,
}

impl From<RawDungeonBlock> for DungeonBlock {
    fn from(raw: RawDungeonBlock) -> Self {
        let block_number = raw.bitfield & BLOCK_NUMBER_MASK;
        let block_index = (raw.bitfield >> BLOCK_INDEX_SHIFT) as u8;
        Self {
            x: raw.x,
            z: raw.z,
            block_number,
            is_starting_block: raw.bitfield & STARTING_BLOCK_FLAG != 0,
            block_index,
            block_name: block_name(block_index, block_number),
        }
    }
}

/// `BLOCKS.BSA` name of a dungeon block, e.g. `N0000012.RDB`
pub fn block_name(block_index: u8, block_number: u16) -> Option<String> {
    BLOCK_PREFIXES
        .get(block_index as usize)
        .map(|prefix| format!("{prefix}{block_number:07}.RDB"))
}

/// Dungeon attached to a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dungeon {
    /// Location element describing the dungeon entrance
    pub element: LocationElement,
    /// Fixed header
    pub header: DungeonHeader,
    /// Block layout
    pub blocks: Vec<DungeonBlock>,
}

impl Dungeon {
    /// Block where the player starts, if any
    pub fn starting_block(&self) -> Option<&DungeonBlock> {
        self.blocks.iter().find(|b| b.is_starting_block)
    }
}

impl BinRead for Dungeon {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let element = LocationElement::read_options(reader, endian, args)?;
        let header = DungeonHeader::read(reader)?;

        let mut blocks = Vec::with_capacity(header.block_count as usize);
        for _ in 0..header.block_count {
            blocks.push(DungeonBlock::from(RawDungeonBlock::read(reader)?));
        }

        Ok(Self {
            element,
            header,
            blocks,
        })
    }
}

impl BinWrite for Dungeon {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.element.write_options(writer, endian, args)?;

        let mut header = self.header;
        header.block_count = self.blocks.len() as u16;
        header.write(writer)?;

        for block in &self.blocks {
            RawDungeonBlock::new(
                block.x,
                block.z,
                block.block_number,
                block.is_starting_block,
                block.block_index,
            )
            .write(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::maps::element::LocationElementHeader;
    use binrw::io::Cursor;

    #[test]
    fn test_block_bitfield() {
        let block = DungeonBlock::from(RawDungeonBlock {
            x: -1,
            z: 2,
            bitfield: 0x0C00 | 0x012,
        });
        assert_eq!(block.block_number, 0x12);
        assert!(block.is_starting_block);
        assert_eq!(block.block_index, 1);
        assert_eq!(block.block_name.as_deref(), Some("W0000018.RDB"));
    }

    #[test]
    fn test_unknown_prefix_has_no_name() {
        assert_eq!(block_name(6, 1), None);
        assert_eq!(block_name(5, 999).as_deref(), Some("M0000999.RDB"));
    }

    #[test]
    fn test_dungeon_layout() {
        let header = LocationElementHeader::new("Privateer's Hold", 12, 0, 0, false);
        let dungeon = Dungeon {
            element: LocationElement::new(header),
            header: DungeonHeader {
                null1: 0,
                unknown1: 0,
                unknown2: 0,
                block_count: 0,
                unknown3: [0; 5],
            },
            blocks: vec![
                DungeonBlock::from(RawDungeonBlock::new(0, 0, 5, true, 0)),
                DungeonBlock::from(RawDungeonBlock::new(1, 0, 700, false, 4)),
            ],
        };

        let mut cursor = Cursor::new(Vec::new());
        dungeon.write_le(&mut cursor).unwrap();
        let bytes = cursor.into_inner();
        assert_eq!(
            bytes.len(),
            dungeon.element.serialized_size() + DUNGEON_HEADER_SIZE + 2 * DUNGEON_BLOCK_SIZE
        );

        let parsed = Dungeon::read_le(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(parsed.header.block_count, 2);
        assert_eq!(parsed.blocks, dungeon.blocks);
        assert_eq!(
            parsed.starting_block().and_then(|b| b.block_name.as_deref()),
            Some("N0000005.RDB")
        );
    }
}
