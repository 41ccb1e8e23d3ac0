//! Location record element shared by MAPPITEM and MAPDITEM
//!
//! Layout: u32 door count, doors (6 bytes each), a fixed 93-byte header that
//! ends with the post-record count, then post records (6 bytes each).

use crate::{fixed_str, pad_str};
use binrw::{BinRead, BinResult, BinWrite};
use std::io::{Read, Seek, Write};

/// Size of a door entry in bytes
pub const DOOR_SIZE: usize = 6;

/// Size of the fixed element header in bytes
pub const ELEMENT_HEADER_SIZE: usize = 93;

/// Size of a post record in bytes
pub const POST_RECORD_SIZE: usize = 6;

/// Length of the location name field
pub const LOCATION_NAME_LENGTH: usize = 32;

/// Door linking a location to one of its buildings (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct LocationDoor {
    /// Index into the location's building data
    pub building_data_index: u16,
    /// Always zero
    pub null: u8,
    /// Door mask
    pub mask: u8,
    /// Unknown
    pub unknown1: u8,
    /// Unknown
    pub unknown2: u8,
}

/// Fixed part of a location element (93 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct LocationElementHeader {
    /// Always 1
    pub always_one1: u32,
    /// Always zero
    pub null1: u16,
    /// Always zero
    pub null2: u8,
    /// World X coordinate
    pub x: i32,
    /// Always zero
    pub null3: u32,
    /// World Y coordinate
    pub y: i32,
    /// Non-zero for exterior elements
    pub is_exterior: u16,
    /// Always zero
    pub null4: u16,
    /// Unknown
    pub unknown1: u32,
    /// Unknown
    pub unknown2: u32,
    /// Always 1
    pub always_one2: u16,
    /// Location id linking exteriors to their dungeons
    pub location_id: u16,
    /// Always zero
    pub null5: u32,
    /// Unknown
    pub unknown3: u16,
    /// Unknown
    pub unknown4: u32,
    /// Always zero
    pub null6: [u8; 5],
    /// NUL-padded location name
    pub name: [u8; LOCATION_NAME_LENGTH],
    /// Unknown
    pub unknown5: [u8; 9],
    /// Number of post records following the header
    pub post_record_count: u16,
}

impl LocationElementHeader {
    /// Header with the given identity and coordinates
    pub fn new(name: &str, location_id: u16, x: i32, y: i32, is_exterior: bool) -> Self {
        Self {
            always_one1: 1,
            null1: 0,
            null2: 0,
            x,
            null3: 0,
            y,
            is_exterior: u16::from(is_exterior),
            null4: 0,
            unknown1: 0,
            unknown2: 0,
            always_one2: 1,
            location_id,
            null5: 0,
            unknown3: 0,
            unknown4: 0,
            null6: [0; 5],
            name: pad_str(name),
            unknown5: [0; 9],
            post_record_count: 0,
        }
    }

    /// Location name without padding
    pub fn name(&self) -> String {
        fixed_str(&self.name)
    }
}

/// Complete location element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationElement {
    /// Doors of the location's buildings
    pub doors: Vec<LocationDoor>,
    /// Fixed header
    pub header: LocationElementHeader,
    /// Opaque post records
    pub post_records: Vec<[u8; POST_RECORD_SIZE]>,
}

impl LocationElement {
    /// Element with no doors or post records
    pub fn new(header: LocationElementHeader) -> Self {
        Self {
            doors: Vec::new(),
            header,
            post_records: Vec::new(),
        }
    }

    /// Serialized size in bytes
    pub fn serialized_size(&self) -> usize {
        4 + self.doors.len() * DOOR_SIZE
            + ELEMENT_HEADER_SIZE
            + self.post_records.len() * POST_RECORD_SIZE
    }
}

impl BinRead for LocationElement {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let door_count = u32::read_le(reader)?;
        let mut doors = Vec::new();
        for _ in 0..door_count {
            doors.push(LocationDoor::read(reader)?);
        }

        let header = LocationElementHeader::read(reader)?;

        let mut post_records = Vec::with_capacity(header.post_record_count as usize);
        for _ in 0..header.post_record_count {
            post_records.push(<[u8; POST_RECORD_SIZE]>::read_le(reader)?);
        }

        Ok(Self {
            doors,
            header,
            post_records,
        })
    }
}

impl BinWrite for LocationElement {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        (self.doors.len() as u32).write_le(writer)?;
        for door in &self.doors {
            door.write(writer)?;
        }

        // Keep the count consistent with the records actually written.
        let mut header = self.header.clone();
        header.post_record_count = self.post_records.len() as u16;
        header.write(writer)?;

        for record in &self.post_records {
            writer.write_all(record)?;
        }
        Ok(())
    }
}
