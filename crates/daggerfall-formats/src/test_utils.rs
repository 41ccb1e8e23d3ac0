//! Test utilities for building synthetic ARENA2 records
//!
//! Each fixture serializes the same layouts the decoders read, so tests can
//! describe content structurally and tamper with the bytes afterwards.

use crate::bsa::{BsaBuilder, DirectoryType};
use crate::maps::{
    DUNGEON_OFFSET_SIZE, Dungeon, DungeonBlock, DungeonHeader, LocationElement,
    LocationElementHeader, LocationType, MapTableEntry, RawDungeonBlock, region_record_name,
};
use crate::mesh::{Arch3dHeader, HEADER_SIZE, PlaneHeader, PlanePoint, TextureRef, VECTOR_SIZE};
use crate::pad_str;
use crate::texture::{
    FILE_HEADER_SIZE, RECORD_HEADER_SIZE, RECORD_TABLE_ENTRY_SIZE, ROW_STRIDE, RecordTableEntry,
    TextureFileHeader, TextureRecordHeader,
};
use binrw::BinWrite;
use binrw::io::Cursor;

/// One plane of a [`MeshFixture`]
pub struct PlaneFixture {
    pub texture: TextureRef,
    pub normal: [i32; 3],
    /// (point index, u, v)
    pub points: Vec<(usize, i16, i16)>,
}

/// ARCH3D record description
pub struct MeshFixture {
    pub version: [u8; 4],
    pub radius: i32,
    pub points: Vec<[i32; 3]>,
    pub planes: Vec<PlaneFixture>,
}

impl MeshFixture {
    /// Serialize: header, point list, normal list, plane list
    pub fn build(&self) -> Vec<u8> {
        let divisor = if &self.version == b"v2.5" { 4 } else { 12 };
        let point_list_offset = HEADER_SIZE;
        let normal_list_offset = point_list_offset + self.points.len() * VECTOR_SIZE;
        let plane_list_offset = normal_list_offset + self.planes.len() * VECTOR_SIZE;

        let header = Arch3dHeader {
            version: self.version,
            point_count: self.points.len() as i32,
            plane_count: self.planes.len() as i32,
            radius: self.radius,
            null1: 0,
            plane_data_offset: 0,
            object_data_offset: 0,
            object_data_count: 0,
            unknown2: 0,
            null2: 0,
            point_list_offset: point_list_offset as i32,
            normal_list_offset: normal_list_offset as i32,
            unknown3: 0,
            plane_list_offset: plane_list_offset as i32,
        };

        let mut cursor = Cursor::new(Vec::new());
        header.write(&mut cursor).unwrap();
        for point in &self.points {
            point.write_le(&mut cursor).unwrap();
        }
        for plane in &self.planes {
            plane.normal.write_le(&mut cursor).unwrap();
        }
        for plane in &self.planes {
            PlaneHeader {
                point_count: plane.points.len() as u8,
                unknown1: 0,
                texture: plane.texture.to_packed(),
                unknown2: 0,
            }
            .write(&mut cursor)
            .unwrap();
            for &(index, u, v) in &plane.points {
                PlanePoint {
                    point_offset: index as i32 * divisor,
                    u,
                    v,
                }
                .write(&mut cursor)
                .unwrap();
            }
        }
        cursor.into_inner()
    }
}

/// A small valid v2.7 mesh: one textured triangle
pub fn sample_mesh() -> Vec<u8> {
    MeshFixture {
        version: *b"v2.7",
        radius: 100,
        points: vec![[0, 0, 0], [10, 0, 0], [0, 10, 0]],
        planes: vec![PlaneFixture {
            texture: TextureRef {
                archive: 2,
                record: 1,
            },
            normal: [0, 0, 256],
            points: vec![(0, 0, 0), (1, 16, 0), (2, 0, 16)],
        }],
    }
    .build()
}

/// One location of a [`MapsFixture`] region
pub struct LocationFixture {
    name: String,
    location_id: u16,
    location_type: LocationType,
    dungeon: Option<Vec<(i8, i8, u16, bool, u8)>>,
}

impl LocationFixture {
    pub fn new(name: &str, location_id: u16, location_type: LocationType) -> Self {
        Self {
            name: name.to_string(),
            location_id,
            location_type,
            dungeon: None,
        }
    }

    /// Attach a dungeon given as (x, z, block number, starting, prefix index)
    pub fn with_dungeon(mut self, blocks: Vec<(i8, i8, u16, bool, u8)>) -> Self {
        self.dungeon = Some(blocks);
        self
    }
}

/// `MAPS.BSA` description, one entry per region
#[derive(Default)]
pub struct MapsFixture {
    regions: Vec<Vec<LocationFixture>>,
    truncate_items: usize,
}

impl MapsFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, locations: Vec<LocationFixture>) -> Self {
        self.regions.push(locations);
        self
    }

    /// Cut bytes off the end of every MAPPITEM record
    pub fn truncate_items(mut self, bytes: usize) -> Self {
        self.truncate_items = bytes;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut builder = BsaBuilder::new(DirectoryType::Name);
        for (index, locations) in self.regions.iter().enumerate() {
            let mut items = self.items(locations);
            items.truncate(items.len().saturating_sub(self.truncate_items));
            builder = builder
                .add_named(&region_record_name("MAPPITEM", index), items)
                .add_named(&region_record_name("MAPDITEM", index), dungeons(locations))
                .add_named(&region_record_name("MAPTABLE", index), table(locations))
                .add_named(&region_record_name("MAPNAMES", index), names(locations));
        }
        builder.build().unwrap()
    }

    fn items(&self, locations: &[LocationFixture]) -> Vec<u8> {
        let mut offsets = Vec::new();
        let mut elements = Cursor::new(Vec::new());
        for location in locations {
            offsets.extend_from_slice(&(elements.get_ref().len() as u32).to_le_bytes());
            LocationElement::new(LocationElementHeader::new(
                &location.name,
                location.location_id,
                i32::from(location.location_id) * 100,
                -i32::from(location.location_id) * 100,
                true,
            ))
            .write_le(&mut elements)
            .unwrap();
        }
        offsets.extend_from_slice(elements.get_ref());
        offsets
    }
}

fn dungeons(locations: &[LocationFixture]) -> Vec<u8> {
    let with_dungeons: Vec<_> = locations
        .iter()
        .filter_map(|l| l.dungeon.as_ref().map(|blocks| (l, blocks)))
        .collect();

    let mut table = (with_dungeons.len() as u32).to_le_bytes().to_vec();
    let mut body = Cursor::new(Vec::new());
    for (location, blocks) in with_dungeons {
        table.extend_from_slice(&(body.get_ref().len() as u32).to_le_bytes());
        table.extend_from_slice(&1u16.to_le_bytes());
        table.extend_from_slice(&location.location_id.to_le_bytes());

        Dungeon {
            element: LocationElement::new(LocationElementHeader::new(
                &location.name,
                location.location_id,
                0,
                0,
                false,
            )),
            header: DungeonHeader {
                null1: 0,
                unknown1: 0,
                unknown2: 0,
                block_count: 0,
                unknown3: [0; 5],
            },
            blocks: blocks
                .iter()
                .map(|&(x, z, number, starting, prefix)| {
                    DungeonBlock::from(RawDungeonBlock::new(x, z, number, starting, prefix))
                })
                .collect(),
        }
        .write_le(&mut body)
        .unwrap();
    }
    assert_eq!(table.len(), 4 + DUNGEON_OFFSET_SIZE * (table.len() / DUNGEON_OFFSET_SIZE));
    table.extend_from_slice(body.get_ref());
    table
}

fn table(locations: &[LocationFixture]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    for (i, location) in locations.iter().enumerate() {
        MapTableEntry::new(
            i as u32,
            1000 + i as u32,
            2000,
            location.location_type,
            true,
            false,
        )
        .write(&mut cursor)
        .unwrap();
    }
    cursor.into_inner()
}

fn names(locations: &[LocationFixture]) -> Vec<u8> {
    let mut data = (locations.len() as u32).to_le_bytes().to_vec();
    for location in locations {
        data.extend_from_slice(&pad_str::<32>(&location.name));
    }
    data
}

/// `TEXTURE.nnn` description
pub struct TextureFixture {
    name: String,
    /// (compression, frame count, width, height, data)
    records: Vec<(u16, u16, i16, i16, Vec<u8>)>,
}

impl TextureFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            records: Vec::new(),
        }
    }

    /// Uncompressed single frame; rows are laid out on the fixed stride
    pub fn image(self, width: usize, height: usize, pixels: Vec<u8>) -> Self {
        let mut data = vec![0u8; height * ROW_STRIDE];
        for (row, chunk) in pixels.chunks(width).enumerate() {
            data[row * ROW_STRIDE..row * ROW_STRIDE + chunk.len()].copy_from_slice(chunk);
        }
        self.raw_record(0, 1, width as i16, height as i16, data)
    }

    pub fn raw_record(
        mut self,
        compression: u16,
        frame_count: u16,
        width: i16,
        height: i16,
        data: Vec<u8>,
    ) -> Self {
        self.records
            .push((compression, frame_count, width, height, data));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        TextureFileHeader {
            record_count: self.records.len() as i16,
            name: pad_str(&self.name),
        }
        .write(&mut cursor)
        .unwrap();

        let mut position = FILE_HEADER_SIZE + self.records.len() * RECORD_TABLE_ENTRY_SIZE;
        for (_, _, _, _, data) in &self.records {
            RecordTableEntry {
                unknown1: 0,
                record_position: position as u32,
                unknown2: 0,
                unknown3: 0,
                null: 0,
            }
            .write(&mut cursor)
            .unwrap();
            position += RECORD_HEADER_SIZE + data.len();
        }

        for (compression, frame_count, width, height, data) in &self.records {
            TextureRecordHeader {
                offset_x: 0,
                offset_y: 0,
                width: *width,
                height: *height,
                compression: *compression,
                record_size: (RECORD_HEADER_SIZE + data.len()) as u32,
                data_offset: RECORD_HEADER_SIZE as u32,
                is_normal: 1,
                frame_count: *frame_count,
                unknown: 0,
                x_scale: 0,
                y_scale: 0,
            }
            .write(&mut cursor)
            .unwrap();
            std::io::Write::write_all(&mut cursor, data).unwrap();
        }
        cursor.into_inner()
    }
}
