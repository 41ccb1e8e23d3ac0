//! Region records: MAPNAMES and MAPTABLE

use crate::fixed_str;
use crate::maps::error::{MapError, Result};
use crate::maps::table::{MAP_TABLE_ENTRY_SIZE, MapTableEntry};
use binrw::BinRead;
use std::io::Cursor;

/// Length of a MAPNAMES entry
pub const MAP_NAME_LENGTH: usize = 32;

/// Region names in record order
pub const REGION_NAMES: [&str; 62] = [
    "Alik'r Desert",
    "Dragontail Mountains",
    "Glenpoint Foothills",
    "Daggerfall Bluffs",
    "Yeorth Burrowland",
    "Dwynnen",
    "Ravennian Forest",
    "Devilrock",
    "Malekna Forest",
    "Isle of Balfiera",
    "Bantha",
    "Dak'fron",
    "Islands in the Western Iliac Bay",
    "Tamarilyn Point",
    "Lainlyn Cliffs",
    "Bjoulsae River",
    "Wrothgarian Mountains",
    "Daggerfall",
    "Glenpoint",
    "Betony",
    "Sentinel",
    "Anticlere",
    "Lainlyn",
    "Wayrest",
    "Gen Tem High Rock village",
    "Gen Rai Hammerfell village",
    "Orsinium Area",
    "Skeffington Wood",
    "Hammerfell bay coast",
    "Hammerfell sea coast",
    "High Rock bay coast",
    "High Rock sea coast",
    "Northmoor",
    "Menevia",
    "Alcaire",
    "Koegria",
    "Bhoriane",
    "Kambria",
    "Phrygias",
    "Urvaius",
    "Ykalon",
    "Daenia",
    "Shalgora",
    "Abibon-Gora",
    "Kairou",
    "Pothago",
    "Myrkwasa",
    "Ayasofya",
    "Tigonus",
    "Kozanset",
    "Satakalaam",
    "Totambu",
    "Mournoth",
    "Ephesus",
    "Santaki",
    "Antiphyllos",
    "Bergama",
    "Gavaudon",
    "Tulune",
    "Glenumbra Moors",
    "Ilessan Hills",
    "Cybiades",
];

/// Display name of region `index`
pub fn region_name(index: usize) -> String {
    REGION_NAMES
        .get(index)
        .map_or_else(|| format!("Region {index:03}"), |name| (*name).to_string())
}

/// Record name for one of a region's four records, e.g. `MAPNAMES.017`
pub fn region_record_name(prefix: &str, region: usize) -> String {
    format!("{prefix}.{region:03}")
}

/// A region's location names and map table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Region index
    pub index: usize,
    /// Region display name
    pub name: String,
    /// Location names in location order
    pub location_names: Vec<String>,
    /// Map table entries in location order
    pub map_table: Vec<MapTableEntry>,
}

impl Region {
    /// Number of locations in the region
    pub fn location_count(&self) -> usize {
        self.location_names.len()
    }

    /// Index of the location called `name`, ignoring ASCII case
    pub fn index_of_location(&self, name: &str) -> Option<usize> {
        self.location_names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
    }
}

pub(crate) fn read_u32(record: &str, data: &[u8], offset: usize) -> Result<u32> {
    let end = offset + 4;
    let bytes = data.get(offset..end).ok_or_else(|| MapError::Truncated {
        record: record.to_string(),
        expected: end,
        actual: data.len(),
    })?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(crate) fn require(record: &str, data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(MapError::Truncated {
            record: record.to_string(),
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Parse a MAPNAMES record: u32 count followed by 32-byte names
pub fn parse_map_names(record: &str, data: &[u8]) -> Result<Vec<String>> {
    let count = read_u32(record, data, 0)? as usize;
    require(record, data, 4 + count * MAP_NAME_LENGTH)?;

    Ok(data[4..4 + count * MAP_NAME_LENGTH]
        .chunks_exact(MAP_NAME_LENGTH)
        .map(fixed_str)
        .collect())
}

/// Parse `count` MAPTABLE entries
pub fn parse_map_table(record: &str, data: &[u8], count: usize) -> Result<Vec<MapTableEntry>> {
    require(record, data, count * MAP_TABLE_ENTRY_SIZE)?;

    let mut cursor = Cursor::new(data);
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(MapTableEntry::read(&mut cursor)?);
    }
    Ok(entries)
}
