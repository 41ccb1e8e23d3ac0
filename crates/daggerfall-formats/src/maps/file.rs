//! `MAPS.BSA` region and location queries

use crate::bsa::{BsaArchive, BsaError, DirectoryType, LoadStrategy, UsageMode};
use crate::maps::dungeon::{DUNGEON_OFFSET_SIZE, Dungeon, DungeonOffset};
use crate::maps::element::LocationElement;
use crate::maps::error::{MapError, Result};
use crate::maps::region::{
    Region, parse_map_names, parse_map_table, read_u32, region_name, region_record_name, require,
};
use crate::maps::table::MapTableEntry;
use binrw::BinRead;
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

/// Conventional file name of the maps archive
pub const FILE_NAME: &str = "MAPS.BSA";

/// Records stored per region
const RECORDS_PER_REGION: usize = 4;

/// A fully decoded location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Region the location belongs to
    pub region_index: usize,
    /// Index within the region
    pub location_index: usize,
    /// Location name from MAPNAMES
    pub name: String,
    /// Display name of the region
    pub region_name: String,
    /// Map table entry
    pub map_table: MapTableEntry,
    /// Exterior element from MAPPITEM
    pub element: LocationElement,
    /// Dungeon whose exterior location id matches this location
    pub dungeon: Option<Dungeon>,
}

impl Location {
    /// True when a dungeon is attached
    pub fn has_dungeon(&self) -> bool {
        self.dungeon.is_some()
    }
}

/// Maps archive reader
#[derive(Debug)]
pub struct MapsFile {
    archive: BsaArchive,
}

impl MapsFile {
    /// Wrap an opened archive
    pub fn new(archive: BsaArchive) -> Self {
        if archive.directory_type() != DirectoryType::Name {
            warn!(
                "MAPS archive uses a {:?} directory; region records will not resolve",
                archive.directory_type()
            );
        }
        if archive.record_count() % RECORDS_PER_REGION != 0 {
            warn!(
                "MAPS archive has {} records, not a multiple of {}",
                archive.record_count(),
                RECORDS_PER_REGION
            );
        }
        Self { archive }
    }

    /// Open `MAPS.BSA` from disk
    pub fn open<P: AsRef<Path>>(path: P, usage: UsageMode, strategy: LoadStrategy) -> Result<Self> {
        Ok(Self::new(BsaArchive::open(path, usage, strategy)?))
    }

    /// Underlying archive
    pub fn archive(&self) -> &BsaArchive {
        &self.archive
    }

    /// Number of regions
    pub fn region_count(&self) -> usize {
        self.archive.record_count() / RECORDS_PER_REGION
    }

    fn check_region(&self, region: usize) -> Result<()> {
        let count = self.region_count();
        if region >= count {
            return Err(MapError::RegionOutOfRange {
                index: region,
                count,
            });
        }
        Ok(())
    }

    fn region_record(&self, prefix: &str, region: usize) -> Result<(String, Cow<'_, [u8]>)> {
        let name = region_record_name(prefix, region);
        let index = self
            .archive
            .index_of_name(&name)
            .ok_or_else(|| BsaError::RecordNotFound(name.clone()))?;
        Ok((name, self.archive.record_bytes(index)?))
    }

    /// Decode region `region`: location names and map table
    pub fn region(&self, region: usize) -> Result<Region> {
        self.check_region(region)?;

        let (names_record, names_data) = self.region_record("MAPNAMES", region)?;
        let location_names = parse_map_names(&names_record, &names_data)?;

        let (table_record, table_data) = self.region_record("MAPTABLE", region)?;
        let map_table = parse_map_table(&table_record, &table_data, location_names.len())?;

        debug!(
            "Decoded region {} ({}): {} locations",
            region,
            region_name(region),
            location_names.len()
        );

        Ok(Region {
            index: region,
            name: region_name(region),
            location_names,
            map_table,
        })
    }

    /// Decode location `location` of region `region`
    pub fn location(&self, region: usize, location: usize) -> Result<Location> {
        let decoded = self.region(region)?;
        self.location_in(&decoded, location)
    }

    /// Find a location by name within a region, ignoring ASCII case
    pub fn find_location(&self, region: usize, name: &str) -> Result<Option<Location>> {
        let decoded = self.region(region)?;
        decoded
            .index_of_location(name)
            .map(|index| self.location_in(&decoded, index))
            .transpose()
    }

    fn location_in(&self, region: &Region, location: usize) -> Result<Location> {
        let count = region.location_count();
        if location >= count {
            return Err(MapError::LocationOutOfRange {
                region: region.index,
                index: location,
                count,
            });
        }

        let element = self.read_element(region.index, location, count)?;
        let dungeon = self.find_dungeon(region.index, element.header.location_id)?;

        Ok(Location {
            region_index: region.index,
            location_index: location,
            name: region.location_names[location].clone(),
            region_name: region.name.clone(),
            map_table: region.map_table[location],
            element,
            dungeon,
        })
    }

    fn read_element(&self, region: usize, location: usize, count: usize) -> Result<LocationElement> {
        let (record, data) = self.region_record("MAPPITEM", region)?;

        let table_len = count * 4;
        require(&record, &data, table_len)?;
        let position = table_len + read_u32(&record, &data, location * 4)? as usize;
        require(&record, &data, position)?;

        let mut cursor = Cursor::new(&data[position..]);
        Ok(LocationElement::read_le(&mut cursor)?)
    }

    fn find_dungeon(&self, region: usize, location_id: u16) -> Result<Option<Dungeon>> {
        let (record, data) = self.region_record("MAPDITEM", region)?;
        if data.is_empty() {
            return Ok(None);
        }

        let count = read_u32(&record, &data, 0)? as usize;
        let table_end = 4 + count * DUNGEON_OFFSET_SIZE;
        require(&record, &data, table_end)?;

        let mut cursor = Cursor::new(&data[4..table_end]);
        for _ in 0..count {
            let entry = DungeonOffset::read(&mut cursor)?;
            if entry.exterior_location_id != location_id {
                continue;
            }

            let position = table_end + entry.offset as usize;
            require(&record, &data, position)?;
            let dungeon = Dungeon::read_le(&mut Cursor::new(&data[position..]))?;
            debug!(
                "Location id {} has dungeon with {} blocks",
                location_id,
                dungeon.blocks.len()
            );
            return Ok(Some(dungeon));
        }
        Ok(None)
    }
}
