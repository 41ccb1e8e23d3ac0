//! `MAPS.BSA` record decoding
//!
//! Region `r` owns four name-directory records, each with a 3-digit suffix:
//!
//! | record | content |
//! |--------|---------|
//! | `MAPNAMES.r` | u32 count, count × 32-byte location names |
//! | `MAPTABLE.r` | count × 17-byte map table entries |
//! | `MAPPITEM.r` | count × u32 offsets, then location elements |
//! | `MAPDITEM.r` | u32 count, count × 8-byte offsets, then dungeons |
//!
//! MAPPITEM offsets are relative to the end of the offset table. MAPDITEM
//! entries carry the location id of the exterior they belong to, which is
//! how a location finds its dungeon.
//!
//! Every query decodes from the archive afresh; nothing is cached.

mod dungeon;
mod element;
mod error;
mod file;
mod region;
mod table;

pub use dungeon::{
    BLOCK_PREFIXES, DUNGEON_BLOCK_SIZE, DUNGEON_HEADER_SIZE, DUNGEON_OFFSET_SIZE, Dungeon,
    DungeonBlock, DungeonHeader, DungeonOffset, RawDungeonBlock, block_name,
};
pub use element::{
    DOOR_SIZE, ELEMENT_HEADER_SIZE, LOCATION_NAME_LENGTH, LocationDoor, LocationElement,
    LocationElementHeader, POST_RECORD_SIZE,
};
pub use error::{MapError, Result};
pub use file::{FILE_NAME, Location, MapsFile};
pub use region::{
    MAP_NAME_LENGTH, REGION_NAMES, Region, parse_map_names, parse_map_table, region_name,
    region_record_name,
};
pub use table::{LocationType, MAP_TABLE_ENTRY_SIZE, MapTableEntry};
