//! MAPTABLE entries: per-location map position and type

use binrw::{BinRead, BinWrite};

/// Size of a MAPTABLE entry in bytes
pub const MAP_TABLE_ENTRY_SIZE: usize = 17;

const LONGITUDE_MASK: u32 = 0x1_FFFF;
const TYPE_SHIFT: u32 = 17;
const TYPE_MASK: u32 = 0x1F;
const DISCOVERED_FLAG: u32 = 0x40_0000;
const HIDDEN_FLAG: u32 = 0x80_0000;
const MAP_ID_MASK: u32 = 0xF_FFFF;

/// Kind of location, packed into the MAPTABLE longitude word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationType {
    /// City
    TownCity,
    /// Hamlet
    TownHamlet,
    /// Village
    TownVillage,
    /// Farmstead
    HomeFarms,
    /// Large dungeon
    DungeonLabyrinth,
    /// Temple
    ReligionTemple,
    /// Tavern
    Tavern,
    /// Medium dungeon
    DungeonKeep,
    /// Wealthy home
    HomeWealthy,
    /// Cult
    ReligionCult,
    /// Small dungeon
    DungeonRuin,
    /// Poor home
    HomePoor,
    /// Graveyard
    Graveyard,
    /// Witch coven
    Coven,
    /// Player ship
    HomeYourShips,
    /// Value without a known meaning
    Unknown(u8),
}

impl LocationType {
    /// Decode the 5-bit type value
    pub const fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::TownCity,
            1 => Self::TownHamlet,
            2 => Self::TownVillage,
            3 => Self::HomeFarms,
            4 => Self::DungeonLabyrinth,
            5 => Self::ReligionTemple,
            6 => Self::Tavern,
            7 => Self::DungeonKeep,
            8 => Self::HomeWealthy,
            9 => Self::ReligionCult,
            10 => Self::DungeonRuin,
            11 => Self::HomePoor,
            12 => Self::Graveyard,
            13 => Self::Coven,
            14 => Self::HomeYourShips,
            other => Self::Unknown(other),
        }
    }

    /// The 5-bit type value
    pub const fn to_raw(self) -> u8 {
        match self {
            Self::TownCity => 0,
            Self::TownHamlet => 1,
            Self::TownVillage => 2,
            Self::HomeFarms => 3,
            Self::DungeonLabyrinth => 4,
            Self::ReligionTemple => 5,
            Self::Tavern => 6,
            Self::DungeonKeep => 7,
            Self::HomeWealthy => 8,
            Self::ReligionCult => 9,
            Self::DungeonRuin => 10,
            Self::HomePoor => 11,
            Self::Graveyard => 12,
            Self::Coven => 13,
            Self::HomeYourShips => 14,
            Self::Unknown(value) => value,
        }
    }

    /// True for the three dungeon sizes
    pub const fn is_dungeon(self) -> bool {
        matches!(
            self,
            Self::DungeonLabyrinth | Self::DungeonKeep | Self::DungeonRuin
        )
    }
}

/// One MAPTABLE entry (17 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct MapTableEntry {
    /// Raw map id word; the id is the low 20 bits
    pub raw_map_id: i32,
    /// Unknown
    pub unknown1: u8,
    /// Packed longitude, location type and flags
    pub longitude_type: u32,
    /// Latitude
    pub latitude: u16,
    /// Unknown
    pub unknown2: u16,
    /// Unknown
    pub unknown3: u32,
}

impl MapTableEntry {
    /// Pack an entry from its decoded parts
    pub fn new(
        map_id: u32,
        longitude: u32,
        latitude: u16,
        location_type: LocationType,
        discovered: bool,
        hidden: bool,
    ) -> Self {
        let mut longitude_type = (longitude & LONGITUDE_MASK)
            | ((u32::from(location_type.to_raw()) & TYPE_MASK) << TYPE_SHIFT);
        if discovered {
            longitude_type |= DISCOVERED_FLAG;
        }
        if hidden {
            longitude_type |= HIDDEN_FLAG;
        }
        Self {
            raw_map_id: (map_id & MAP_ID_MASK) as i32,
            unknown1: 0,
            longitude_type,
            latitude,
            unknown2: 0,
            unknown3: 0,
        }
    }

    /// Map id (low 20 bits)
    pub fn map_id(&self) -> u32 {
        self.raw_map_id as u32 & MAP_ID_MASK
    }

    /// Longitude in map pixels
    pub fn longitude(&self) -> u32 {
        self.longitude_type & LONGITUDE_MASK
    }

    /// Location kind
    pub fn location_type(&self) -> LocationType {
        LocationType::from_raw(((self.longitude_type >> TYPE_SHIFT) & TYPE_MASK) as u8)
    }

    /// Shown on the travel map from the start
    pub fn discovered(&self) -> bool {
        self.longitude_type & DISCOVERED_FLAG != 0
    }

    /// Hidden from the travel map
    pub fn hidden(&self) -> bool {
        self.longitude_type & HIDDEN_FLAG != 0
    }
}
