//! `BLOCKS.BSA` record listing
//!
//! `BLOCKS.BSA` is a name-directory BSA. The record extension tells what a
//! block holds: `.RMB` city and wilderness exteriors, `.RDB` dungeon blocks
//! and `.RDI` interiors. Block contents are not decoded here; dungeon block
//! names from `MAPS.BSA` resolve against this listing.

use crate::bsa::{BsaArchive, BsaError, BsaResult, DirectoryType, LoadStrategy, UsageMode};
use std::path::Path;
use tracing::warn;

/// Conventional file name of the block archive
pub const FILE_NAME: &str = "BLOCKS.BSA";

/// Block classification by record extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// `.RMB`
    Exterior,
    /// `.RDB`
    Dungeon,
    /// `.RDI`
    Interior,
    /// Any other extension
    Unknown,
}

impl BlockKind {
    /// Classify a record name, ignoring ASCII case
    pub fn from_name(name: &str) -> Self {
        let extension = name.rsplit_once('.').map_or("", |(_, ext)| ext);
        if extension.eq_ignore_ascii_case("RMB") {
            Self::Exterior
        } else if extension.eq_ignore_ascii_case("RDB") {
            Self::Dungeon
        } else if extension.eq_ignore_ascii_case("RDI") {
            Self::Interior
        } else {
            Self::Unknown
        }
    }
}

/// One listed block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntry {
    /// Record index
    pub index: usize,
    /// Record name
    pub name: String,
    /// Classification
    pub kind: BlockKind,
    /// Record length in bytes
    pub length: usize,
}

/// Block archive reader
#[derive(Debug)]
pub struct BlocksFile {
    archive: BsaArchive,
}

impl BlocksFile {
    /// Wrap an opened archive
    pub fn new(archive: BsaArchive) -> Self {
        if archive.directory_type() != DirectoryType::Name {
            warn!(
                "BLOCKS archive uses a {:?} directory; block names will not resolve",
                archive.directory_type()
            );
        }
        Self { archive }
    }

    /// Open `BLOCKS.BSA` from disk
    pub fn open<P: AsRef<Path>>(
        path: P,
        usage: UsageMode,
        strategy: LoadStrategy,
    ) -> BsaResult<Self> {
        Ok(Self::new(BsaArchive::open(path, usage, strategy)?))
    }

    /// Underlying archive
    pub fn archive(&self) -> &BsaArchive {
        &self.archive
    }

    /// Number of blocks
    pub fn block_count(&self) -> usize {
        self.archive.record_count()
    }

    /// Block at record `index`
    pub fn block(&self, index: usize) -> BsaResult<BlockEntry> {
        let info = self.archive.record_info(index)?;
        Ok(BlockEntry {
            index,
            kind: BlockKind::from_name(&info.name),
            name: info.name,
            length: info.length,
        })
    }

    /// All blocks in directory order
    pub fn blocks(&self) -> impl Iterator<Item = BlockEntry> + '_ {
        self.archive.records().map(|info| BlockEntry {
            index: info.index,
            kind: BlockKind::from_name(&info.name),
            name: info.name,
            length: info.length,
        })
    }

    /// Blocks of one kind
    pub fn blocks_of_kind(&self, kind: BlockKind) -> impl Iterator<Item = BlockEntry> + '_ {
        self.blocks().filter(move |b| b.kind == kind)
    }

    /// Look a block up by name, ignoring ASCII case
    pub fn find(&self, name: &str) -> Option<BlockEntry> {
        self.archive
            .index_of_name(name)
            .and_then(|index| self.block(index).ok())
    }

    /// Raw bytes of the block called `name`
    pub fn block_bytes(&self, name: &str) -> BsaResult<Vec<u8>> {
        let index = self
            .archive
            .index_of_name(name)
            .ok_or_else(|| BsaError::RecordNotFound(name.to_string()))?;
        Ok(self.archive.record_bytes(index)?.into_owned())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bsa::BsaBuilder;
    use crate::maps::block_name;

    fn blocks() -> BlocksFile {
        let data = BsaBuilder::new(DirectoryType::Name)
            .add_named("TVRNAL01.RMB", vec![1; 10])
            .add_named("N0000005.RDB", vec![2; 20])
            .add_named("S0000999.RDB", vec![3; 5])
            .add_named("HOUSE01.RDI", vec![4; 3])
            .add_named("README", vec![])
            .build()
            .unwrap();
        BlocksFile::new(BsaArchive::from_bytes(data, LoadStrategy::Declared).unwrap())
    }

    #[test]
    fn test_classification() {
        assert_eq!(BlockKind::from_name("tvrnal01.rmb"), BlockKind::Exterior);
        assert_eq!(BlockKind::from_name("N0000005.RDB"), BlockKind::Dungeon);
        assert_eq!(BlockKind::from_name("HOUSE01.RDI"), BlockKind::Interior);
        assert_eq!(BlockKind::from_name("README"), BlockKind::Unknown);
    }

    #[test]
    fn test_listing() {
        let file = blocks();
        assert_eq!(file.block_count(), 5);
        assert_eq!(file.blocks_of_kind(BlockKind::Dungeon).count(), 2);

        let block = file.block(3).unwrap();
        assert_eq!(block.name, "HOUSE01.RDI");
        assert_eq!(block.kind, BlockKind::Interior);
        assert_eq!(block.length, 3);
    }

    #[test]
    fn test_dungeon_block_names_resolve() {
        let file = blocks();
        let name = block_name(0, 5).unwrap();
        let block = file.find(&name).expect("dungeon block is listed");
        assert_eq!(block.index, 1);
        assert_eq!(file.block_bytes(&name).unwrap(), vec![2; 20]);
        assert!(file.find("M0000001.RDB").is_none());
    }

    #[test]
    fn test_missing_block_is_content_missing() {
        let err = blocks().block_bytes("NOPE.RMB").unwrap_err();
        assert!(err.is_content_missing());
    }
}
