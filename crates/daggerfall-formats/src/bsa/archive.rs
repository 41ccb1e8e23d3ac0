//! Opened BSA archives and record access
//!
//! An archive keeps its directory in memory and reads record bytes from one
//! of three backings chosen at open time: an owned buffer, a memory map, or
//! a file handle that is seeked on every read.

use crate::bsa::error::{BsaError, BsaResult};
use crate::bsa::header::{
    BsaHeader, DirectoryEntry, DirectoryType, HEADER_SIZE, NameEntry, NumberEntry,
};
use binrw::BinRead;
use memmap2::{Mmap, MmapOptions};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::File;
use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where record bytes live while the archive is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageMode {
    /// Read the whole file into an owned buffer at open
    #[default]
    Memory,
    /// Memory-map the file
    Mapped,
    /// Keep the file handle open and read each record on demand
    Disk,
}

/// How the directory layout is determined at open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    /// Trust the directory type declared in the header
    #[default]
    Declared,
    /// Ignore the declared type and pick the directory layout that is
    /// consistent with the file size
    Discover,
}

/// Summary of one record in the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInfo {
    /// Position in the directory
    pub index: usize,
    /// Record name (decimal id for number archives)
    pub name: String,
    /// Record id for number archives
    pub id: Option<u32>,
    /// Absolute byte offset of the record data
    pub offset: u64,
    /// Record length in bytes
    pub length: usize,
}

enum Backing {
    Memory(Vec<u8>),
    Mapped(Mmap),
    Disk(Mutex<File>),
}

impl Backing {
    fn len_hint(&self) -> Option<u64> {
        match self {
            Self::Memory(data) => Some(data.len() as u64),
            Self::Mapped(map) => Some(map.len() as u64),
            Self::Disk(_) => None,
        }
    }

    fn read_at(&self, offset: u64, length: usize) -> BsaResult<Cow<'_, [u8]>> {
        match self {
            Self::Memory(data) => slice_at(data, offset, length).map(Cow::Borrowed),
            Self::Mapped(map) => slice_at(map, offset, length).map(Cow::Borrowed),
            Self::Disk(file) => {
                let mut file = file.lock();
                file.seek(SeekFrom::Start(offset))?;
                let mut buffer = vec![0u8; length];
                match file.read_exact(&mut buffer) {
                    Ok(()) => Ok(Cow::Owned(buffer)),
                    Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(BsaError::corrupt(
                        format!("read of {length} bytes at offset {offset} ran past end of file"),
                    )),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}

fn slice_at(data: &[u8], offset: u64, length: usize) -> BsaResult<&[u8]> {
    let start = usize::try_from(offset)
        .map_err(|_| BsaError::corrupt(format!("offset {offset} too large for platform")))?;
    start
        .checked_add(length)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| {
            BsaError::corrupt(format!(
                "range {start}+{length} exceeds archive size {}",
                data.len()
            ))
        })
}

/// An opened BSA archive
///
/// Record indices are stable for the lifetime of the archive. Dropping the
/// archive releases its buffer, memory map or file handle.
pub struct BsaArchive {
    path: Option<PathBuf>,
    usage: UsageMode,
    directory_type: DirectoryType,
    entries: Vec<DirectoryEntry>,
    offsets: Vec<u64>,
    backing: Backing,
}

impl std::fmt::Debug for BsaArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BsaArchive")
            .field("path", &self.path)
            .field("usage", &self.usage)
            .field("directory_type", &self.directory_type)
            .field("record_count", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl BsaArchive {
    /// Open an archive from disk
    ///
    /// Fails with [`BsaError::NotFound`] if `path` does not exist and with
    /// [`BsaError::CorruptArchive`] if the header or directory are
    /// inconsistent with the file size.
    pub fn open<P: AsRef<Path>>(
        path: P,
        usage: UsageMode,
        strategy: LoadStrategy,
    ) -> BsaResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BsaError::NotFound(path.to_path_buf()));
        }

        let mut file = File::open(path)?;
        let file_len = file.metadata()?.len();
        if file_len < HEADER_SIZE as u64 {
            return Err(BsaError::corrupt(format!(
                "file is {file_len} bytes, shorter than the {HEADER_SIZE}-byte header"
            )));
        }

        let backing = match usage {
            UsageMode::Memory => {
                let mut data = Vec::with_capacity(file_len as usize);
                file.read_to_end(&mut data)?;
                Backing::Memory(data)
            }
            UsageMode::Mapped => {
                #[allow(unsafe_code)]
                let map = unsafe { MmapOptions::new().map(&file)? };
                Backing::Mapped(map)
            }
            UsageMode::Disk => Backing::Disk(Mutex::new(file)),
        };

        let archive = Self::load(Some(path.to_path_buf()), usage, strategy, backing, file_len)?;
        debug!(
            "Opened {} ({:?}, {:?}): {} records",
            path.display(),
            usage,
            archive.directory_type,
            archive.record_count()
        );
        Ok(archive)
    }

    /// Parse an archive held entirely in memory
    pub fn from_bytes(data: Vec<u8>, strategy: LoadStrategy) -> BsaResult<Self> {
        let file_len = data.len() as u64;
        if file_len < HEADER_SIZE as u64 {
            return Err(BsaError::corrupt(format!(
                "archive is {file_len} bytes, shorter than the {HEADER_SIZE}-byte header"
            )));
        }
        Self::load(
            None,
            UsageMode::Memory,
            strategy,
            Backing::Memory(data),
            file_len,
        )
    }

    fn load(
        path: Option<PathBuf>,
        usage: UsageMode,
        strategy: LoadStrategy,
        backing: Backing,
        file_len: u64,
    ) -> BsaResult<Self> {
        debug_assert!(backing.len_hint().is_none_or(|len| len == file_len));

        let header = {
            let bytes = backing.read_at(0, HEADER_SIZE)?;
            BsaHeader::read(&mut Cursor::new(bytes.as_ref()))?
        };
        let count = header.record_count as usize;

        let (directory_type, entries) = match strategy {
            LoadStrategy::Declared => {
                let kind = header.kind()?;
                let entries = read_directory(&backing, kind, count, file_len)?;
                check_layout(kind, &entries, file_len)?;
                (kind, entries)
            }
            LoadStrategy::Discover => discover(&backing, &header, file_len)?,
        };

        let mut offsets = Vec::with_capacity(entries.len());
        let mut offset = HEADER_SIZE as u64;
        for entry in &entries {
            offsets.push(offset);
            offset += u64::from(entry.size());
        }

        Ok(Self {
            path,
            usage,
            directory_type,
            entries,
            offsets,
            backing,
        })
    }

    /// Source path, if the archive was opened from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Usage mode the archive was opened with
    pub fn usage(&self) -> UsageMode {
        self.usage
    }

    /// Directory layout in effect
    pub fn directory_type(&self) -> DirectoryType {
        self.directory_type
    }

    /// Number of records
    pub fn record_count(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, index: usize) -> BsaResult<&DirectoryEntry> {
        self.entries.get(index).ok_or(BsaError::OutOfRange {
            index,
            count: self.entries.len(),
        })
    }

    /// Length in bytes of record `index`
    pub fn record_length(&self, index: usize) -> BsaResult<usize> {
        Ok(self.entry(index)?.size() as usize)
    }

    /// Name of record `index` (the decimal id for number archives)
    pub fn record_name(&self, index: usize) -> BsaResult<String> {
        Ok(self.entry(index)?.name())
    }

    /// Numeric id of record `index`; `None` for name archives
    pub fn record_id(&self, index: usize) -> BsaResult<Option<u32>> {
        Ok(self.entry(index)?.id())
    }

    /// Raw bytes of record `index`
    ///
    /// Memory and mapped archives return borrowed views; disk archives
    /// return an owned copy.
    pub fn record_bytes(&self, index: usize) -> BsaResult<Cow<'_, [u8]>> {
        let length = self.record_length(index)?;
        self.backing.read_at(self.offsets[index], length)
    }

    /// Directory summary for record `index`
    pub fn record_info(&self, index: usize) -> BsaResult<RecordInfo> {
        let entry = self.entry(index)?;
        Ok(RecordInfo {
            index,
            name: entry.name(),
            id: entry.id(),
            offset: self.offsets[index],
            length: entry.size() as usize,
        })
    }

    /// Iterate over directory summaries in record order
    pub fn records(&self) -> impl Iterator<Item = RecordInfo> + '_ {
        self.entries
            .iter()
            .zip(&self.offsets)
            .enumerate()
            .map(|(index, (entry, &offset))| RecordInfo {
                index,
                name: entry.name(),
                id: entry.id(),
                offset,
                length: entry.size() as usize,
            })
    }

    /// Find a record by name, ignoring ASCII case
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.name().eq_ignore_ascii_case(name))
    }

    /// Find a record by numeric id
    pub fn index_of_id(&self, id: u32) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == Some(id))
    }
}

fn directory_offset(kind: DirectoryType, count: usize, file_len: u64) -> BsaResult<u64> {
    let directory_len = (count * kind.entry_size()) as u64;
    file_len
        .checked_sub(directory_len)
        .filter(|&offset| offset >= HEADER_SIZE as u64)
        .ok_or_else(|| {
            BsaError::corrupt(format!(
                "{count} {kind:?} directory entries ({directory_len} bytes) do not fit in {file_len}-byte file"
            ))
        })
}

fn read_directory(
    backing: &Backing,
    kind: DirectoryType,
    count: usize,
    file_len: u64,
) -> BsaResult<Vec<DirectoryEntry>> {
    let offset = directory_offset(kind, count, file_len)?;
    let bytes = backing.read_at(offset, count * kind.entry_size())?;
    let mut cursor = Cursor::new(bytes.as_ref());

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let entry = match kind {
            DirectoryType::Name => DirectoryEntry::Name(NameEntry::read(&mut cursor)?),
            DirectoryType::Number => DirectoryEntry::Number(NumberEntry::read(&mut cursor)?),
        };
        entries.push(entry);
    }
    Ok(entries)
}

/// Offset one past the last record byte
fn data_end(entries: &[DirectoryEntry]) -> u64 {
    entries
        .iter()
        .map(|e| u64::from(e.size()))
        .sum::<u64>()
        + HEADER_SIZE as u64
}

fn check_layout(kind: DirectoryType, entries: &[DirectoryEntry], file_len: u64) -> BsaResult<()> {
    let directory_start = directory_offset(kind, entries.len(), file_len)?;
    let end = data_end(entries);
    if end > directory_start {
        return Err(BsaError::corrupt(format!(
            "record data ends at {end} but the directory starts at {directory_start}"
        )));
    }
    if end < directory_start {
        warn!(
            "{} unused bytes between record data and directory",
            directory_start - end
        );
    }
    Ok(())
}

fn discover(
    backing: &Backing,
    header: &BsaHeader,
    file_len: u64,
) -> BsaResult<(DirectoryType, Vec<DirectoryEntry>)> {
    let count = header.record_count as usize;

    // Try the declared type first so an ambiguous file keeps its declaration.
    let mut candidates = vec![DirectoryType::Name, DirectoryType::Number];
    if let Ok(declared) = header.kind() {
        candidates.retain(|&k| k != declared);
        candidates.insert(0, declared);
    }

    let mut loose = None;
    for kind in candidates {
        let Ok(entries) = read_directory(backing, kind, count, file_len) else {
            continue;
        };
        let Ok(directory_start) = directory_offset(kind, count, file_len) else {
            continue;
        };
        let end = data_end(&entries);
        if end == directory_start {
            if header.kind().ok() != Some(kind) {
                debug!(
                    "Discovered {:?} directory (header declares {:#06x})",
                    kind, header.directory_type
                );
            }
            return Ok((kind, entries));
        }
        if end < directory_start && loose.is_none() {
            loose = Some((kind, entries));
        }
    }

    loose.ok_or_else(|| {
        BsaError::corrupt(format!(
            "no directory layout is consistent with {count} records in a {file_len}-byte file"
        ))
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bsa::BsaBuilder;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn name_archive_bytes() -> Vec<u8> {
        BsaBuilder::new(DirectoryType::Name)
            .add_named("FIRST.DAT", b"hello".to_vec())
            .add_named("SECOND.DAT", vec![])
            .add_named("THIRD.DAT", vec![7u8; 300])
            .build()
            .expect("Should build archive")
    }

    fn write_temp(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(data).expect("Failed to write temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_open_all_usage_modes() {
        let data = name_archive_bytes();
        let file = write_temp(&data);

        for usage in [UsageMode::Memory, UsageMode::Mapped, UsageMode::Disk] {
            let archive = BsaArchive::open(file.path(), usage, LoadStrategy::Declared)
                .expect("Should open archive");
            assert_eq!(archive.usage(), usage);
            assert_eq!(archive.record_count(), 3);
            assert_eq!(archive.directory_type(), DirectoryType::Name);
            assert_eq!(archive.record_name(0).unwrap(), "FIRST.DAT");
            assert_eq!(archive.record_bytes(0).unwrap().as_ref(), b"hello");
            assert!(archive.record_bytes(1).unwrap().is_empty());
            assert_eq!(archive.record_bytes(2).unwrap().as_ref(), &[7u8; 300][..]);
            assert_eq!(archive.path(), Some(file.path()));
        }
    }

    #[test]
    fn test_offsets_follow_directory_order() {
        let archive =
            BsaArchive::from_bytes(name_archive_bytes(), LoadStrategy::Declared).unwrap();
        let infos: Vec<_> = archive.records().collect();
        assert_eq!(infos[0].offset, 4);
        assert_eq!(infos[1].offset, 9);
        assert_eq!(infos[2].offset, 9);
        assert_eq!(infos[2].length, 300);
        assert_eq!(archive.record_info(2).unwrap(), infos[2]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = BsaArchive::open(
            dir.path().join("ARCH3D.BSA"),
            UsageMode::Memory,
            LoadStrategy::Declared,
        );
        let err = result.expect_err("missing file must fail");
        assert!(matches!(err, BsaError::NotFound(_)));
        assert!(err.is_content_missing());
    }

    #[test]
    fn test_out_of_range_on_every_accessor() {
        let archive =
            BsaArchive::from_bytes(name_archive_bytes(), LoadStrategy::Declared).unwrap();
        for index in [3, 4, usize::MAX] {
            assert!(matches!(
                archive.record_length(index),
                Err(BsaError::OutOfRange { count: 3, .. })
            ));
            assert!(matches!(
                archive.record_name(index),
                Err(BsaError::OutOfRange { .. })
            ));
            assert!(matches!(
                archive.record_bytes(index),
                Err(BsaError::OutOfRange { .. })
            ));
            assert!(matches!(
                archive.record_id(index),
                Err(BsaError::OutOfRange { .. })
            ));
            assert!(matches!(
                archive.record_info(index),
                Err(BsaError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_truncated_header() {
        let result = BsaArchive::from_bytes(vec![1, 0], LoadStrategy::Declared);
        assert!(matches!(result, Err(BsaError::CorruptArchive { .. })));
    }

    #[test]
    fn test_directory_larger_than_file() {
        // Declares 100 name records but the file only holds a header.
        let data = vec![100, 0, 0, 1];
        let err = BsaArchive::from_bytes(data, LoadStrategy::Declared).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_record_sizes_overlap_directory() {
        let mut data = name_archive_bytes();
        // Inflate the last record's size field (last 4 bytes of the file).
        let len = data.len();
        data[len - 4..].copy_from_slice(&10_000u32.to_le_bytes());
        let err = BsaArchive::from_bytes(data, LoadStrategy::Declared).unwrap_err();
        assert!(matches!(err, BsaError::CorruptArchive { .. }));
    }

    #[test]
    fn test_unknown_directory_type_declared() {
        let mut data = name_archive_bytes();
        data[2..4].copy_from_slice(&0x0700u16.to_le_bytes());
        assert!(matches!(
            BsaArchive::from_bytes(data, LoadStrategy::Declared),
            Err(BsaError::UnknownDirectoryType(0x0700))
        ));
    }

    #[test]
    fn test_discover_ignores_bad_declaration() {
        let mut data = BsaBuilder::new(DirectoryType::Number)
            .add_numbered(10, vec![1, 2, 3])
            .add_numbered(11, vec![4, 5])
            .build()
            .unwrap();
        // Declare the wrong layout.
        data[2..4].copy_from_slice(&DirectoryType::Name.to_raw().to_le_bytes());

        assert!(BsaArchive::from_bytes(data.clone(), LoadStrategy::Declared).is_err());

        let archive = BsaArchive::from_bytes(data, LoadStrategy::Discover)
            .expect("Discover should find the number directory");
        assert_eq!(archive.directory_type(), DirectoryType::Number);
        assert_eq!(archive.record_id(1).unwrap(), Some(11));
        assert_eq!(archive.record_bytes(1).unwrap().as_ref(), &[4, 5]);
    }

    #[test]
    fn test_discover_rejects_inconsistent_file() {
        let data = vec![200, 0, 0, 2, 1, 2, 3];
        assert!(matches!(
            BsaArchive::from_bytes(data, LoadStrategy::Discover),
            Err(BsaError::CorruptArchive { .. })
        ));
    }

    #[test]
    fn test_disk_archive_truncated_after_open() {
        let data = name_archive_bytes();
        let file = write_temp(&data);
        let archive = BsaArchive::open(file.path(), UsageMode::Disk, LoadStrategy::Declared)
            .expect("Should open archive");

        file.as_file().set_len(6).expect("Failed to truncate");
        let err = archive.record_bytes(2).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        let archive =
            BsaArchive::from_bytes(name_archive_bytes(), LoadStrategy::Declared).unwrap();
        assert_eq!(archive.index_of_name("second.dat"), Some(1));
        assert_eq!(archive.index_of_name("MISSING.DAT"), None);
        assert_eq!(archive.index_of_id(0), None);

        let numbers = BsaBuilder::new(DirectoryType::Number)
            .add_numbered(500, vec![0])
            .add_numbered(42, vec![1])
            .build()
            .unwrap();
        let archive = BsaArchive::from_bytes(numbers, LoadStrategy::Declared).unwrap();
        assert_eq!(archive.index_of_id(42), Some(1));
        assert_eq!(archive.record_name(0).unwrap(), "500");
    }

    #[test]
    fn test_empty_archive() {
        let data = BsaBuilder::new(DirectoryType::Name).build().unwrap();
        let archive = BsaArchive::from_bytes(data, LoadStrategy::Declared).unwrap();
        assert_eq!(archive.record_count(), 0);
        assert_eq!(archive.records().count(), 0);
    }

    #[test]
    fn test_usage_serde_names() {
        let json = serde_json::to_string(&UsageMode::Mapped).unwrap();
        assert_eq!(json, "\"mapped\"");
        let strategy: LoadStrategy = serde_json::from_str("\"discover\"").unwrap();
        assert_eq!(strategy, LoadStrategy::Discover);
    }
}
