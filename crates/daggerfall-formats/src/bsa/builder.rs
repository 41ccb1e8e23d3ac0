//! BSA archive building

use crate::bsa::error::{BsaError, BsaResult};
use crate::bsa::header::{
    BsaHeader, DirectoryType, MAX_NAME_LENGTH, NameEntry, NumberEntry,
};
use binrw::BinWrite;
use std::io::{Cursor, Write};

#[derive(Debug, Clone)]
enum PendingKey {
    Name(String),
    Number(u32),
}

/// Builder for BSA containers
///
/// Records are written in insertion order, followed by the directory.
#[derive(Debug, Clone)]
pub struct BsaBuilder {
    directory_type: DirectoryType,
    records: Vec<(PendingKey, Vec<u8>)>,
}

impl BsaBuilder {
    /// Start an archive with the given directory layout
    pub fn new(directory_type: DirectoryType) -> Self {
        Self {
            directory_type,
            records: Vec::new(),
        }
    }

    /// Add a named record (name archives)
    pub fn add_named(mut self, name: &str, data: Vec<u8>) -> Self {
        self.records.push((PendingKey::Name(name.to_string()), data));
        self
    }

    /// Add a numbered record (number archives)
    pub fn add_numbered(mut self, id: u32, data: Vec<u8>) -> Self {
        self.records.push((PendingKey::Number(id), data));
        self
    }

    /// Number of records added so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no records were added
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the archive
    pub fn build(&self) -> BsaResult<Vec<u8>> {
        let count = u16::try_from(self.records.len()).map_err(|_| {
            BsaError::InvalidRecord(format!(
                "{} records exceed the 65535-record limit",
                self.records.len()
            ))
        })?;

        let mut cursor = Cursor::new(Vec::new());
        BsaHeader::new(count, self.directory_type).write(&mut cursor)?;

        for (_, data) in &self.records {
            cursor.write_all(data)?;
        }

        for (key, data) in &self.records {
            let size = u32::try_from(data.len())
                .map_err(|_| BsaError::InvalidRecord("record larger than 4 GiB".to_string()))?;
            match (self.directory_type, key) {
                (DirectoryType::Name, PendingKey::Name(name)) => {
                    if name.len() > MAX_NAME_LENGTH {
                        return Err(BsaError::InvalidRecord(format!(
                            "record name '{name}' longer than {MAX_NAME_LENGTH} bytes"
                        )));
                    }
                    NameEntry::new(name, size).write(&mut cursor)?;
                }
                (DirectoryType::Number, PendingKey::Number(id)) => {
                    NumberEntry { id: *id, size }.write(&mut cursor)?;
                }
                (kind, key) => {
                    return Err(BsaError::InvalidRecord(format!(
                        "record key {key:?} does not match {kind:?} directory"
                    )));
                }
            }
        }

        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bsa::{BsaArchive, LoadStrategy};

    #[test]
    fn test_build_number_archive_layout() {
        let data = BsaBuilder::new(DirectoryType::Number)
            .add_numbered(7, vec![0xAA; 3])
            .build()
            .expect("Should build");
        // header + data + one 8-byte entry
        assert_eq!(data.len(), 4 + 3 + 8);
        assert_eq!(&data[0..4], &[1, 0, 0, 2]);
        assert_eq!(&data[4..7], &[0xAA; 3]);
        assert_eq!(&data[7..11], &7u32.to_le_bytes());
        assert_eq!(&data[11..15], &3u32.to_le_bytes());
    }

    #[test]
    fn test_rejects_mismatched_keys() {
        let result = BsaBuilder::new(DirectoryType::Number)
            .add_named("NAME.DAT", vec![1])
            .build();
        assert!(matches!(result, Err(BsaError::InvalidRecord(_))));
    }

    #[test]
    fn test_rejects_long_names() {
        let result = BsaBuilder::new(DirectoryType::Name)
            .add_named("THIS_NAME_IS_TOO_LONG.DAT", vec![1])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_built_archive_opens() {
        let builder = BsaBuilder::new(DirectoryType::Name)
            .add_named("A.DAT", vec![1, 2])
            .add_named("B.DAT", vec![3]);
        assert_eq!(builder.len(), 2);
        assert!(!builder.is_empty());

        let archive = BsaArchive::from_bytes(builder.build().unwrap(), LoadStrategy::Declared)
            .expect("Should open built archive");
        assert_eq!(archive.record_count(), 2);
        assert_eq!(archive.record_bytes(1).unwrap().as_ref(), &[3]);
    }
}
