//! Texture bank reader

use crate::texture::error::{Result, TextureError};
use crate::texture::header::{
    Compression, FILE_HEADER_SIZE, RECORD_HEADER_SIZE, RECORD_TABLE_ENTRY_SIZE, ROW_STRIDE,
    RecordTableEntry, TextureFileHeader, TextureRecordHeader,
};
use binrw::BinRead;
use std::io::{Cursor, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of texture bank `archive`, e.g. `TEXTURE.112`
pub fn texture_file_name(archive: u16) -> String {
    format!("TEXTURE.{archive:03}")
}

/// Decoded single-frame image of palette indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Horizontal draw offset
    pub offset_x: i16,
    /// Vertical draw offset
    pub offset_y: i16,
    /// Row-major palette indices, `width * height` bytes
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Palette index at `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}

/// An opened `TEXTURE.nnn` file
#[derive(Debug)]
pub struct TextureFile {
    path: Option<PathBuf>,
    header: TextureFileHeader,
    table: Vec<RecordTableEntry>,
    records: Vec<TextureRecordHeader>,
    data: Vec<u8>,
}

impl TextureFile {
    /// Read and parse a texture bank from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TextureError::NotFound(path.to_path_buf()));
        }

        let mut file = Self::parse(std::fs::read(path)?)?;
        file.path = Some(path.to_path_buf());
        debug!(
            "Opened texture bank {} with {} records",
            path.display(),
            file.record_count()
        );
        Ok(file)
    }

    /// Parse a texture bank held in memory
    pub fn parse(data: Vec<u8>) -> Result<Self> {
        require(&data, 0, FILE_HEADER_SIZE, "file header")?;
        let mut cursor = Cursor::new(data.as_slice());
        let header = TextureFileHeader::read(&mut cursor)?;

        let count = usize::try_from(header.record_count).map_err(|_| {
            TextureError::Malformed(format!("negative record count: {}", header.record_count))
        })?;
        require(
            &data,
            FILE_HEADER_SIZE,
            count * RECORD_TABLE_ENTRY_SIZE,
            "record table",
        )?;

        let mut table = Vec::with_capacity(count);
        for _ in 0..count {
            table.push(RecordTableEntry::read(&mut cursor)?);
        }

        let mut records = Vec::with_capacity(count);
        for entry in &table {
            let position = entry.record_position as usize;
            require(&data, position, RECORD_HEADER_SIZE, "record header")?;
            cursor.seek(SeekFrom::Start(position as u64))?;
            records.push(TextureRecordHeader::read(&mut cursor)?);
        }

        Ok(Self {
            path: None,
            header,
            table,
            records,
            data,
        })
    }

    /// Source path when opened from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bank description from the file header
    pub fn name(&self) -> String {
        self.header.name()
    }

    /// Number of records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Record table entry of record `index`
    pub fn table_entry(&self, index: usize) -> Result<&RecordTableEntry> {
        self.table.get(index).ok_or(TextureError::OutOfRange {
            index,
            count: self.table.len(),
        })
    }

    /// Image header of record `index`
    pub fn record_header(&self, index: usize) -> Result<&TextureRecordHeader> {
        self.records.get(index).ok_or(TextureError::OutOfRange {
            index,
            count: self.records.len(),
        })
    }

    /// Decode record `index` as a single uncompressed frame
    pub fn image(&self, index: usize) -> Result<TextureImage> {
        let header = self.record_header(index)?;
        if header.compression() != Compression::Uncompressed || header.is_animated() {
            return Err(TextureError::Unsupported {
                record: index,
                compression: header.compression,
                frame_count: header.frame_count,
            });
        }

        let (width, height) = match (
            usize::try_from(header.width),
            usize::try_from(header.height),
        ) {
            (Ok(w), Ok(h)) if w <= ROW_STRIDE => (w, h),
            _ => {
                return Err(TextureError::Malformed(format!(
                    "record {index}: invalid dimensions {}x{}",
                    header.width, header.height
                )));
            }
        };

        let start = self.table[index].record_position as usize + header.data_offset as usize;
        let mut pixels = Vec::with_capacity(width * height);
        for row in 0..height {
            let row_start = start + row * ROW_STRIDE;
            require(&self.data, row_start, width, "image data")?;
            pixels.extend_from_slice(&self.data[row_start..row_start + width]);
        }

        Ok(TextureImage {
            width,
            height,
            offset_x: header.offset_x,
            offset_y: header.offset_y,
            pixels,
        })
    }
}

fn require(data: &[u8], offset: usize, length: usize, section: &'static str) -> Result<()> {
    let expected = offset.saturating_add(length);
    if expected > data.len() {
        return Err(TextureError::Truncated {
            section,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}
