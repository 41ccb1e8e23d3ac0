//! `DAGGER.SND` sound records

use crate::BsaRecord;
use crate::bsa::{BsaArchive, BsaError, LoadStrategy, UsageMode};
use crate::sound::wave::{SAMPLE_RATE, WaveHeader};
use binrw::BinWrite;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Conventional file name of the sound archive
pub const FILE_NAME: &str = "DAGGER.SND";

/// Errors that can occur when reading sound records
#[derive(Debug, Error)]
pub enum SoundError {
    /// Sample data does not fit a WAVE header size field
    #[error("Sound data too large for a WAVE header: {0} bytes")]
    DataTooLarge(usize),

    /// Underlying archive error
    #[error("Archive error: {0}")]
    Archive(#[from] BsaError),

    /// Binary write error
    #[error("Binary format error: {0}")]
    BinWrite(#[from] binrw::Error),
}

impl SoundError {
    /// Check if the error means content is absent
    pub fn is_content_missing(&self) -> bool {
        matches!(self, Self::Archive(e) if e.is_content_missing())
    }

    /// Check if the error means the archive is damaged
    pub fn is_corrupt(&self) -> bool {
        match self {
            Self::Archive(e) => e.is_corrupt(),
            Self::DataTooLarge(_) => true,
            Self::BinWrite(_) => false,
        }
    }
}

/// Result type alias for sound operations
pub type Result<T> = std::result::Result<T, SoundError>;

/// A decoded sound effect
///
/// `wave_header` followed by `wave_data` is a complete WAVE file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    /// Record name
    pub name: String,
    /// 44-byte RIFF/WAVE header describing `wave_data`
    pub wave_header: Vec<u8>,
    /// Unsigned 8-bit mono samples at 11025 Hz
    pub wave_data: Vec<u8>,
}

impl Sound {
    /// Build a sound from raw sample bytes
    pub fn from_samples(name: impl Into<String>, samples: &[u8]) -> Result<Self> {
        let data_size =
            u32::try_from(samples.len()).map_err(|_| SoundError::DataTooLarge(samples.len()))?;
        // riff_size must also fit
        if data_size > u32::MAX - 36 {
            return Err(SoundError::DataTooLarge(samples.len()));
        }

        let mut cursor = Cursor::new(Vec::new());
        WaveHeader::pcm8_mono(data_size).write(&mut cursor)?;

        Ok(Self {
            name: name.into(),
            wave_header: cursor.into_inner(),
            wave_data: samples.to_vec(),
        })
    }

    /// Concatenate header and data into a playable WAVE file
    pub fn to_wave(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wave_header.len() + self.wave_data.len());
        out.extend_from_slice(&self.wave_header);
        out.extend_from_slice(&self.wave_data);
        out
    }

    /// Playback length
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.wave_data.len() as f64 / f64::from(SAMPLE_RATE))
    }
}

impl BsaRecord for Sound {
    type Error = SoundError;

    fn parse_record(name: &str, data: &[u8]) -> Result<Self> {
        Self::from_samples(name, data)
    }
}

/// Sound archive reader
#[derive(Debug)]
pub struct SoundFile {
    archive: BsaArchive,
}

impl SoundFile {
    /// Wrap an opened archive
    pub fn new(archive: BsaArchive) -> Self {
        Self { archive }
    }

    /// Open `DAGGER.SND` from disk
    pub fn open<P: AsRef<Path>>(path: P, usage: UsageMode, strategy: LoadStrategy) -> Result<Self> {
        Ok(Self::new(BsaArchive::open(path, usage, strategy)?))
    }

    /// Underlying archive
    pub fn archive(&self) -> &BsaArchive {
        &self.archive
    }

    /// Number of sound records
    pub fn sound_count(&self) -> usize {
        self.archive.record_count()
    }

    /// Decode sound record `index`
    pub fn sound(&self, index: usize) -> Result<Sound> {
        let sound = Sound::decode(&self.archive, index)?;
        debug!(
            "Decoded sound {} ({} samples)",
            sound.name,
            sound.wave_data.len()
        );
        Ok(sound)
    }

    /// Decode the sound whose record id is `id`
    pub fn sound_by_id(&self, id: u32) -> Result<Option<Sound>> {
        self.archive
            .index_of_id(id)
            .map(|i| self.sound(i))
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bsa::{BsaBuilder, DirectoryType};
    use crate::sound::wave::WAVE_HEADER_SIZE;
    use binrw::BinRead;

    fn sounds() -> SoundFile {
        let data = BsaBuilder::new(DirectoryType::Number)
            .add_numbered(0, (0..=255).collect())
            .add_numbered(1, vec![])
            .add_numbered(7, vec![0x80; 11025])
            .build()
            .unwrap();
        SoundFile::new(BsaArchive::from_bytes(data, LoadStrategy::Declared).unwrap())
    }

    #[test]
    fn test_header_and_data_form_wave() {
        let sound = sounds().sound(0).expect("Should decode sound");
        assert_eq!(sound.name, "0");
        assert_eq!(sound.wave_header.len(), WAVE_HEADER_SIZE);

        let wave = sound.to_wave();
        let header = WaveHeader::read(&mut Cursor::new(&wave)).unwrap();
        assert_eq!(header.data_size as usize, sound.wave_data.len());
        assert_eq!(header.riff_size as usize + 8, wave.len());
        assert_eq!(&wave[WAVE_HEADER_SIZE..], sound.wave_data.as_slice());
    }

    #[test]
    fn test_empty_sound() {
        let sound = sounds().sound(1).unwrap();
        assert!(sound.wave_data.is_empty());
        assert_eq!(sound.to_wave().len(), WAVE_HEADER_SIZE);
        assert_eq!(sound.duration(), Duration::ZERO);
    }

    #[test]
    fn test_sound_by_id_and_duration() {
        let file = sounds();
        assert_eq!(file.sound_count(), 3);
        let sound = file.sound_by_id(7).unwrap().expect("id 7 exists");
        assert_eq!(sound.duration(), Duration::from_secs(1));
        assert!(file.sound_by_id(99).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            sounds().sound(3),
            Err(SoundError::Archive(BsaError::OutOfRange { .. }))
        ));
    }
}
