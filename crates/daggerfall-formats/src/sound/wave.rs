//! RIFF/WAVE header for Daggerfall sound data

use binrw::{BinRead, BinWrite};

/// Sample rate of every Daggerfall sound effect
pub const SAMPLE_RATE: u32 = 11025;

/// Bits per sample (unsigned 8-bit PCM)
pub const BITS_PER_SAMPLE: u16 = 8;

/// Channel count (mono)
pub const CHANNELS: u16 = 1;

/// Size of the canonical PCM WAVE header in bytes
pub const WAVE_HEADER_SIZE: usize = 44;

/// Canonical 44-byte PCM WAVE header
///
/// Sample data must follow immediately; `data_size` is its exact length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little, magic = b"RIFF")]
pub struct WaveHeader {
    /// Bytes following this field (`36 + data_size`)
    pub riff_size: u32,
    /// `fmt ` chunk size, 16 for PCM
    #[brw(magic = b"WAVEfmt ")]
    pub fmt_size: u32,
    /// Audio format, 1 for PCM
    pub format: u16,
    /// Channel count
    pub channels: u16,
    /// Samples per second
    pub sample_rate: u32,
    /// Bytes per second
    pub byte_rate: u32,
    /// Bytes per sample frame
    pub block_align: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Length of the sample data
    #[brw(magic = b"data")]
    pub data_size: u32,
}

impl WaveHeader {
    /// Header for `data_size` bytes of 8-bit mono 11025 Hz PCM
    pub fn pcm8_mono(data_size: u32) -> Self {
        let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
        Self {
            riff_size: 36 + data_size,
            fmt_size: 16,
            format: 1,
            channels: CHANNELS,
            sample_rate: SAMPLE_RATE,
            byte_rate: SAMPLE_RATE * u32::from(block_align),
            block_align,
            bits_per_sample: BITS_PER_SAMPLE,
            data_size,
        }
    }
}
