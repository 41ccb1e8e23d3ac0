//! Sound effects from `DAGGER.SND`
//!
//! `DAGGER.SND` is a number-directory BSA whose records are raw unsigned
//! 8-bit mono PCM at 11025 Hz. Decoding pairs each record with a canonical
//! WAVE header so consumers can write or play it without transformation.
//!
//! ```rust
//! use daggerfall_formats::sound::Sound;
//!
//! let sound = Sound::from_samples("0", &[0x80, 0x90, 0x70]).unwrap();
//! let wave = sound.to_wave();
//! assert_eq!(&wave[0..4], b"RIFF");
//! assert_eq!(wave.len(), 44 + 3);
//! ```

mod file;
mod wave;

pub use file::{FILE_NAME, Result, Sound, SoundError, SoundFile};
pub use wave::{BITS_PER_SAMPLE, CHANNELS, SAMPLE_RATE, WAVE_HEADER_SIZE, WaveHeader};
