//! Raw unsigned 8-bit PCM audio track
//!
//! The audio is a separate artifact shipped next to the asset blob; the
//! two share no header and are never interleaved.

use crate::{Error, Result};
use std::path::Path;

/// Mono unsigned 8-bit PCM samples at a fixed rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTrack {
    /// Samples per second
    pub sample_rate: u32,
    /// One byte per sample, 0x80 is silence
    pub samples: Vec<u8>,
}

impl AudioTrack {
    /// Creates a track from samples
    pub fn new(sample_rate: u32, samples: Vec<u8>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            sample_rate,
            samples,
        })
    }

    /// Reads a headerless u8 PCM file
    pub fn from_raw_file(path: &Path, sample_rate: u32) -> Result<Self> {
        let samples = std::fs::read(path)?;
        Self::new(sample_rate, samples)
    }

    /// Writes the samples as a headerless u8 PCM file
    pub fn write_raw(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.samples)?;
        Ok(())
    }

    /// Size of the raw artifact in bytes
    pub fn byte_len(&self) -> u64 {
        self.samples.len() as u64
    }

    /// Playback time in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }
}
