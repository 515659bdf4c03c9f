//! bitreel Encoder Library
//!
//! This library turns a directory of extracted video frames into a bitreel
//! asset blob, and handles the artifacts that ship alongside it.

pub mod audio;
pub mod frame_source;
pub mod progress_tracker;
pub mod storage;

pub use audio::AudioTrack;
pub use frame_source::{threshold_image, FrameSource};
pub use progress_tracker::ProgressTracker;
pub use storage::{StorageBudget, StorageReport};

use bitreel_core::{AssetBuilder, AssetStats, Frame};
use std::path::{Path, PathBuf};

/// Result type for bitreel-encoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bitreel-encoder operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("bitreel core error: {0}")]
    Core(#[from] bitreel_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load frame {path}: {source}")]
    FrameLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No frame images found in {0}")]
    NoFrames(PathBuf),

    #[error("Invalid audio sample rate: {0}")]
    InvalidSampleRate(u32),
}

/// Encoder configuration
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Output frame width in pixels
    pub width: u16,
    /// Output frame height in pixels
    pub height: u16,
    /// Frames per second written to the header
    pub frame_rate: u16,
    /// Luma below this value is foreground
    pub threshold: u8,
    /// Swap foreground and background
    pub invert: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            width: 180,
            height: 135,
            frame_rate: 15,
            threshold: 128,
            invert: false,
        }
    }
}

/// A built asset blob with its compression figures
#[derive(Debug, Clone)]
pub struct EncodedAsset {
    pub blob: Vec<u8>,
    pub stats: AssetStats,
}

/// Builds asset blobs from frame images
pub struct AssetEncoder {
    config: EncoderConfig,
}

impl AssetEncoder {
    /// Creates a new encoder
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Loads every image in `dir` and builds the blob
    pub fn encode_dir(&self, dir: &Path) -> Result<EncodedAsset> {
        let source = FrameSource::from_dir(dir)?;
        let progress = ProgressTracker::new(source.len() as u64, "Frames", 500);
        let frames = source.load(&self.config, Some(&progress))?;
        self.encode_frames(frames)
    }

    /// Builds the blob from already thresholded frames
    pub fn encode_frames(&self, frames: Vec<Frame>) -> Result<EncodedAsset> {
        let mut builder =
            AssetBuilder::new(self.config.width, self.config.height, self.config.frame_rate);
        for frame in frames {
            builder.push(frame);
        }

        let mut blob = Vec::new();
        let stats = builder.build_to(&mut blob)?;
        log::info!(
            "encoded {} frames: {} bytes of frame data ({:.1}% of raw 1-bit)",
            stats.frame_count,
            stats.encoded_bytes,
            stats.ratio_percent()
        );

        Ok(EncodedAsset { blob, stats })
    }

    /// Logs a warning when the audio and video lengths disagree by more
    /// than one frame. Returns whether they are in sync.
    pub fn check_audio_sync(&self, stats: &AssetStats, audio: &AudioTrack) -> bool {
        let frame_rate = self.config.frame_rate.max(1) as u64;
        let video_ms = stats.frame_count as u64 * 1000 / frame_rate;
        let audio_ms = audio.duration_ms();
        let in_sync = video_ms.abs_diff(audio_ms) <= 1000 / frame_rate;

        if !in_sync {
            log::warn!(
                "audio runs {} ms but video runs {} ms",
                audio_ms,
                video_ms
            );
        }
        in_sync
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitreel_core::AssetReader;
    use image::{GrayImage, Luma};
    use tempfile::tempdir;

    #[test]
    fn test_encode_dir() {
        let dir = tempdir().unwrap();
        for i in 0..3u32 {
            // A vertical bar that moves one pixel per frame
            let image = GrayImage::from_fn(6, 4, |x, _| {
                if x == i {
                    Luma([0])
                } else {
                    Luma([255])
                }
            });
            image
                .save(dir.path().join(format!("frame_{:06}.png", i + 1)))
                .unwrap();
        }

        let encoder = AssetEncoder::new(EncoderConfig {
            width: 6,
            height: 4,
            frame_rate: 10,
            ..EncoderConfig::default()
        });
        let asset = encoder.encode_dir(dir.path()).unwrap();
        assert_eq!(asset.stats.frame_count, 3);
        assert_eq!(asset.stats.blob_bytes, asset.blob.len() as u64);

        let reader = AssetReader::open(asset.blob).unwrap();
        for i in 0..3u16 {
            let frame = reader.frame_at(i as usize).unwrap();
            assert_eq!(frame.foreground_count(), 4);
            assert_eq!(frame.get(i, 2), Some(true));
        }
    }

    #[test]
    fn test_encode_frames_rejects_wrong_size() {
        let encoder = AssetEncoder::new(EncoderConfig::default());
        let result = encoder.encode_frames(vec![Frame::blank(10, 10)]);
        assert!(matches!(
            result,
            Err(Error::Core(bitreel_core::Error::Dimension { .. }))
        ));
    }

    #[test]
    fn test_check_audio_sync() {
        let encoder = AssetEncoder::new(EncoderConfig::default());
        let frames = vec![Frame::blank(180, 135); 30];
        let asset = encoder.encode_frames(frames).unwrap();

        // 30 frames at 15 fps is 2 s
        let in_sync = AudioTrack::new(8000, vec![0x80; 16_000]).unwrap();
        assert!(encoder.check_audio_sync(&asset.stats, &in_sync));

        let too_long = AudioTrack::new(8000, vec![0x80; 24_000]).unwrap();
        assert!(!encoder.check_audio_sync(&asset.stats, &too_long));
    }
}
