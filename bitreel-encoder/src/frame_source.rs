//! Loading thresholded frames from a directory of extracted images

use crate::progress_tracker::ProgressTracker;
use crate::{EncoderConfig, Error, Result};
use bitreel_core::Frame;
use image::{imageops, GrayImage};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Ordered list of frame images on disk
#[derive(Debug, Clone)]
pub struct FrameSource {
    paths: Vec<PathBuf>,
}

impl FrameSource {
    /// Lists image files in `dir`, sorted by file name.
    ///
    /// Transcoders write zero-padded names (`frame_000001.png`), so name
    /// order is frame order.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_image(&path) {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(Error::NoFrames(dir.to_path_buf()));
        }

        paths.sort();
        log::debug!("found {} frames in {}", paths.len(), dir.display());
        Ok(Self { paths })
    }

    /// Uses the given paths as-is, in order
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether there are no frames
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Frame image paths in order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Loads, resizes and thresholds every frame in parallel, keeping order
    pub fn load(
        &self,
        config: &EncoderConfig,
        progress: Option<&ProgressTracker>,
    ) -> Result<Vec<Frame>> {
        self.paths
            .par_iter()
            .map(|path| {
                let frame = load_frame(path, config)?;
                if let Some(progress) = progress {
                    progress.increment();
                }
                Ok(frame)
            })
            .collect()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Loads one image as a frame of the configured size
pub fn load_frame(path: &Path, config: &EncoderConfig) -> Result<Frame> {
    let image = image::open(path)
        .map_err(|source| Error::FrameLoad {
            path: path.to_path_buf(),
            source,
        })?
        .to_luma8();

    let (width, height) = (config.width as u32, config.height as u32);
    let image = if image.dimensions() == (width, height) {
        image
    } else {
        imageops::resize(&image, width, height, imageops::FilterType::Triangle)
    };

    Ok(threshold_image(&image, config.threshold, config.invert))
}

/// Converts a grayscale image into a binary frame.
///
/// Pixels darker than `threshold` are foreground; `invert` swaps that.
///
/// Images wider or taller than `u16::MAX` are cropped to fit.
pub fn threshold_image(image: &GrayImage, threshold: u8, invert: bool) -> Frame {
    let width = image.width().min(u16::MAX as u32) as u16;
    let height = image.height().min(u16::MAX as u32) as u16;

    Frame::from_fn(width, height, |x, y| {
        let luma = image.get_pixel(x as u32, y as u32).0[0];
        (luma < threshold) != invert
    })
}
