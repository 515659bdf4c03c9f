//! Rendering decoded frames to images

use crate::{Error, Result};
use bitreel_core::{AssetReader, Frame};
use image::{GrayImage, Luma};
use std::path::Path;

/// Gray levels used for foreground and background pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Luma<u8>,
    pub background: Luma<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        // Foreground pixels came from dark source pixels
        Self {
            foreground: Luma([0x00]),
            background: Luma([0xFF]),
        }
    }
}

impl Palette {
    /// Swaps foreground and background
    pub fn invert(self) -> Self {
        Self {
            foreground: self.background,
            background: self.foreground,
        }
    }

    /// Paints a frame into a new image
    pub fn paint(&self, frame: &Frame) -> GrayImage {
        let width = frame.width as u32;
        GrayImage::from_fn(width, frame.height as u32, |x, y| {
            if frame.pixels[(y * width + x) as usize] {
                self.foreground
            } else {
                self.background
            }
        })
    }
}

/// Renders frames of an asset as grayscale images
pub struct FrameRenderer<B = Vec<u8>> {
    reader: AssetReader<B>,
    palette: Palette,
}

impl<B: AsRef<[u8]>> FrameRenderer<B> {
    /// Creates a new renderer for the given asset
    pub fn new(reader: AssetReader<B>, palette: Palette) -> Self {
        Self { reader, palette }
    }

    /// Renders the frame at `index`
    pub fn render(&self, index: usize) -> Result<GrayImage> {
        let frame = self.reader.frame_at(index)?;
        Ok(self.palette.paint(&frame))
    }

    /// Renders the frame shown at `timestamp_ms`
    pub fn render_at(&self, timestamp_ms: u64) -> Result<GrayImage> {
        self.render(self.frame_for_timestamp(timestamp_ms)?)
    }

    /// Renders the frame at `index` and saves it; the format follows the extension
    pub fn save(&self, index: usize, path: &Path) -> Result<()> {
        self.render(index)?.save(path)?;
        log::debug!("Saved frame {} to {}", index, path.display());
        Ok(())
    }

    /// Index of the frame on screen at `timestamp_ms`, clamped to the last frame
    pub fn frame_for_timestamp(&self, timestamp_ms: u64) -> Result<usize> {
        let frame_count = self.reader.frame_count();
        if frame_count == 0 {
            return Err(Error::EmptyAsset);
        }

        let frame_rate = self.reader.header().frame_rate.max(1) as u64;
        let index = timestamp_ms.saturating_mul(frame_rate) / 1000;
        Ok((index as usize).min(frame_count - 1))
    }

    /// Time each frame stays on screen
    pub fn frame_delay_ms(&self) -> u64 {
        self.reader.header().frame_delay_ms()
    }

    /// Gets a reference to the underlying reader
    pub fn reader(&self) -> &AssetReader<B> {
        &self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitreel_core::build_asset;

    fn renderer() -> FrameRenderer {
        let frames = vec![
            Frame::from_fn(3, 2, |x, y| x == 0 && y == 0),
            Frame::from_fn(3, 2, |_, _| true),
        ];
        let blob = build_asset(&frames, 3, 2, 4).unwrap();
        FrameRenderer::new(AssetReader::open(blob).unwrap(), Palette::default())
    }

    #[test]
    fn test_render() {
        let image = renderer().render(0).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0), &Luma([0x00]));
        assert_eq!(image.get_pixel(1, 0), &Luma([0xFF]));
    }

    #[test]
    fn test_inverted_palette() {
        let frame = Frame::from_fn(2, 1, |x, _| x == 0);
        let image = Palette::default().invert().paint(&frame);
        assert_eq!(image.as_raw(), &vec![0xFF, 0x00]);
    }

    #[test]
    fn test_frame_for_timestamp() {
        let renderer = renderer();
        assert_eq!(renderer.frame_delay_ms(), 250);
        assert_eq!(renderer.frame_for_timestamp(0).unwrap(), 0);
        assert_eq!(renderer.frame_for_timestamp(249).unwrap(), 0);
        assert_eq!(renderer.frame_for_timestamp(250).unwrap(), 1);
        assert_eq!(renderer.frame_for_timestamp(60_000).unwrap(), 1);
    }

    #[test]
    fn test_save_round_trips_through_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let renderer = renderer();

        renderer.save(1, &path).unwrap();
        let saved = image::open(&path).unwrap().to_luma8();
        assert_eq!(saved, renderer.render(1).unwrap());
    }

    #[test]
    fn test_empty_asset() {
        let blob = build_asset::<Frame>(&[], 3, 2, 4).unwrap();
        let renderer = FrameRenderer::new(AssetReader::open(blob).unwrap(), Palette::default());
        assert!(matches!(
            renderer.frame_for_timestamp(0),
            Err(Error::EmptyAsset)
        ));
        assert!(matches!(
            renderer.render(0),
            Err(Error::Core(bitreel_core::Error::Index { .. }))
        ));
    }
}
