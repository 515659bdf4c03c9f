//! Sequential playback over an asset

use bitreel_core::{AssetReader, Frame, Result};

/// Iterator over `(timestamp_ms, frame)` in presentation order.
///
/// Decode failures are yielded as errors for the frame they belong to.
pub struct Playback<'a, B> {
    reader: &'a AssetReader<B>,
    current: usize,
}

impl<'a, B: AsRef<[u8]>> Playback<'a, B> {
    pub fn new(reader: &'a AssetReader<B>) -> Self {
        Self { reader, current: 0 }
    }

    /// Presentation time of frame `index`
    fn timestamp_ms(&self, index: usize) -> u64 {
        let frame_rate = self.reader.header().frame_rate.max(1) as u64;
        index as u64 * 1000 / frame_rate
    }
}

impl<B: AsRef<[u8]>> Iterator for Playback<'_, B> {
    type Item = Result<(u64, Frame)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.reader.frame_count() {
            return None;
        }

        let index = self.current;
        self.current += 1;
        let timestamp_ms = self.timestamp_ms(index);
        let item = self.reader.frame_at(index).map(|frame| (timestamp_ms, frame));
        if let Err(err) = &item {
            log::warn!("Frame {} at {} ms failed to decode: {}", index, timestamp_ms, err);
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.reader.frame_count() - self.current;
        (remaining, Some(remaining))
    }
}

impl<B: AsRef<[u8]>> ExactSizeIterator for Playback<'_, B> {}
