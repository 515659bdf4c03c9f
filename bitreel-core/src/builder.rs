//! Asset blob construction

use crate::codec::encode_frame;
use crate::container::{write_index, AssetHeader, AssetStats};
use crate::{Error, Frame, Result};
use log::{debug, trace};
use std::io::Write;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Collects frames and serializes them into an asset blob
#[derive(Debug, Clone)]
pub struct AssetBuilder {
    width: u16,
    height: u16,
    frame_rate: u16,
    frames: Vec<Frame>,
}

impl AssetBuilder {
    /// Creates an empty builder for frames of the given size
    pub fn new(width: u16, height: u16, frame_rate: u16) -> Self {
        Self {
            width,
            height,
            frame_rate,
            frames: Vec::new(),
        }
    }

    /// Number of frames pushed so far
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Appends a frame; its size is checked when the blob is built
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Builds the blob into memory
    pub fn build(&self) -> Result<Vec<u8>> {
        build_asset(&self.frames, self.width, self.height, self.frame_rate)
    }

    /// Builds the blob into a writer and returns its stats
    pub fn build_to<W: Write>(&self, writer: &mut W) -> Result<AssetStats> {
        let (header, encoded) =
            encode_checked(&self.frames, self.width, self.height, self.frame_rate)?;
        write_asset(writer, &header, &encoded)
    }
}

/// Builds an asset blob from frames of `width * height` pixels each.
///
/// All frames are checked before any encoding starts, so a frame of the
/// wrong size fails the whole build with [`Error::Dimension`].
pub fn build_asset<F>(frames: &[F], width: u16, height: u16, frame_rate: u16) -> Result<Vec<u8>>
where
    F: AsRef<[bool]> + Sync,
{
    let (header, encoded) = encode_checked(frames, width, height, frame_rate)?;

    let data_len: usize = encoded.iter().map(Vec::len).sum();
    let mut blob = Vec::with_capacity(header.data_start() + data_len);
    write_asset(&mut blob, &header, &encoded)?;
    Ok(blob)
}

/// Encodes every frame independently, preserving order
pub fn encode_frames<F>(frames: &[F]) -> Vec<Vec<u8>>
where
    F: AsRef<[bool]> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        frames
            .par_iter()
            .map(|frame| encode_frame(frame.as_ref()))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        frames
            .iter()
            .map(|frame| encode_frame(frame.as_ref()))
            .collect()
    }
}

/// Writes header, frame index and encoded frames, in that order
pub fn write_asset<W: Write>(
    writer: &mut W,
    header: &AssetHeader,
    encoded: &[Vec<u8>],
) -> Result<AssetStats> {
    let index = frame_offsets(encoded)?;

    header.write(writer)?;
    write_index(writer, &index)?;
    for (i, frame) in encoded.iter().enumerate() {
        trace!("frame {} at offset {}: {} bytes", i, index[i], frame.len());
        writer.write_all(frame)?;
    }

    let stats = AssetStats::from_frame_sizes(header, encoded.iter().map(Vec::len));
    debug!(
        "built asset {}x{} @ {} fps: {} frames, {} bytes",
        header.width, header.height, header.frame_rate, header.frame_count, stats.blob_bytes
    );
    Ok(stats)
}

/// Offset of each frame relative to the start of the frame data
fn frame_offsets(encoded: &[Vec<u8>]) -> Result<Vec<u32>> {
    let mut index = Vec::with_capacity(encoded.len());
    let mut offset = 0u64;
    for frame in encoded {
        let entry = u32::try_from(offset).map_err(|_| {
            Error::Capacity(format!("frame data reaches {offset} bytes, offsets are u32"))
        })?;
        index.push(entry);
        offset += frame.len() as u64;
    }
    Ok(index)
}

fn encode_checked<F>(
    frames: &[F],
    width: u16,
    height: u16,
    frame_rate: u16,
) -> Result<(AssetHeader, Vec<Vec<u8>>)>
where
    F: AsRef<[bool]> + Sync,
{
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize;
    if let Some((index, frame)) = frames
        .iter()
        .enumerate()
        .find(|(_, frame)| frame.as_ref().len() != expected)
    {
        return Err(Error::Dimension {
            index,
            expected,
            actual: frame.as_ref().len(),
        });
    }

    let frame_count = u32::try_from(frames.len())
        .map_err(|_| Error::Capacity(format!("{} frames, count is u32", frames.len())))?;

    let header = AssetHeader::new(width, height, frame_count, frame_rate);
    Ok((header, encode_frames(frames)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::HEADER_SIZE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_layout() {
        let mut builder = AssetBuilder::new(2, 2, 15);
        builder.push(Frame::new(2, 2, vec![false, false, true, true]));
        builder.push(Frame::new(2, 2, vec![true; 4]));

        let blob = builder.build().unwrap();
        #[rustfmt::skip]
        let expected = vec![
            2, 0, 2, 0, 2, 0, 0, 0, 15, 0, 0, 0, // header
            0, 0, 0, 0, 5, 0, 0, 0,              // index
            0, 2, 0, 2, 0,                       // frame 0
            1, 4, 0,                             // frame 1
        ];
        assert_eq!(blob, expected);
    }

    #[test]
    fn test_build_zero_frames() {
        let blob = build_asset::<Frame>(&[], 4, 4, 30).unwrap();
        assert_eq!(blob.len(), HEADER_SIZE);
    }

    #[test]
    fn test_build_rejects_wrong_size() {
        let frames = vec![Frame::blank(2, 2), Frame::blank(3, 2)];

        match build_asset(&frames, 2, 2, 15) {
            Err(Error::Dimension {
                index: 1,
                expected: 4,
                actual: 6,
            }) => {}
            other => panic!("expected dimension error, got {other:?}"),
        }

        let mut sink = Vec::new();
        let mut builder = AssetBuilder::new(2, 2, 15);
        builder.push(Frame::blank(1, 1));
        assert!(builder.build_to(&mut sink).is_err());
        assert!(sink.is_empty(), "nothing is written on a dimension error");
    }

    #[test]
    fn test_build_rejects_zero_area() {
        assert!(matches!(
            build_asset::<Frame>(&[], 0, 10, 15),
            Err(Error::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_build_to_reports_stats() {
        let mut builder = AssetBuilder::new(4, 2, 10);
        builder.push(Frame::blank(4, 2));
        builder.push(Frame::from_fn(4, 2, |x, _| x % 2 == 0));

        let mut blob = Vec::new();
        let stats = builder.build_to(&mut blob).unwrap();

        assert_eq!(stats.frame_count, 2);
        assert_eq!(stats.blob_bytes, blob.len() as u64);
        // blank: marker + 1 run, striped: marker + 8 runs
        assert_eq!(stats.encoded_bytes, 3 + 17);
        assert_eq!(stats.largest_frame, 17);
        assert_eq!(stats.raw_bytes, 2);
    }
}
