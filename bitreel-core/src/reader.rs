//! Random-access asset reader

use crate::codec::decode_frame;
use crate::container::{read_index, validate_index, AssetHeader, AssetStats, HEADER_SIZE};
use crate::{Error, FormatError, Frame, Result};
use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Read-only view over an asset blob.
///
/// The reader owns (or borrows, with `B = &[u8]`) the blob bytes and keeps
/// the parsed header and frame index alongside them. Frames are decoded on
/// demand and independently, so `frame_at` takes `&self` and may be called
/// from several threads at once.
#[derive(Debug, Clone)]
pub struct AssetReader<B = Vec<u8>> {
    blob: B,
    header: AssetHeader,
    index: Vec<u32>,
}

impl<B: AsRef<[u8]>> AssetReader<B> {
    /// Parses and validates the header and frame index of `blob`
    pub fn open(blob: B) -> Result<Self> {
        let bytes = blob.as_ref();
        let header = AssetHeader::parse(bytes)?;

        let data_start = header.data_start();
        if bytes.len() < data_start {
            return Err(FormatError::Truncated {
                needed: data_start,
                actual: bytes.len(),
            }
            .into());
        }

        let index = read_index(&mut &bytes[HEADER_SIZE..data_start], header.frame_count)?;
        validate_index(&index, bytes.len() - data_start)?;

        debug!(
            "opened asset {}x{} @ {} fps: {} frames, {} bytes",
            header.width,
            header.height,
            header.frame_rate,
            header.frame_count,
            bytes.len()
        );

        Ok(Self {
            blob,
            header,
            index,
        })
    }

    /// The parsed header
    pub fn header(&self) -> &AssetHeader {
        &self.header
    }

    /// Frame offsets relative to the start of the frame data
    pub fn index(&self) -> &[u32] {
        &self.index
    }

    /// Number of frames in the asset
    pub fn frame_count(&self) -> usize {
        self.index.len()
    }

    /// Frame dimensions as `(width, height)`
    pub fn dimensions(&self) -> (u16, u16) {
        (self.header.width, self.header.height)
    }

    /// The encoded frame data section
    fn data(&self) -> &[u8] {
        &self.blob.as_ref()[self.header.data_start()..]
    }

    /// Bit-RLE bytes of one frame
    pub fn frame_bytes(&self, index: usize) -> Result<&[u8]> {
        let start = *self.index.get(index).ok_or(Error::Index {
            index,
            frame_count: self.header.frame_count,
        })? as usize;

        let data = self.data();
        let end = self
            .index
            .get(index + 1)
            .map_or(data.len(), |&next| next as usize);

        Ok(&data[start..end])
    }

    /// Decodes the frame at `index`
    pub fn frame_at(&self, index: usize) -> Result<Frame> {
        let bytes = self.frame_bytes(index)?;
        let pixels = decode_frame(bytes, self.header.pixel_count())?;
        Ok(Frame::new(self.header.width, self.header.height, pixels))
    }

    /// Decodes frames one by one, in order
    pub fn frames(&self) -> impl Iterator<Item = Result<Frame>> + '_ {
        (0..self.frame_count()).map(move |i| self.frame_at(i))
    }

    /// Compression figures for this asset
    pub fn stats(&self) -> AssetStats {
        let data_len = self.data().len();
        let sizes = self.index.iter().enumerate().map(|(i, &start)| {
            let end = self
                .index
                .get(i + 1)
                .map_or(data_len, |&next| next as usize);
            end - start as usize
        });
        AssetStats::from_frame_sizes(&self.header, sizes)
    }

    /// Returns the underlying blob
    pub fn into_inner(self) -> B {
        self.blob
    }
}

impl<B: AsRef<[u8]> + Sync> AssetReader<B> {
    /// Decodes every frame, in parallel when the `parallel` feature is on
    pub fn decode_all(&self) -> Result<Vec<Frame>> {
        #[cfg(feature = "parallel")]
        {
            (0..self.frame_count())
                .into_par_iter()
                .map(|i| self.frame_at(i))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.frames().collect()
        }
    }
}
