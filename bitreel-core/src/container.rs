//! Asset blob header, frame index and statistics
//!
//! Layout, little-endian throughout, no padding:
//!
//! ```text
//! offset 0:  u16 width
//! offset 2:  u16 height
//! offset 4:  u32 frame_count
//! offset 8:  u16 frame_rate
//! offset 10: u16 flags (must be 0)
//! offset 12: u32[frame_count]   frame index, relative to the frame data
//! offset 12+4*frame_count:      concatenated bit-RLE frames
//! ```

use crate::{Error, FormatError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 12;

/// Size of one frame index entry in bytes
pub const INDEX_ENTRY_SIZE: usize = 4;

/// The only flags value this version understands
const FLAGS_V1: u16 = 0;

/// Asset blob header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetHeader {
    /// Frame width in pixels
    pub width: u16,
    /// Frame height in pixels
    pub height: u16,
    /// Number of frames in the asset
    pub frame_count: u32,
    /// Playback rate in frames per second
    pub frame_rate: u16,
    /// Reserved, always 0
    pub flags: u16,
}

impl AssetHeader {
    /// Creates a new header for the current format version
    pub fn new(width: u16, height: u16, frame_count: u32, frame_rate: u16) -> Self {
        Self {
            width,
            height,
            frame_count,
            frame_rate,
            flags: FLAGS_V1,
        }
    }

    /// Pixels per frame
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes taken by the header plus the frame index
    pub fn data_start(&self) -> usize {
        HEADER_SIZE + INDEX_ENTRY_SIZE * self.frame_count as usize
    }

    /// Reads a header from a reader and validates it.
    ///
    /// A reader that ends before the full header yields
    /// [`FormatError::Truncated`].
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        reader.take(HEADER_SIZE as u64).read_to_end(&mut bytes)?;
        if bytes.len() < HEADER_SIZE {
            return Err(FormatError::Truncated {
                needed: HEADER_SIZE,
                actual: bytes.len(),
            }
            .into());
        }

        let reader = &mut bytes.as_slice();
        let width = reader.read_u16::<LittleEndian>()?;
        let height = reader.read_u16::<LittleEndian>()?;
        let frame_count = reader.read_u32::<LittleEndian>()?;
        let frame_rate = reader.read_u16::<LittleEndian>()?;
        let flags = reader.read_u16::<LittleEndian>()?;

        if flags != FLAGS_V1 {
            return Err(FormatError::UnsupportedFlags(flags).into());
        }
        if width == 0 || height == 0 {
            return Err(FormatError::ZeroArea { width, height }.into());
        }

        Ok(Self {
            width,
            height,
            frame_count,
            frame_rate,
            flags,
        })
    }

    /// Parses a header from the start of a blob
    pub fn parse(blob: &[u8]) -> Result<Self> {
        Self::read(&mut &blob[..])
    }

    /// Writes the header to a writer
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<LittleEndian>(self.width)?;
        writer.write_u16::<LittleEndian>(self.height)?;
        writer.write_u32::<LittleEndian>(self.frame_count)?;
        writer.write_u16::<LittleEndian>(self.frame_rate)?;
        writer.write_u16::<LittleEndian>(self.flags)?;
        Ok(())
    }

    /// Frame period in milliseconds, as the player schedules it
    pub fn frame_delay_ms(&self) -> u64 {
        1000 / self.frame_rate.max(1) as u64
    }

    /// Total playback time in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.frame_count as u64 * 1000 / self.frame_rate.max(1) as u64
    }
}

/// Reads `frame_count` index entries
pub fn read_index<R: Read>(reader: &mut R, frame_count: u32) -> Result<Vec<u32>> {
    let mut index = vec![0u32; frame_count as usize];
    reader.read_u32_into::<LittleEndian>(&mut index)?;
    Ok(index)
}

/// Writes the frame index
pub fn write_index<W: Write>(writer: &mut W, index: &[u32]) -> Result<()> {
    for &offset in index {
        writer.write_u32::<LittleEndian>(offset)?;
    }
    Ok(())
}

/// Checks that every offset is non-decreasing and inside the data section
pub fn validate_index(index: &[u32], data_len: usize) -> Result<()> {
    let mut previous = 0u32;
    for (frame, &offset) in index.iter().enumerate() {
        if offset < previous || offset as usize > data_len {
            return Err(Error::Format(FormatError::BadOffset {
                frame,
                offset,
                data_len,
            }));
        }
        previous = offset;
    }
    Ok(())
}

/// Compression figures for a built asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetStats {
    /// Number of frames
    pub frame_count: u32,
    /// Bytes of encoded frame data (excluding header and index)
    pub encoded_bytes: u64,
    /// Bytes the same frames would take as packed 1-bit bitmaps
    pub raw_bytes: u64,
    /// Size of the largest encoded frame
    pub largest_frame: u64,
    /// Size of the whole blob
    pub blob_bytes: u64,
}

impl AssetStats {
    /// Computes stats from a header and the byte length of every encoded frame
    pub fn from_frame_sizes(header: &AssetHeader, sizes: impl IntoIterator<Item = usize>) -> Self {
        let mut encoded_bytes = 0u64;
        let mut largest_frame = 0u64;
        for size in sizes {
            encoded_bytes += size as u64;
            largest_frame = largest_frame.max(size as u64);
        }

        let bytes_per_frame = header.pixel_count().div_ceil(8) as u64;
        Self {
            frame_count: header.frame_count,
            encoded_bytes,
            raw_bytes: header.frame_count as u64 * bytes_per_frame,
            largest_frame,
            blob_bytes: header.data_start() as u64 + encoded_bytes,
        }
    }

    /// Encoded size as a percentage of the packed 1-bit size
    pub fn ratio_percent(&self) -> f64 {
        if self.raw_bytes == 0 {
            return 0.0;
        }
        100.0 * self.encoded_bytes as f64 / self.raw_bytes as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_header_layout() {
        let header = AssetHeader::new(180, 135, 3, 15);

        let mut buffer = Vec::new();
        header.write(&mut buffer).unwrap();

        assert_eq!(
            buffer,
            vec![180, 0, 135, 0, 3, 0, 0, 0, 15, 0, 0, 0],
            "header must be 12 packed LE bytes"
        );
        assert_eq!(buffer.len(), HEADER_SIZE);

        let read_header = AssetHeader::read(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(header, read_header);
    }

    #[test]
    fn test_header_rejects_flags() {
        let mut buffer = Vec::new();
        AssetHeader::new(2, 2, 0, 15).write(&mut buffer).unwrap();
        buffer[10] = 1;

        match AssetHeader::parse(&buffer) {
            Err(Error::Format(FormatError::UnsupportedFlags(1))) => {}
            other => panic!("expected unsupported flags, got {other:?}"),
        }
    }

    #[test]
    fn test_header_rejects_zero_area() {
        let mut buffer = Vec::new();
        AssetHeader::new(0, 5, 0, 15).write(&mut buffer).unwrap();

        assert!(matches!(
            AssetHeader::parse(&buffer),
            Err(Error::Format(FormatError::ZeroArea { width: 0, height: 5 }))
        ));
    }

    #[test]
    fn test_header_truncated() {
        assert!(matches!(
            AssetHeader::parse(&[0u8; 11]),
            Err(Error::Format(FormatError::Truncated {
                needed: 12,
                actual: 11
            }))
        ));
    }

    #[test]
    fn test_header_read_from_stream() {
        let mut short = std::io::Cursor::new(vec![0x02, 0x00, 0x02, 0x00, 0x01]);
        assert!(matches!(
            AssetHeader::read(&mut short),
            Err(Error::Format(FormatError::Truncated {
                needed: 12,
                actual: 5
            }))
        ));

        // Only the header is consumed
        let mut buffer = Vec::new();
        AssetHeader::new(2, 2, 1, 15).write(&mut buffer).unwrap();
        buffer.extend_from_slice(&[0xAA, 0xBB]);
        let mut stream = std::io::Cursor::new(buffer);
        let header = AssetHeader::read(&mut stream).unwrap();
        assert_eq!(header.frame_count, 1);
        assert_eq!(stream.position(), HEADER_SIZE as u64);
    }

    #[test]
    fn test_index_validation() {
        assert!(validate_index(&[0, 3, 3, 9], 10).is_ok());
        assert!(validate_index(&[0, 3, 2], 10).is_err());
        assert!(validate_index(&[0, 11], 10).is_err());
    }

    #[test]
    fn test_stats() {
        let header = AssetHeader::new(3, 3, 2, 15);
        let stats = AssetStats::from_frame_sizes(&header, [3, 5]);

        assert_eq!(stats.encoded_bytes, 8);
        assert_eq!(stats.raw_bytes, 4);
        assert_eq!(stats.largest_frame, 5);
        assert_eq!(stats.blob_bytes, 12 + 8 + 8);
        assert_eq!(stats.ratio_percent(), 200.0);
    }
}
