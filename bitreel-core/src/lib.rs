//! bitreel Core Library
//!
//! This library provides the bit-level run-length frame codec and the indexed
//! binary container ("asset blob") used to ship monochrome video to devices
//! with limited flash and no video decoder.

pub mod builder;
pub mod codec;
pub mod container;
pub mod frame;
pub mod reader;

pub use builder::{build_asset, AssetBuilder};
pub use codec::{decode_frame, encode_frame};
pub use container::{AssetHeader, AssetStats, HEADER_SIZE};
pub use frame::Frame;
pub use reader::AssetReader;

/// Result type for bitreel-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bitreel-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame {index} has {actual} pixels, expected {expected}")]
    Dimension {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u16, height: u16 },

    #[error("Invalid asset format: {0}")]
    Format(#[from] FormatError),

    #[error("Frame index {index} out of range (asset has {frame_count} frames)")]
    Index { index: usize, frame_count: u32 },

    #[error("Asset exceeds format capacity: {0}")]
    Capacity(String),
}

/// Ways a blob or an encoded frame can be malformed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("blob is {actual} bytes, need at least {needed}")]
    Truncated { needed: usize, actual: usize },

    #[error("unsupported version (flags = {0:#06x})")]
    UnsupportedFlags(u16),

    #[error("header declares a zero-area frame ({width}x{height})")]
    ZeroArea { width: u16, height: u16 },

    #[error("frame {frame} offset {offset} is out of order or past the data section ({data_len} bytes)")]
    BadOffset {
        frame: usize,
        offset: u32,
        data_len: usize,
    },

    #[error("encoded frame is empty")]
    MissingMarker,

    #[error("first-value marker must be 0 or 1, got {0}")]
    InvalidMarker(u8),

    #[error("run length at byte {offset} is cut short")]
    TruncatedRun { offset: usize },

    #[error("runs cover {decoded} pixels, frame has {expected}")]
    PixelCount { expected: usize, decoded: usize },

    #[error("{0} trailing bytes after the last run")]
    TrailingBytes(usize),
}
