//! Bit-level run-length frame codec
//!
//! An encoded frame is one marker byte holding the value of the first pixel,
//! followed by `u16` little-endian run lengths. Runs alternate strictly
//! between the two pixel values starting from the marker, so no run carries
//! its own value tag:
//!
//! - a `2` x `2` frame `[0, 0, 1, 1]` encodes as `[0x00][2][2]`
//! - a `1` x `1` frame `[1]` encodes as `[0x01][1]`
//!
//! A run longer than [`MAX_RUN`] is split by emitting `MAX_RUN`, then a
//! zero-length run of the opposite value, then the remainder of the run. The
//! placeholder flips the value once more on decode, which restores the
//! original value for the continuation.
//!
//! There is no length prefix: the decoder stops once it has produced exactly
//! the expected number of pixels.

use crate::FormatError;
use byteorder::{ByteOrder, LittleEndian};

/// Longest run one length field can hold
pub const MAX_RUN: u16 = u16::MAX;

/// What the encoder does with the next pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// Same value, room left in the current run
    Extend,
    /// Value changed: write the finished run and start the other value
    Flush,
    /// Same value but the run is full: write `MAX_RUN` and a zero-length
    /// placeholder, then continue the same value as a fresh run
    OverflowSplit,
}

fn transition(value: bool, count: u16, pixel: bool) -> Transition {
    if pixel != value {
        Transition::Flush
    } else if count == MAX_RUN {
        Transition::OverflowSplit
    } else {
        Transition::Extend
    }
}

/// Encoder state: accumulating `count` pixels of `value`
struct RunEncoder {
    out: Vec<u8>,
    value: bool,
    count: u16,
}

impl RunEncoder {
    fn start(first: bool, capacity: usize) -> Self {
        let mut out = Vec::with_capacity(capacity);
        out.push(first as u8);
        Self {
            out,
            value: first,
            count: 1,
        }
    }

    fn push(&mut self, pixel: bool) {
        match transition(self.value, self.count, pixel) {
            Transition::Extend => self.count += 1,
            Transition::Flush => {
                self.emit(self.count);
                self.value = pixel;
                self.count = 1;
            }
            Transition::OverflowSplit => {
                self.emit(MAX_RUN);
                self.emit(0);
                self.count = 1;
            }
        }
    }

    fn emit(&mut self, length: u16) {
        let mut field = [0u8; 2];
        LittleEndian::write_u16(&mut field, length);
        self.out.extend_from_slice(&field);
    }

    fn finish(mut self) -> Vec<u8> {
        self.emit(self.count);
        self.out
    }
}

/// Encodes one frame's pixels as bit-RLE.
///
/// An empty frame encodes as the single byte `0x00`.
pub fn encode_frame(pixels: &[bool]) -> Vec<u8> {
    let Some((&first, rest)) = pixels.split_first() else {
        return vec![0];
    };

    // Marker plus room for a few runs
    let mut encoder = RunEncoder::start(first, 1 + 2 * 16);
    for &pixel in rest {
        encoder.push(pixel);
    }
    encoder.finish()
}

/// Decodes a bit-RLE frame into exactly `pixel_count` pixels.
///
/// Every run flips the current value, including zero-length runs. Trailing
/// zero-length runs after the last pixel are accepted, since an eager
/// overflow split leaves `[65535][0]` at the end of a frame. Everything else
/// that is not an exact fit is rejected: a missing or invalid marker, a cut
/// length field, runs that fall short of or overshoot `pixel_count`, or
/// non-zero bytes left over once the frame is complete.
pub fn decode_frame(bytes: &[u8], pixel_count: usize) -> Result<Vec<bool>, FormatError> {
    let (&marker, mut runs) = bytes.split_first().ok_or(FormatError::MissingMarker)?;
    let mut value = match marker {
        0 => false,
        1 => true,
        other => return Err(FormatError::InvalidMarker(other)),
    };

    let mut pixels = Vec::with_capacity(pixel_count);
    let mut offset = 1;
    while pixels.len() < pixel_count {
        if runs.is_empty() {
            return Err(FormatError::PixelCount {
                expected: pixel_count,
                decoded: pixels.len(),
            });
        }
        if runs.len() < 2 {
            return Err(FormatError::TruncatedRun { offset });
        }

        let length = LittleEndian::read_u16(&runs[..2]) as usize;
        runs = &runs[2..];
        offset += 2;

        let end = pixels.len() + length;
        if end > pixel_count {
            return Err(FormatError::PixelCount {
                expected: pixel_count,
                decoded: end,
            });
        }
        pixels.resize(end, value);
        value = !value;
    }

    // Zero-length runs after the last pixel add nothing; anything else does
    if runs.len() % 2 != 0 || runs.iter().any(|&b| b != 0) {
        return Err(FormatError::TrailingBytes(runs.len()));
    }

    Ok(pixels)
}
