//! bitreel Decoder Library
//!
//! This library renders frames of a bitreel asset back into images and walks
//! them in presentation order.

pub mod playback;
pub mod renderer;

pub use playback::Playback;
pub use renderer::{FrameRenderer, Palette};

/// Result type for bitreel-decoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bitreel-decoder operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("bitreel core error: {0}")]
    Core(#[from] bitreel_core::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Asset has no frames")]
    EmptyAsset,
}
