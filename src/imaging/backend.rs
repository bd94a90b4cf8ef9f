//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait defines the three operations every codec must
//! support: identify, reencode, and resize. All of them work on in-memory
//! byte buffers; codecs never see buckets or keys.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec), built on the `image` crate.

use super::params::{EncodeParams, OutputFormat, ResizeParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Target size {width}x{height} exceeds the {max_dimension}px / {max_pixels} pixel limit")]
    TooLarge {
        width: u32,
        height: u32,
        max_dimension: u32,
        max_pixels: u64,
    },
    #[error("Failed to encode {format}: {message}")]
    Encode {
        format: OutputFormat,
        message: String,
    },
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn longer_edge(self) -> u32 {
        self.width.max(self.height)
    }

    pub fn pixels(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    pub format: OutputFormat,
    pub dimensions: Dimensions,
}

/// Trait for image codecs.
///
/// Implementations must be stateless (or internally synchronized): the
/// orchestrator calls them from several rayon workers at once.
pub trait ImageCodec: Sync {
    /// Sniff the format and read dimensions without a full decode.
    fn identify(&self, data: &[u8]) -> Result<SourceInfo, CodecError>;

    /// Decode and encode again without touching the pixel dimensions.
    fn reencode(&self, data: &[u8], params: &EncodeParams) -> Result<Vec<u8>, CodecError>;

    /// Decode, scale to exactly `width`x`height`, and encode.
    fn resize(&self, data: &[u8], params: &ResizeParams) -> Result<Vec<u8>, CodecError>;
}
