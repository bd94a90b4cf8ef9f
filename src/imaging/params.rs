//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`operations`](super::operations) module (which
//! decides what bytes to produce) and the [`backend`](super::backend) (which
//! does the actual pixel work). This separation allows swapping codecs
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100). Clamped on construction.
//! - [`OutputFormat`]: Encodable formats and their file extensions.
//! - [`EncodeParams`]: Target format + quality for a re-encode.
//! - [`ResizeParams`]: Target dimensions plus the encode to apply afterwards.

use std::fmt;

/// Longest edge, in pixels, a resize may produce.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest pixel count a resize may produce (100 MP).
pub const MAX_PIXELS: u64 = 100_000_000;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Image formats the codec can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Tiff,
    Avif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Gif,
        OutputFormat::WebP,
        OutputFormat::Tiff,
        OutputFormat::Avif,
    ];

    /// Parse a configuration name, case-insensitively. Accepts the common
    /// extension aliases (`jpg`, `tif`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            "tiff" | "tif" => Some(Self::Tiff),
            "avif" => Some(Self::Avif),
            _ => None,
        }
    }

    /// File extension (without the dot) used when a key is rewritten.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Tiff => "tiff",
            Self::Avif => "avif",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Tiff => "tiff",
            Self::Avif => "avif",
        }
    }

    /// Quality used when the caller does not ask for one.
    ///
    /// Lossless formats report 100; their encoders ignore the value.
    pub fn default_quality(self) -> Quality {
        match self {
            Self::Jpeg => Quality(75),
            Self::Avif => Quality(80),
            Self::Png | Self::Gif | Self::WebP | Self::Tiff => Quality(100),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for a re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub format: OutputFormat,
    pub quality: Quality,
}

impl EncodeParams {
    /// Encode at the format's own default quality.
    pub fn with_default_quality(format: OutputFormat) -> Self {
        Self {
            format,
            quality: format.default_quality(),
        }
    }
}

/// Parameters for a resize: exact output dimensions, then an encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub encode: EncodeParams,
}
