//! Shared test utilities for the image-fanout test suite.
//!
//! Provides synthetic image fixtures and a ready-made source object so
//! processor tests don't each rebuild the same setup.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let (storage, source_len) = source_storage();
//! let report = process(&storage, source_event(), &config).unwrap();
//! assert!(report[0].size < source_len);
//! ```

use crate::event::StorageEvent;
use crate::storage::tests::MemoryStorage;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

pub const SOURCE_BUCKET: &str = "sourcebucket";
pub const SOURCE_KEY: &str = "HappyFace.jpg";
pub const SOURCE_WIDTH: u32 = 640;
pub const SOURCE_HEIGHT: u32 = 480;

// =========================================================================
// Fixture images
// =========================================================================

/// Photo-like RGB pixels: smooth gradients plus deterministic grain.
///
/// The grain matters. Flat test images compress to almost nothing at any
/// quality, which would hide the size difference a reduce should produce.
pub fn photo_pixels(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let grain = (x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663)) % 48;
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x + y) % 256) as u8;
        image::Rgb([
            r.saturating_add(grain as u8),
            g.saturating_add((grain / 2) as u8),
            b.wrapping_add(grain as u8),
        ])
    })
}

/// A JPEG at quality 100, like a camera original.
pub fn photo_fixture(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 100)
        .encode_image(&photo_pixels(width, height))
        .unwrap();
    buf
}

/// Photo pixels encoded in any format the `image` crate writes.
pub fn encode_fixture(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    photo_pixels(width, height)
        .write_to(&mut buf, format)
        .unwrap();
    buf.into_inner()
}

// =========================================================================
// Source object
// =========================================================================

/// The trigger event for the standard source object.
pub fn source_event() -> StorageEvent {
    StorageEvent::new(SOURCE_BUCKET, SOURCE_KEY)
}

/// In-memory storage holding the standard 640x480 JPEG source.
///
/// Returns the storage and the source's byte length.
pub fn source_storage() -> (MemoryStorage, usize) {
    let fixture = photo_fixture(SOURCE_WIDTH, SOURCE_HEIGHT);
    let len = fixture.len();
    (MemoryStorage::with_object(SOURCE_BUCKET, SOURCE_KEY, fixture), len)
}
