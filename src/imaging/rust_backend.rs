//! Pure Rust codec built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff format + dimensions | `ImageReader::with_guessed_format` + `into_dimensions` |
//! | Decode (JPEG, PNG, GIF, WebP, TIFF) | `image` crate decoders |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `JpegEncoder::new_with_quality` (RGB only) |
//! | Encode → PNG | `PngEncoder` with best compression, adaptive filter |
//! | Encode → GIF | `GifEncoder`, single frame |
//! | Encode → WebP | `WebPEncoder::new_lossless` |
//! | Encode → TIFF | `DynamicImage::write_to` |
//! | Encode → AVIF | `AvifEncoder` (rav1e, speed 6) |

use super::backend::{CodecError, Dimensions, ImageCodec, SourceInfo};
use super::operations::check_resize;
use super::params::{EncodeParams, OutputFormat, ResizeParams};
use image::codecs::avif::AvifEncoder;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Frame, ImageFormat, ImageReader};
use std::io::Cursor;

/// Source formats whose decoders are compiled in.
///
/// No AVIF: the `"avif"` feature only enables the
/// **encoder**, even though `ImageFormat::reading_enabled()` reports `true`.
const DECODABLE: &[(ImageFormat, OutputFormat)] = &[
    (ImageFormat::Jpeg, OutputFormat::Jpeg),
    (ImageFormat::Png, OutputFormat::Png),
    (ImageFormat::Gif, OutputFormat::Gif),
    (ImageFormat::WebP, OutputFormat::WebP),
    (ImageFormat::Tiff, OutputFormat::Tiff),
];

/// Codec backed by the `image` crate. Holds no state; safe to share across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

/// Map a sniffed container format to one we can both read and write.
fn source_format(format: ImageFormat) -> Result<OutputFormat, CodecError> {
    DECODABLE
        .iter()
        .find(|(fmt, _)| *fmt == format && fmt.reading_enabled())
        .map(|(_, out)| *out)
        .ok_or_else(|| CodecError::UnsupportedFormat(format!("{format:?}")))
}

/// Build a reader over `data` with the format guessed from its magic bytes.
fn sniff(data: &[u8]) -> Result<(ImageReader<Cursor<&[u8]>>, OutputFormat), CodecError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| CodecError::UnsupportedFormat("unrecognized image data".to_string()))?;
    let kind = source_format(format)?;
    Ok((reader, kind))
}

fn decode(data: &[u8]) -> Result<DynamicImage, CodecError> {
    let (reader, _) = sniff(data)?;
    reader
        .decode()
        .map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode `img` into a fresh buffer.
fn encode(img: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, CodecError> {
    let mut buf = Cursor::new(Vec::new());
    let quality = params.quality.value() as u8;

    let result = match params.format {
        // JPEG has no alpha channel
        OutputFormat::Jpeg => img
            .to_rgb8()
            .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality)),
        OutputFormat::Png => img.write_with_encoder(PngEncoder::new_with_quality(
            &mut buf,
            CompressionType::Best,
            PngFilterType::Adaptive,
        )),
        OutputFormat::Gif => {
            // The trailer is written when the encoder drops at the end of this block
            let mut encoder = GifEncoder::new(&mut buf);
            encoder.encode_frame(Frame::new(img.to_rgba8()))
        }
        OutputFormat::WebP => img
            .to_rgba8()
            .write_with_encoder(WebPEncoder::new_lossless(&mut buf)),
        OutputFormat::Tiff => img.write_to(&mut buf, ImageFormat::Tiff),
        OutputFormat::Avif => {
            img.write_with_encoder(AvifEncoder::new_with_speed_quality(&mut buf, 6, quality))
        }
    };

    result.map_err(|e| CodecError::Encode {
        format: params.format,
        message: e.to_string(),
    })?;
    Ok(buf.into_inner())
}

impl ImageCodec for RustCodec {
    fn identify(&self, data: &[u8]) -> Result<SourceInfo, CodecError> {
        let (reader, format) = sniff(data)?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| CodecError::Decode(format!("Failed to read dimensions: {e}")))?;
        Ok(SourceInfo {
            format,
            dimensions: Dimensions { width, height },
        })
    }

    fn reencode(&self, data: &[u8], params: &EncodeParams) -> Result<Vec<u8>, CodecError> {
        let img = decode(data)?;
        encode(&img, params)
    }

    fn resize(&self, data: &[u8], params: &ResizeParams) -> Result<Vec<u8>, CodecError> {
        check_resize(params)?;
        let img = decode(data)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        encode(&resized, &params.encode)
    }
}
