//! High-level image operations.
//!
//! These functions combine calculations with codec execution. They take an
//! [`Operation`], compute parameters, and call the codec. The result keeps
//! the source identity; [`naming`](crate::naming) decides where it goes.

use super::backend::{CodecError, Dimensions, ImageCodec, SourceInfo};
use super::calculations::{fit_longer_edge, within_limits};
use super::params::{EncodeParams, MAX_DIMENSION, MAX_PIXELS, Quality, ResizeParams};
use crate::config::{Operation, ResizeConfig};
use crate::types::ImageValue;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Plan a reduce without executing it: same format, format default quality.
pub fn plan_reduce(source: &SourceInfo) -> EncodeParams {
    EncodeParams::with_default_quality(source.format)
}

/// Plan a resize without executing it.
///
/// Format falls back to the source format, quality to that format's default.
pub fn plan_resize(source: &SourceInfo, spec: &ResizeConfig) -> ResizeParams {
    let format = spec.format.unwrap_or(source.format);
    let quality = spec
        .quality
        .map(Quality::new)
        .unwrap_or_else(|| format.default_quality());
    let target = fit_longer_edge(source.dimensions, spec.size);

    ResizeParams {
        width: target.width,
        height: target.height,
        encode: EncodeParams { format, quality },
    }
}

/// Reject a planned resize whose output raster would be too large to allocate.
pub fn check_resize(params: &ResizeParams) -> Result<()> {
    let target = Dimensions {
        width: params.width,
        height: params.height,
    };
    if within_limits(target) {
        Ok(())
    } else {
        Err(CodecError::TooLarge {
            width: params.width,
            height: params.height,
            max_dimension: MAX_DIMENSION,
            max_pixels: MAX_PIXELS,
        })
    }
}

/// Apply `operation` to `source`, producing a new image with the same identity.
///
/// Backup never touches the codec: the returned value shares the source
/// buffer, so its bytes are identical by construction.
pub fn transform(
    codec: &impl ImageCodec,
    source: &ImageValue,
    operation: &Operation,
) -> Result<ImageValue> {
    match operation {
        Operation::Backup(_) => Ok(source.clone()),
        Operation::Reduce(_) => {
            let info = codec.identify(source.data())?;
            let data = codec.reencode(source.data(), &plan_reduce(&info))?;
            Ok(source.clone().with_data(data))
        }
        Operation::Resize { spec, .. } => {
            let info = codec.identify(source.data())?;
            let params = plan_resize(&info, spec);
            check_resize(&params)?;
            let data = codec.resize(source.data(), &params)?;
            Ok(source.clone().with_data(data))
        }
    }
}
