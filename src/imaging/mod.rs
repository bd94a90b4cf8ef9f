//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::with_guessed_format` |
//! | **Reduce** | decode + re-encode at the format's default quality |
//! | **Resize** | Lanczos3 + per-format encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageCodec`] trait + [`RustCodec`]
//! - **Operations**: The transform step, combining calculations + codec

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{CodecError, Dimensions, ImageCodec, SourceInfo};
pub use calculations::{fit_longer_edge, within_limits};
pub use operations::{check_resize, plan_reduce, plan_resize, transform};
pub use params::{EncodeParams, MAX_DIMENSION, MAX_PIXELS, OutputFormat, Quality, ResizeParams};
pub use rust_backend::RustCodec;
