//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use super::params::{MAX_DIMENSION, MAX_PIXELS};

/// Scale `original` so its longer edge equals `size`, preserving aspect ratio.
///
/// The shorter edge is rounded to the nearest pixel and never drops below 1.
/// Upscaling is allowed: a 50px source asked for 100 comes back at 100.
///
/// # Examples
/// ```
/// # use image_fanout::imaging::{Dimensions, fit_longer_edge};
/// let out = fit_longer_edge(Dimensions { width: 2000, height: 1500 }, 1000);
/// assert_eq!((out.width, out.height), (1000, 750));
/// ```
pub fn fit_longer_edge(original: Dimensions, size: u32) -> Dimensions {
    let Dimensions {
        width: orig_w,
        height: orig_h,
    } = original;

    if orig_w >= orig_h {
        // Landscape or square
        let ratio = size as f64 / orig_w as f64;
        Dimensions {
            width: size,
            height: scale_edge(orig_h, ratio),
        }
    } else {
        // Portrait
        let ratio = size as f64 / orig_h as f64;
        Dimensions {
            width: scale_edge(orig_w, ratio),
            height: size,
        }
    }
}

/// Whether a raster of `target` size is small enough to allocate.
///
/// Both the longer edge and the total pixel count are capped, so extreme
/// aspect ratios can't slip past a single bound.
pub fn within_limits(target: Dimensions) -> bool {
    target.longer_edge() <= MAX_DIMENSION && target.pixels() <= MAX_PIXELS
}

fn scale_edge(edge: u32, ratio: f64) -> u32 {
    ((edge as f64 * ratio).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn landscape_width_becomes_size() {
        // 2000x1500 → 1000 on the longer edge
        assert_eq!(fit_longer_edge(dims(2000, 1500), 1000), dims(1000, 750));
    }

    #[test]
    fn portrait_height_becomes_size() {
        assert_eq!(fit_longer_edge(dims(1500, 2000), 1000), dims(750, 1000));
    }

    #[test]
    fn square_stays_square() {
        assert_eq!(fit_longer_edge(dims(640, 640), 100), dims(100, 100));
    }

    #[test]
    fn shorter_edge_is_rounded() {
        // 640x480 → 100: 480 * 100/640 = 75
        assert_eq!(fit_longer_edge(dims(640, 480), 100), dims(100, 75));
        // 1000x333 → 100: 33.3 → 33
        assert_eq!(fit_longer_edge(dims(1000, 333), 100), dims(100, 33));
        // 1000x335 → 100: 33.5 → 34
        assert_eq!(fit_longer_edge(dims(1000, 335), 100), dims(100, 34));
    }

    #[test]
    fn extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_longer_edge(dims(10_000, 10), 100), dims(100, 1));
        assert_eq!(fit_longer_edge(dims(3, 9_000), 90), dims(1, 90));
    }

    #[test]
    fn smaller_source_is_upscaled() {
        assert_eq!(fit_longer_edge(dims(50, 40), 100), dims(100, 80));
    }

    #[test]
    fn huge_size_does_not_overflow() {
        assert_eq!(
            fit_longer_edge(dims(640, 480), 4_000_000_000),
            dims(4_000_000_000, 3_000_000_000)
        );
    }

    // =========================================================================
    // Allocation limits
    // =========================================================================

    #[test]
    fn within_limits_accepts_ordinary_targets() {
        assert!(within_limits(dims(100, 75)));
        assert!(within_limits(dims(MAX_DIMENSION, 1)));
        assert!(within_limits(dims(10_000, 10_000)));
    }

    #[test]
    fn within_limits_rejects_long_edge() {
        assert!(!within_limits(dims(MAX_DIMENSION + 1, 1)));
        assert!(!within_limits(dims(1, 4_000_000_000)));
    }

    #[test]
    fn within_limits_rejects_pixel_count() {
        // Both edges legal, area 268 MP
        assert!(!within_limits(dims(MAX_DIMENSION, MAX_DIMENSION)));
    }
}
