//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Largest allowed output width or height.
pub const MAX_DIMENSION: u32 = 32768;

/// Largest allowed output pixel count (100 megapixels).
pub const MAX_PIXELS: u64 = 100_000_000;

/// Check an output size against [`MAX_DIMENSION`] and [`MAX_PIXELS`].
///
/// Returns a description of the violated limit.
pub fn check_dimensions(width: u32, height: u32) -> Result<(), String> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(format!(
            "{}x{} exceeds the {} pixel side limit",
            width, height, MAX_DIMENSION
        ));
    }
    let pixels = width as u64 * height as u64;
    if pixels > MAX_PIXELS {
        return Err(format!(
            "{}x{} is {} pixels, above the {} pixel limit",
            width, height, pixels, MAX_PIXELS
        ));
    }
    Ok(())
}

/// Calculate the largest size that fits within `bounds` while keeping the
/// aspect ratio of `source`.
///
/// Upscaling is allowed: a small source grows until one side touches the
/// bound. Each side is at least 1 pixel and never exceeds its bound.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Bounding box (width, height)
///
/// # Returns
/// * `(width, height)` - Fitted dimensions
///
/// # Examples
/// ```
/// # use sharp_image::imaging::calculate_bounded_dimensions;
/// // 1000x800 into a 100x100 box → 100x80
/// assert_eq!(calculate_bounded_dimensions((1000, 800), (100, 100)), (100, 80));
/// ```
pub fn calculate_bounded_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 {
        return (max_w.max(1), max_h.max(1));
    }

    let scale = f64::min(max_w as f64 / src_w as f64, max_h as f64 / src_h as f64);
    let w = (src_w as f64 * scale).round() as u32;
    let h = (src_h as f64 * scale).round() as u32;

    (w.clamp(1, max_w.max(1)), h.clamp(1, max_h.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_dimensions_accepts_limits() {
        assert!(check_dimensions(MAX_DIMENSION, 1).is_ok());
        assert!(check_dimensions(10_000, 10_000).is_ok());
    }

    #[test]
    fn check_dimensions_rejects_long_side() {
        assert!(check_dimensions(MAX_DIMENSION + 1, 1).is_err());
        assert!(check_dimensions(1, u32::MAX).is_err());
    }

    #[test]
    fn check_dimensions_rejects_pixel_count() {
        assert!(check_dimensions(20_000, 20_000).is_err());
    }

    #[test]
    fn landscape_into_square_box() {
        // 1000x800 → 100x100: width limits, 800 * 0.1 = 80
        assert_eq!(calculate_bounded_dimensions((1000, 800), (100, 100)), (100, 80));
    }

    #[test]
    fn portrait_into_square_box() {
        // 600x900 → 300x300: height limits, 600 * (1/3) = 200
        assert_eq!(calculate_bounded_dimensions((600, 900), (300, 300)), (200, 300));
    }

    #[test]
    fn same_aspect_fills_box_exactly() {
        assert_eq!(calculate_bounded_dimensions((800, 600), (400, 300)), (400, 300));
    }

    #[test]
    fn wide_box_limited_by_height() {
        // 1000x800 → 500x100: height limits, 1000 * 0.125 = 125
        assert_eq!(calculate_bounded_dimensions((1000, 800), (500, 100)), (125, 100));
    }

    #[test]
    fn small_source_is_upscaled() {
        // 100x50 → 400x400: width limits, 50 * 4 = 200
        assert_eq!(calculate_bounded_dimensions((100, 50), (400, 400)), (400, 200));
    }

    #[test]
    fn extreme_aspect_never_collapses_to_zero() {
        assert_eq!(calculate_bounded_dimensions((10_000, 1), (100, 100)), (100, 1));
        assert_eq!(calculate_bounded_dimensions((1, 10_000), (100, 100)), (1, 100));
    }

    #[test]
    fn rounding_preserves_ratio() {
        // 1920x1080 → 320x320: 1080 * (1/6) = 180
        let (w, h) = calculate_bounded_dimensions((1920, 1080), (320, 320));
        assert_eq!((w, h), (320, 180));
        let original = 1920.0 / 1080.0;
        let fitted = w as f64 / h as f64;
        assert!((original - fitted).abs() < 0.01);
    }

    #[test]
    fn never_exceeds_bounds() {
        for &(src, bounds) in &[
            ((333, 777), (100, 50)),
            ((1001, 999), (17, 23)),
            ((7, 3), (1000, 1)),
            ((4000, 3000), (1, 1)),
        ] {
            let (w, h) = calculate_bounded_dimensions(src, bounds);
            assert!(w <= bounds.0 && h <= bounds.1, "{src:?} into {bounds:?} gave {w}x{h}");
            assert!(w >= 1 && h >= 1);
        }
    }
}
