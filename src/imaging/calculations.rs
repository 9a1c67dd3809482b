//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{ResizeParams, ResizePolicy};

/// Largest width or height a JPEG header can store.
pub const MAX_JPEG_DIMENSION: u32 = 65_535;

/// Whether `(width, height)` fits in a JPEG.
pub fn fits_jpeg(dimensions: (u32, u32)) -> bool {
    dimensions.0 <= MAX_JPEG_DIMENSION && dimensions.1 <= MAX_JPEG_DIMENSION
}

/// Height that keeps the source aspect ratio at `target_width`.
///
/// Rounds half up in exact integer arithmetic and never returns less than 1,
/// so very wide sources still produce a one-pixel-tall strip.
///
/// # Examples
/// ```
/// # use batch_resize::imaging::derive_height;
/// assert_eq!(derive_height((2000, 1000), 1400), 700);
/// // 3 * 2 / 4 = 1.5 rounds up
/// assert_eq!(derive_height((4, 3), 2), 2);
/// ```
pub fn derive_height(source: (u32, u32), target_width: u32) -> u32 {
    let (src_w, src_h) = source;
    if src_w == 0 {
        return src_h.max(1);
    }
    let src_w = u64::from(src_w);
    let scaled = u64::from(src_h) * u64::from(target_width);
    let height = (scaled * 2 + src_w) / (src_w * 2);
    u32::try_from(height).unwrap_or(u32::MAX).max(1)
}

/// Decide the output dimensions for a resize.
///
/// Returns `None` when the policy leaves the image untouched
/// (`OnlyIfWider` and the source is not wider than the target).
pub fn plan_dimensions(source: (u32, u32), params: ResizeParams) -> Option<(u32, u32)> {
    let (src_w, _) = source;
    if params.policy == ResizePolicy::OnlyIfWider && src_w <= params.target_width {
        return None;
    }
    Some((params.target_width, derive_height(source, params.target_width)))
}
