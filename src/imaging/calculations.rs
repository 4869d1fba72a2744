//! Pure calculation functions for thumbnail dimensions.
//!
//! Everything here is testable without any I/O or pixels.

/// Default target width for landscape thumbnails (width > height).
pub const THUMB_WIDE_EDGE: u32 = 200;

/// Default target height for portrait and square thumbnails.
pub const THUMB_TALL_EDGE: u32 = 300;

/// Calculate thumbnail dimensions from the source dimensions.
///
/// `targets` is `(wide_edge, tall_edge)`: landscape sources scale so the
/// width lands exactly on the wide edge; portrait and square sources scale
/// so the height lands exactly on the tall edge. The other edge preserves
/// the aspect ratio.
///
/// The arithmetic is deliberate: the scale ratio is `larger_edge / target`
/// and both output edges are floor-divided by it. Earlier exports were
/// produced this way with the default 200/300 targets and regenerated
/// thumbnails must match them pixel for pixel, so a rounding change here is
/// a data change.
///
/// # Examples
/// ```
/// # use tagpack::imaging::{thumbnail_dimensions, THUMB_TALL_EDGE, THUMB_WIDE_EDGE};
/// // 300x450 portrait → height pinned to 300
/// assert_eq!(
///     thumbnail_dimensions((300, 450), (THUMB_WIDE_EDGE, THUMB_TALL_EDGE)),
///     (200, 300)
/// );
///
/// // 450x300 landscape → width pinned to 200
/// assert_eq!(
///     thumbnail_dimensions((450, 300), (THUMB_WIDE_EDGE, THUMB_TALL_EDGE)),
///     (200, 133)
/// );
/// ```
pub fn thumbnail_dimensions(source: (u32, u32), targets: (u32, u32)) -> (u32, u32) {
    let (width, height) = source;
    let (wide_edge, tall_edge) = targets;
    if width == 0 || height == 0 || wide_edge == 0 || tall_edge == 0 {
        return source;
    }

    let ratio = if width > height {
        width as f64 / wide_edge as f64
    } else {
        height as f64 / tall_edge as f64
    };

    (
        (width as f64 / ratio).floor() as u32,
        (height as f64 / ratio).floor() as u32,
    )
}
