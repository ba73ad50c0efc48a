//! Pixel ↔ normalized coordinate mapping for absolute pointer placement.
//!
//! Absolute injection APIs address the pointer in a normalized space of
//! `0..=NORMALIZED_MAX` on each axis, stretched over the whole addressable
//! desktop (all monitors).  The actuation engine works in pixels and converts
//! only at the last moment.

/// Largest normalized coordinate on either axis.
pub const NORMALIZED_MAX: i32 = 65_535;

/// The addressable display area in pixels: origin (top-left, may be negative
/// on multi-monitor setups) and span (width/height).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DesktopArea {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right-most addressable pixel column (inclusive).
    pub fn max_x(&self) -> i32 {
        self.x + self.width.max(1) - 1
    }

    /// Bottom-most addressable pixel row (inclusive).
    pub fn max_y(&self) -> i32 {
        self.y + self.height.max(1) - 1
    }
}

/// Clamps a pixel position into `area`.
pub fn clamp_to_area(area: &DesktopArea, x: i32, y: i32) -> (i32, i32) {
    (x.clamp(area.x, area.max_x()), y.clamp(area.y, area.max_y()))
}

/// Maps a pixel position into normalized coordinates.
///
/// Each axis is scaled linearly as `(p - origin) * NORMALIZED_MAX / span`,
/// rounded to the nearest integer (halves round up) and clamped to
/// `0..=NORMALIZED_MAX`.  Positions outside the area are clamped first.
///
/// ```rust
/// use relay_core::domain::coords::{to_normalized, DesktopArea};
///
/// let area = DesktopArea::new(0, 0, 1920, 1080);
/// assert_eq!(to_normalized(&area, 960, 540), (32768, 32768));
/// ```
pub fn to_normalized(area: &DesktopArea, x: i32, y: i32) -> (i32, i32) {
    let (x, y) = clamp_to_area(area, x, y);
    (
        scale_axis(x - area.x, area.width),
        scale_axis(y - area.y, area.height),
    )
}

/// Nearest-integer `offset * NORMALIZED_MAX / span` in 64-bit arithmetic.
fn scale_axis(offset: i32, span: i32) -> i32 {
    let span = i64::from(span.max(1));
    let offset = i64::from(offset);
    let scaled = (offset * i64::from(NORMALIZED_MAX) * 2 + span) / (2 * span);
    // The clamp keeps the narrowing cast lossless.
    scaled.clamp(0, i64::from(NORMALIZED_MAX)) as i32
}
