//! Geometric primitives for anti-aliased rendering
//!
//! Pixel coverage of axis-aligned spans, text anchoring and the
//! underline placement rule.

use crate::constants::{UNDERLINE_OFFSET_SCALE, UNDERLINE_THICKNESS_DIVISOR};

/// Fraction of pixel `[p, p + 1)` covered by the span `[a0, a1)`.
///
/// Used for anti-aliased edges of rectangles and strokes.
#[inline]
pub fn span_coverage(a0: f32, a1: f32, p: i32) -> f32 {
    let lo = a0.max(p as f32);
    let hi = a1.min(p as f32 + 1.0);
    (hi - lo).clamp(0.0, 1.0)
}

/// Baseline y for `textBaseline = middle`.
///
/// The middle of the em box sits on `center_y`, so the baseline is
/// pushed down by half of (ascent + descent), descent being negative.
#[inline]
pub fn middle_baseline(center_y: f32, ascent: f32, descent: f32) -> f32 {
    center_y + (ascent + descent) / 2.0
}

/// Left edge of a run of `width` centered on `center_x`
#[inline]
pub fn centered_start(center_x: f32, width: f32) -> f32 {
    center_x - width / 2.0
}

/// Horizontal shift of a pixel row for a sheared (oblique) glyph.
///
/// Rows above the baseline lean right, rows below lean left.
#[inline]
pub fn shear_offset(skew: f32, baseline_y: f32, row_center_y: f32) -> f32 {
    skew * (baseline_y - row_center_y)
}

/// Underline stroke placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnderlineGeometry {
    pub x0: f32,
    pub x1: f32,
    /// Center line of the stroke
    pub y: f32,
    pub thickness: f32,
}

impl UnderlineGeometry {
    /// Top edge of the stroke
    pub fn top(&self) -> f32 {
        self.y - self.thickness / 2.0
    }

    /// Bottom edge of the stroke
    pub fn bottom(&self) -> f32 {
        self.y + self.thickness / 2.0
    }
}

/// Underline for text of `text_width` drawn centered at (`cx`, `cy`):
/// offset `0.1 * size` below center, width `max(1, size / 20)`.
pub fn underline_geometry(font_size_px: f32, cx: f32, cy: f32, text_width: f32) -> UnderlineGeometry {
    UnderlineGeometry {
        x0: cx - text_width / 2.0,
        x1: cx + text_width / 2.0,
        y: cy + font_size_px * UNDERLINE_OFFSET_SCALE,
        thickness: (font_size_px / UNDERLINE_THICKNESS_DIVISOR).max(1.0),
    }
}
