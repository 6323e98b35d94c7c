//! Renderer
//!
//! Repaints the whole surface from the style state:
//!
//! ```text
//! background fill
//!     │
//! font shorthand ──► resolve face (custom → system → fallback)
//!     │
//! shape line ──► glyph coverage mask (centered, middle baseline)
//!     │              └── synthetic bold / italic when the face lacks them
//! blend mask in text color
//!     │
//! underline stroke (optional)
//! ```
//!
//! Identical input always yields identical pixels.

pub mod descriptor;

use log::{debug, trace};

use crate::constants::{SYNTHETIC_BOLD_SCALE, SYNTHETIC_ITALIC_SKEW};
use crate::drawing::geometry::{
    centered_start, middle_baseline, shear_offset, underline_geometry,
};
use crate::drawing::{CoverageMask, Surface};
use crate::font::resolver::{FontResolver, MatchType, ResolvedFont};
use crate::font::shaper::{shape, single_line, ShapedRun};
use crate::style::StyleState;

pub use descriptor::FontDescriptor;

/// Rasterized glyph as fontdue returns it (rows top to bottom)
struct GlyphBitmap<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl GlyphBitmap<'_> {
    #[inline]
    fn at(&self, col: i32, row: usize) -> f32 {
        if col < 0 || col as usize >= self.width {
            return 0.0;
        }
        self.data[row * self.width + col as usize] as f32 / 255.0
    }

    /// Linearly interpolated coverage at continuous x (pixel centers at
    /// c + 0.5)
    #[inline]
    fn sample(&self, x: f32, row: usize) -> f32 {
        let t = x - 0.5;
        let c0 = t.floor();
        let f = t - c0;
        let c0 = c0 as i32;
        self.at(c0, row) * (1.0 - f) + self.at(c0 + 1, row) * f
    }
}

/// How one glyph is placed into the mask
#[derive(Debug, Clone, Copy)]
struct Placement {
    /// Left edge of the bitmap (pixels, may be fractional)
    left: f32,
    /// Top row of the bitmap
    top: i32,
    /// Baseline row used as the shear pivot
    baseline: f32,
    skew: f32,
    /// Horizontal emboldening distance (pixels)
    embolden: f32,
}

/// Stateless renderer
pub struct Renderer;

impl Renderer {
    /// Repaint `surface` from `style`.
    pub fn render(style: &StyleState, fonts: &mut FontResolver<'_>, surface: &mut Surface) {
        let width = surface.width() as f32;
        let height = surface.height() as f32;

        // 1. Background
        surface.fill(style.background_color);
        surface.mark_painted();

        // 2. Font shorthand
        let descriptor = FontDescriptor::from_style(style);
        trace!("Render font: {}", descriptor);
        let Some(resolved) = fonts.resolve(&descriptor) else {
            debug!("No face for \"{}\", text skipped", descriptor);
            return;
        };
        if resolved.match_type == MatchType::Fallback {
            debug!("\"{}\" drawn with a fallback face", descriptor);
        }

        // 3-4. Text centered on the surface
        let px = style.font_size_px as f32;
        let cx = width / 2.0;
        let cy = height / 2.0;
        let text = single_line(&style.text);
        let run = shape(&resolved.face, &text, px);

        let mask = Self::compose_text(&resolved, &run, px, cx, cy, surface);
        if !mask.is_empty() {
            surface.blend_mask(&mask, style.text_color);
        }

        // 5. Underline
        if style.underline {
            let g = underline_geometry(px, cx, cy, run.width);
            trace!(
                "Underline: x {:.1}..{:.1}, y {:.1}, width {:.2}",
                g.x0,
                g.x1,
                g.y,
                g.thickness
            );
            surface.fill_rect_aa(g.x0, g.top(), g.x1, g.bottom(), style.text_color);
        }
    }

    /// Rasterize the shaped run into a coverage mask the size of `surface`
    fn compose_text(
        resolved: &ResolvedFont,
        run: &ShapedRun,
        px: f32,
        cx: f32,
        cy: f32,
        surface: &Surface,
    ) -> CoverageMask {
        let mut mask = CoverageMask::new(surface.width(), surface.height());
        if run.glyphs.is_empty() {
            return mask;
        }

        let font = resolved.face.font();
        let (ascent, descent) = resolved.face.line_metrics(px);
        let baseline = middle_baseline(cy, ascent, descent).round();
        let start_x = centered_start(cx, run.width);
        let skew = if resolved.synthetic_italic {
            SYNTHETIC_ITALIC_SKEW
        } else {
            0.0
        };
        let embolden = if resolved.synthetic_bold {
            (px * SYNTHETIC_BOLD_SCALE).max(0.5)
        } else {
            0.0
        };

        for glyph in &run.glyphs {
            let (metrics, data) = font.rasterize_indexed(glyph.glyph_id, px);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            let bitmap = GlyphBitmap {
                width: metrics.width,
                height: metrics.height,
                data: &data,
            };
            // fontdue metrics are y-up: ymin is the bitmap bottom relative
            // to the baseline
            let glyph_baseline = baseline - glyph.y.round();
            let placement = Placement {
                left: start_x + glyph.x + metrics.xmin as f32,
                top: glyph_baseline as i32 - (metrics.height as i32 + metrics.ymin),
                baseline: glyph_baseline,
                skew,
                embolden,
            };
            Self::draw_glyph(&mut mask, &bitmap, placement);
        }
        mask
    }

    fn draw_glyph(mask: &mut CoverageMask, bitmap: &GlyphBitmap<'_>, p: Placement) {
        // Emboldening smears the glyph rightwards in half-pixel steps
        let steps = (p.embolden * 2.0).ceil() as i32;

        for row in 0..bitmap.height {
            let y = p.top + row as i32;
            let dx = shear_offset(p.skew, p.baseline, y as f32 + 0.5);
            let origin = p.left + dx;

            let x_start = origin.floor() as i32;
            let x_end = (origin + bitmap.width as f32 + p.embolden).ceil() as i32 + 1;
            for x in x_start..x_end {
                let src_x = x as f32 + 0.5 - origin;
                let mut cov = bitmap.sample(src_x, row);
                for s in 1..=steps {
                    let shift = (s as f32 * 0.5).min(p.embolden);
                    cov = cov.max(bitmap.sample(src_x - shift, row));
                }
                mask.accumulate(x, y, cov);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::face::LoadedFace;
    use crate::font::registry::FontRegistry;
    use crate::font::resolver::NoSystemFonts;
    use crate::font::test_support::minimal_sfnt;
    use crate::utils::color::Color;
    use std::sync::Arc;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn paint_with(registry: &FontRegistry, style: &StyleState) -> Surface {
        let mut system = NoSystemFonts;
        let mut resolver = FontResolver::new(registry, &mut system);
        let mut surface = Surface::new(800, 400);
        Renderer::render(style, &mut resolver, &mut surface);
        surface
    }

    fn paint(style: &StyleState) -> Surface {
        paint_with(&FontRegistry::new(), style)
    }

    /// "Hi" at 48px in the box font: each letter advances 24px and inks
    /// x 2.4..21.6 of its cell, rows 0..33.6 above the baseline
    fn box_style() -> (FontRegistry, StyleState) {
        let mut registry = FontRegistry::new();
        let face = LoadedFace::from_bytes(minimal_sfnt(), 0).unwrap();
        registry.register("Box", "Box.ttf", Arc::new(face));
        let style = StyleState {
            text: "Hi".into(),
            font_family: "Box".into(),
            ..StyleState::default()
        };
        (registry, style)
    }

    fn inked_columns(s: &Surface, row: u32) -> Vec<u32> {
        (0..s.width()).filter(|&x| s.pixel(x, row) != WHITE).collect()
    }

    #[test]
    fn test_background_fills_surface() {
        let mut style = StyleState::default();
        style.background_color = Color::rgb(0x20, 0x20, 0x20);
        let s = paint(&style);
        assert!(s.is_painted());
        assert_eq!(s.pixel(0, 0), [0x20, 0x20, 0x20, 255]);
        assert_eq!(s.pixel(799, 399), [0x20, 0x20, 0x20, 255]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let (registry, mut style) = box_style();
        style.underline = true;
        style.bold = true;
        style.italic = true;
        let a = paint_with(&registry, &style);
        let b = paint_with(&registry, &style);
        assert!(a.as_raw().chunks(4).any(|px| px != WHITE));
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_text_centered_on_surface() {
        let (registry, style) = box_style();
        let s = paint_with(&registry, &style);

        // Baseline: 200 + (38.4 - 9.6) / 2 = 214.4, rounded to 214
        let cols = inked_columns(&s, 195);
        assert_eq!(cols.first(), Some(&378));
        assert_eq!(cols.last(), Some(&421));
        assert_eq!(s.pixel(388, 195), BLACK);
        assert_eq!(s.pixel(412, 195), BLACK);
        // Gap between the letters
        assert_eq!(s.pixel(400, 195), WHITE);
        // Ink stays between the glyph top (180.4) and the baseline
        assert_eq!(s.pixel(388, 177), WHITE);
        assert_eq!(s.pixel(388, 182), BLACK);
        assert_eq!(s.pixel(388, 212), BLACK);
        assert_eq!(s.pixel(388, 216), WHITE);
    }

    #[test]
    fn test_underline_pixels() {
        let (registry, mut style) = box_style();
        style.underline = true;
        let s = paint_with(&registry, &style);

        // Stroke 2.4px wide centered 4.8px below 200: rows 203.6..206.0,
        // spanning the 48px run from x 376 to 424. Column 400 is between
        // the letters, so only the underline inks it.
        assert_eq!(s.pixel(400, 202), WHITE);
        let partial = s.pixel(400, 203)[0];
        assert!((140..=165).contains(&partial), "row 203: {}", partial);
        assert_eq!(s.pixel(400, 204), BLACK);
        assert_eq!(s.pixel(400, 205), BLACK);
        assert_eq!(s.pixel(400, 206), WHITE);

        assert_eq!(s.pixel(376, 205), BLACK);
        assert_eq!(s.pixel(423, 205), BLACK);
        assert_eq!(s.pixel(375, 205), WHITE);
        assert_eq!(s.pixel(424, 205), WHITE);

        let plain = paint_with(&registry, &box_style().1);
        assert_eq!(plain.pixel(400, 205), WHITE);
    }

    #[test]
    fn test_sample_interpolates() {
        let data = [0u8, 255, 0];
        let bm = GlyphBitmap {
            width: 3,
            height: 1,
            data: &data,
        };
        assert_eq!(bm.sample(1.5, 0), 1.0);
        assert_eq!(bm.sample(0.5, 0), 0.0);
        assert!((bm.sample(1.0, 0) - 0.5).abs() < 1e-6);
        assert_eq!(bm.sample(-3.0, 0), 0.0);
    }

    #[test]
    fn test_draw_glyph_shear_and_bold() {
        let data = [255u8; 4]; // 1 wide, 4 tall
        let bm = GlyphBitmap {
            width: 1,
            height: 4,
            data: &data,
        };
        let mut plain = CoverageMask::new(10, 10);
        let base = Placement {
            left: 5.0,
            top: 2,
            baseline: 6.0,
            skew: 0.0,
            embolden: 0.0,
        };
        Renderer::draw_glyph(&mut plain, &bm, base);
        assert_eq!(plain.get(5, 2), 1.0);
        assert_eq!(plain.get(6, 2), 0.0);

        let mut bold = CoverageMask::new(10, 10);
        Renderer::draw_glyph(&mut bold, &bm, Placement { embolden: 1.0, ..base });
        assert_eq!(bold.get(5, 3), 1.0);
        assert_eq!(bold.get(6, 3), 1.0);

        let mut italic = CoverageMask::new(10, 10);
        Renderer::draw_glyph(&mut italic, &bm, Placement { skew: 1.0, ..base });
        // Top row (center 2.5) leans 3.5px right of the baseline pivot
        assert_eq!(italic.get(5, 2), 0.0);
        assert!(italic.get(8, 2) > 0.0 || italic.get(9, 2) > 0.0);
    }
}
