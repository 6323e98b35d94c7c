//! Raster surface
//!
//! Fixed-size opaque RGBA canvas the renderer paints into and the
//! exporter reads from, plus the coverage mask text is composed in.

use image::{Rgba, RgbaImage};

use super::geometry::span_coverage;
use crate::utils::color::{blend_colors, Color};

/// Per-pixel coverage (0.0-1.0) accumulated before blending.
///
/// Overlapping glyphs take the maximum, so shared pixels are not
/// darkened twice.
pub struct CoverageMask {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl CoverageMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width * height) as usize],
        }
    }

    /// Merge `coverage` into pixel (x, y); out-of-bounds pixels are clipped.
    #[inline]
    pub fn accumulate(&mut self, x: i32, y: i32, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 || coverage <= 0.0 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let slot = &mut self.data[idx];
        *slot = slot.max(coverage.min(1.0));
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    /// Whether any pixel is covered
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&c| c <= 0.0)
    }
}

/// The render target
#[derive(Clone)]
pub struct Surface {
    image: RgbaImage,
    painted: bool,
}

impl Surface {
    /// Create a blank (never painted) surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            painted: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the renderer has drawn into this surface
    pub fn is_painted(&self) -> bool {
        self.painted
    }

    pub(crate) fn mark_painted(&mut self) {
        self.painted = true;
    }

    /// Fill every pixel with `color`
    pub fn fill(&mut self, color: Color) {
        let px = Rgba(color.to_rgba());
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Blend `color` into pixel (x, y) with coverage `alpha`
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color, alpha: f32) {
        if x >= self.width() || y >= self.height() || alpha <= 0.0 {
            return;
        }
        let p = self.image.get_pixel_mut(x, y);
        p.0 = blend_colors(p.0, color, alpha);
    }

    /// Composite a coverage mask in `color`
    pub fn blend_mask(&mut self, mask: &CoverageMask, color: Color) {
        let w = self.width().min(mask.width);
        let h = self.height().min(mask.height);
        for y in 0..h {
            for x in 0..w {
                let c = mask.get(x, y);
                if c > 0.0 {
                    self.blend_pixel(x, y, color, c);
                }
            }
        }
    }

    /// Fill the rectangle [x0, x1) × [y0, y1) with anti-aliased edges
    pub fn fill_rect_aa(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let px_start = x0.floor().max(0.0) as i32;
        let px_end = (x1.ceil() as i32).min(self.width() as i32);
        let py_start = y0.floor().max(0.0) as i32;
        let py_end = (y1.ceil() as i32).min(self.height() as i32);

        for py in py_start..py_end {
            let cy = span_coverage(y0, y1, py);
            if cy <= 0.0 {
                continue;
            }
            for px in px_start..px_end {
                let cov = cy * span_coverage(x0, x1, px);
                self.blend_pixel(px as u32, py as u32, color, cov);
            }
        }
    }

    /// Raw RGBA bytes, row-major, top row first
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_blend() {
        let mut s = Surface::new(4, 2);
        assert!(!s.is_painted());
        s.fill(Color::WHITE);
        assert_eq!(s.pixel(3, 1), [255, 255, 255, 255]);
        s.blend_pixel(0, 0, Color::BLACK, 1.0);
        assert_eq!(s.pixel(0, 0), [0, 0, 0, 255]);
        // Out of bounds is ignored
        s.blend_pixel(10, 10, Color::BLACK, 1.0);
    }

    #[test]
    fn test_fill_rect_aa_edges() {
        let mut s = Surface::new(10, 10);
        s.fill(Color::WHITE);
        s.fill_rect_aa(2.0, 4.5, 6.0, 5.5, Color::BLACK);
        // Half covered rows above and below the stroke center
        assert_eq!(s.pixel(3, 4), [128, 128, 128, 255]);
        assert_eq!(s.pixel(3, 5), [128, 128, 128, 255]);
        assert_eq!(s.pixel(1, 4), [255, 255, 255, 255]);
        assert_eq!(s.pixel(6, 4), [255, 255, 255, 255]);
        assert_eq!(s.pixel(3, 6), [255, 255, 255, 255]);
    }

    #[test]
    fn test_mask_takes_max() {
        let mut m = CoverageMask::new(2, 2);
        assert!(m.is_empty());
        m.accumulate(0, 0, 0.4);
        m.accumulate(0, 0, 0.2);
        m.accumulate(-1, 0, 1.0);
        m.accumulate(0, 5, 1.0);
        assert_eq!(m.get(0, 0), 0.4);
        assert!(!m.is_empty());

        let mut s = Surface::new(2, 2);
        s.fill(Color::WHITE);
        m.accumulate(1, 1, 1.0);
        s.blend_mask(&m, Color::rgb(255, 0, 0));
        assert_eq!(s.pixel(1, 1), [255, 0, 0, 255]);
        assert_eq!(s.pixel(1, 0), [255, 255, 255, 255]);
    }
}
