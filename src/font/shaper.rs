//! Text shaping
//!
//! Uses rustybuzz to turn a string into positioned glyph IDs, which
//! gives kerning and ligatures for the single rendered line and the
//! advance width used to center and underline it.

use fontdue::Font;
use log::trace;

use super::face::LoadedFace;

/// One glyph placed on the line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph index in the face
    pub glyph_id: u16,
    /// Pen x position relative to the line start (pixels)
    pub x: f32,
    /// Vertical offset from the baseline, y up (pixels)
    pub y: f32,
}

/// Shaped single line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedRun {
    pub glyphs: Vec<PositionedGlyph>,
    /// Total advance width (pixels)
    pub width: f32,
}

/// Replace line breaks and tabs with spaces; the canvas draws one line.
pub fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_whitespace() && c != ' ' { ' ' } else { c })
        .collect()
}

/// Shape `text` at `px` pixels.
///
/// Falls back to per-character fontdue metrics when rustybuzz cannot
/// parse the face.
pub fn shape(face: &LoadedFace, text: &str, px: f32) -> ShapedRun {
    if text.is_empty() {
        return ShapedRun::default();
    }

    let Some(hb_face) = rustybuzz::Face::from_slice(face.data(), face.index()) else {
        return shape_unshaped(face.font(), text, px);
    };

    let units_per_em = hb_face.units_per_em().max(1) as f32;
    let scale = px / units_per_em;

    let mut buffer = rustybuzz::UnicodeBuffer::new();
    buffer.push_str(text);
    let output = rustybuzz::shape(&hb_face, &[], buffer);

    let mut glyphs = Vec::with_capacity(output.len());
    let mut pen_x = 0.0f32;
    let mut pen_y = 0.0f32;
    for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
        glyphs.push(PositionedGlyph {
            glyph_id: info.glyph_id as u16,
            x: pen_x + pos.x_offset as f32 * scale,
            y: pen_y + pos.y_offset as f32 * scale,
        });
        pen_x += pos.x_advance as f32 * scale;
        pen_y += pos.y_advance as f32 * scale;
    }

    trace!("Shaped {} glyphs, width {:.1}px", glyphs.len(), pen_x);
    ShapedRun {
        glyphs,
        width: pen_x,
    }
}

fn shape_unshaped(font: &Font, text: &str, px: f32) -> ShapedRun {
    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen_x = 0.0f32;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if let Some(p) = prev {
            pen_x += font.horizontal_kern(p, ch, px).unwrap_or(0.0);
        }
        glyphs.push(PositionedGlyph {
            glyph_id: font.lookup_glyph_index(ch),
            x: pen_x,
            y: 0.0,
        });
        pen_x += font.metrics(ch, px).advance_width;
        prev = Some(ch);
    }
    ShapedRun {
        glyphs,
        width: pen_x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::test_support::minimal_sfnt;

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\nb\tc\r\nd"), "a b c  d");
        assert_eq!(single_line("plain"), "plain");
    }

    #[test]
    fn test_empty_text_has_no_width() {
        let face = LoadedFace::from_bytes(minimal_sfnt(), 0).unwrap();
        let run = shape(&face, "", 48.0);
        assert!(run.glyphs.is_empty());
        assert_eq!(run.width, 0.0);
    }

    #[test]
    fn test_width_scales_with_size() {
        // Both letters map to the box glyph, 500/1000 em advance
        let face = LoadedFace::from_bytes(minimal_sfnt(), 0).unwrap();
        let run = shape(&face, "Hi", 20.0);
        let small = run.width;
        let large = shape(&face, "Hi", 40.0).width;
        assert_eq!(run.glyphs.len(), 2);
        assert!(run.glyphs.iter().all(|g| g.glyph_id == 1));
        assert_eq!(run.glyphs[1].x, 10.0);
        assert!((small - 20.0).abs() < 0.01);
        assert!((large - 2.0 * small).abs() < 0.01);
    }
}
