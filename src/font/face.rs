//! Decoded font faces
//!
//! A face keeps its raw sfnt bytes (rustybuzz borrows them per shaping
//! call) alongside the fontdue rasterizer built from the same bytes.

use fontdue::{Font, FontSettings};
use log::debug;

/// One decoded, rasterizable font face
pub struct LoadedFace {
    /// Raw sfnt data (WOFF containers already unwrapped)
    data: Vec<u8>,
    /// Face index inside a collection (0 for plain TTF/OTF)
    index: u32,
    /// Rasterizer
    font: Font,
    /// Face carries a bold weight natively
    bold: bool,
    /// Face carries an italic/oblique slant natively
    italic: bool,
}

impl LoadedFace {
    /// Decode sfnt bytes into a face.
    ///
    /// Both the shaper and the rasterizer must accept the data, otherwise
    /// the face is rejected with a human-readable reason.
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Result<Self, String> {
        let (bold, italic) = {
            let face = rustybuzz::Face::from_slice(&data, index)
                .ok_or_else(|| "not a valid OpenType/TrueType font".to_string())?;
            (face.is_bold(), face.is_italic() || face.is_oblique())
        };

        let settings = FontSettings {
            collection_index: index,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(data.as_slice(), settings).map_err(|e| e.to_string())?;

        debug!(
            "Face decoded: {} bytes, index {}, glyphs={}, bold={}, italic={}",
            data.len(),
            index,
            font.glyph_count(),
            bold,
            italic
        );

        Ok(Self {
            data,
            index,
            font,
            bold,
            italic,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Ascent and descent (descent negative) at `px`.
    ///
    /// Falls back to a 0.8/0.2 split of the em when the face has no
    /// horizontal metrics.
    pub fn line_metrics(&self, px: f32) -> (f32, f32) {
        match self.font.horizontal_line_metrics(px) {
            Some(m) => (m.ascent, m.descent),
            None => (px * 0.8, -px * 0.2),
        }
    }
}

impl std::fmt::Debug for LoadedFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFace")
            .field("bytes", &self.data.len())
            .field("index", &self.index)
            .field("bold", &self.bold)
            .field("italic", &self.italic)
            .finish()
    }
}
