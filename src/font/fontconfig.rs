//! fontconfig integration
//!
//! Resolves the fixed system family names (and their bold/italic faces)
//! to font files, with a sans-serif fallback chain.

use anyhow::{anyhow, Result};
use fontconfig::Fontconfig;
use log::{info, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::face::LoadedFace;
use super::resolver::SystemFontSource;
use crate::constants::FALLBACK_FONTS;

/// Font search result
#[derive(Debug, Clone)]
pub struct FontMatch {
    /// Font file path
    pub path: PathBuf,
    /// Font name
    pub family: String,
    /// Face index inside a collection file (fontconfig matches map to
    /// the first face)
    pub index: u32,
}

/// fontconfig style name for a weight/slant combination
pub fn style_name(bold: bool, italic: bool) -> &'static str {
    match (bold, italic) {
        (true, true) => "Bold Italic",
        (true, false) => "Bold",
        (false, true) => "Italic",
        (false, false) => "Regular",
    }
}

/// Search fonts using fontconfig
pub struct FontFinder {
    fc: Fontconfig,
}

impl FontFinder {
    /// Initialize FontFinder
    pub fn new() -> Result<Self> {
        let fc = Fontconfig::new().ok_or_else(|| anyhow!("fontconfig initialization failed"))?;
        info!("fontconfig initialized");
        Ok(Self { fc })
    }

    /// Search by font name and style
    /// Verifies that the returned font actually matches the requested family name
    /// (fontconfig always returns the "closest" match, even if completely unrelated)
    pub fn find_font(&self, family: &str, style: Option<&str>) -> Option<FontMatch> {
        let font = self.fc.find(family, style)?;
        let req = family.to_ascii_lowercase();
        let got = font.name.to_ascii_lowercase();
        if got.contains(&req) || req.contains(&got) {
            return Some(FontMatch {
                path: font.path,
                family: font.name,
                index: 0,
            });
        }
        warn!(
            "fontconfig: rejected false match for \"{}\": got \"{}\"",
            family, font.name
        );
        None
    }

    /// Search for the styled face first, then the regular one
    pub fn find_styled(&self, family: &str, bold: bool, italic: bool) -> Option<FontMatch> {
        if bold || italic {
            if let Some(m) = self.find_font(family, Some(style_name(bold, italic))) {
                return Some(m);
            }
        }
        self.find_font(family, None)
    }

    /// Search for a generic sans-serif face
    pub fn find_fallback(&self, bold: bool, italic: bool) -> Option<FontMatch> {
        for name in FALLBACK_FONTS {
            if let Some(m) = self.find_styled(name, bold, italic) {
                return Some(m);
            }
        }

        // Last resort: whatever fontconfig considers closest
        let style = (bold || italic).then(|| style_name(bold, italic));
        let font = self.fc.find("sans-serif", style)?;
        Some(FontMatch {
            path: font.path,
            family: font.name,
            index: 0,
        })
    }
}

/// Load font file
pub fn load_font_file(path: &std::path::Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| anyhow!("Failed to read font file: {} ({})", path.display(), e))
}

/// System font source backed by fontconfig, caching decoded faces
/// by (family, bold, italic).
pub struct FontconfigSource {
    finder: FontFinder,
    cache: HashMap<(String, bool, bool), Option<Arc<LoadedFace>>>,
}

impl FontconfigSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            finder: FontFinder::new()?,
            cache: HashMap::new(),
        })
    }

    fn load_match(font_match: &FontMatch) -> Option<Arc<LoadedFace>> {
        let data = match load_font_file(&font_match.path) {
            Ok(d) => d,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };
        match LoadedFace::from_bytes(data, font_match.index) {
            Ok(face) => {
                info!(
                    "System font: {} ({})",
                    font_match.family,
                    font_match.path.display()
                );
                Some(Arc::new(face))
            }
            Err(e) => {
                warn!(
                    "Failed to decode system font {}: {}",
                    font_match.path.display(),
                    e
                );
                None
            }
        }
    }
}

impl SystemFontSource for FontconfigSource {
    fn face(&mut self, family: &str, bold: bool, italic: bool) -> Option<Arc<LoadedFace>> {
        let key = (family.to_string(), bold, italic);
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        let face = self
            .finder
            .find_styled(family, bold, italic)
            .and_then(|m| Self::load_match(&m));
        self.cache.insert(key, face.clone());
        face
    }

    fn fallback(&mut self, bold: bool, italic: bool) -> Option<Arc<LoadedFace>> {
        let key = (String::new(), bold, italic);
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        let face = self
            .finder
            .find_fallback(bold, italic)
            .and_then(|m| Self::load_match(&m));
        if face.is_none() {
            warn!("No fallback font found via fontconfig");
        }
        self.cache.insert(key, face.clone());
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_name() {
        assert_eq!(style_name(false, false), "Regular");
        assert_eq!(style_name(true, false), "Bold");
        assert_eq!(style_name(false, true), "Italic");
        assert_eq!(style_name(true, true), "Bold Italic");
    }
}
