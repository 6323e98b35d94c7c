//! Font resolution
//!
//! Maps a font descriptor to a concrete face: custom registry first,
//! then system fonts, then the fallback chain. Weight and slant the face
//! lacks are reported so the renderer can synthesize them.

use log::{debug, trace};
use std::sync::Arc;

use super::face::LoadedFace;
use super::registry::FontRegistry;
use crate::render::descriptor::FontDescriptor;

/// Source of system-installed faces.
///
/// Implementations may cache lookups; a `None` means the family is not
/// installed and the resolver moves on down the chain.
pub trait SystemFontSource {
    /// Face for `family` in the requested weight/slant (or the closest
    /// face of that family).
    fn face(&mut self, family: &str, bold: bool, italic: bool) -> Option<Arc<LoadedFace>>;

    /// Generic sans-serif face used when nothing else matches.
    fn fallback(&mut self, bold: bool, italic: bool) -> Option<Arc<LoadedFace>>;
}

/// Source with no system fonts at all (headless hosts, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSystemFonts;

impl SystemFontSource for NoSystemFonts {
    fn face(&mut self, _family: &str, _bold: bool, _italic: bool) -> Option<Arc<LoadedFace>> {
        None
    }

    fn fallback(&mut self, _bold: bool, _italic: bool) -> Option<Arc<LoadedFace>> {
        None
    }
}

/// How the face was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// Registered custom font
    Custom,
    /// Installed system family
    System,
    /// Family unavailable, generic substitute
    Fallback,
}

/// A face plus the styles the renderer must synthesize
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    pub face: Arc<LoadedFace>,
    pub match_type: MatchType,
    pub synthetic_bold: bool,
    pub synthetic_italic: bool,
}

impl ResolvedFont {
    fn new(face: Arc<LoadedFace>, match_type: MatchType, desc: &FontDescriptor) -> Self {
        let synthetic_bold = desc.bold && !face.is_bold();
        let synthetic_italic = desc.italic && !face.is_italic();
        Self {
            face,
            match_type,
            synthetic_bold,
            synthetic_italic,
        }
    }
}

/// Borrowing resolver built for one render pass
pub struct FontResolver<'a> {
    registry: &'a FontRegistry,
    system: &'a mut dyn SystemFontSource,
}

impl<'a> FontResolver<'a> {
    pub fn new(registry: &'a FontRegistry, system: &'a mut dyn SystemFontSource) -> Self {
        Self { registry, system }
    }

    /// Resolve a descriptor. `None` only when no face exists at all.
    pub fn resolve(&mut self, desc: &FontDescriptor) -> Option<ResolvedFont> {
        if let Some(face) = self.registry.face(&desc.family) {
            trace!("Resolved \"{}\" to custom font", desc.family);
            return Some(ResolvedFont::new(face, MatchType::Custom, desc));
        }
        if let Some(face) = self.system.face(&desc.family, desc.bold, desc.italic) {
            trace!("Resolved \"{}\" to system font", desc.family);
            return Some(ResolvedFont::new(face, MatchType::System, desc));
        }
        debug!("Font \"{}\" unavailable, substituting fallback", desc.family);
        self.system
            .fallback(desc.bold, desc.italic)
            .map(|face| ResolvedFont::new(face, MatchType::Fallback, desc))
    }
}
