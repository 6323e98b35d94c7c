//! Editing session
//!
//! Owns the style state, the custom font registry, the system font
//! source and the surface. Every accepted mutation repaints exactly once;
//! a batch of mutations repaints once at the end.

use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_FONT_FAMILY, SYSTEM_FONTS};
use crate::drawing::Surface;
use crate::export;
use crate::font::loader::{self, FontUpload, LoadReport};
use crate::font::registry::{CustomFont, FontRegistry};
use crate::font::resolver::{FontResolver, SystemFontSource};
use crate::render::Renderer;
use crate::style::{is_system_font, StyleEdit, StyleError, StyleState};

pub struct Session {
    style: StyleState,
    registry: FontRegistry,
    system_fonts: Box<dyn SystemFontSource>,
    surface: Surface,
    repaints: u64,
}

impl Session {
    /// Start a session and paint the initial frame.
    ///
    /// The registry starts empty, so a custom family in `style` is
    /// replaced by the default system font.
    pub fn new(mut style: StyleState, system_fonts: Box<dyn SystemFontSource>) -> Self {
        if !is_system_font(&style.font_family) {
            warn!(
                "Font family \"{}\" is not available, using {}",
                style.font_family, DEFAULT_FONT_FAMILY
            );
            style.font_family = DEFAULT_FONT_FAMILY.to_string();
        }
        let mut session = Self {
            style,
            registry: FontRegistry::new(),
            system_fonts,
            surface: Surface::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            repaints: 0,
        };
        session.repaint();
        session
    }

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Number of repaints so far (the initial paint included)
    pub fn repaint_count(&self) -> u64 {
        self.repaints
    }

    /// Whether `family` can be selected right now
    pub fn is_known_family(&self, family: &str) -> bool {
        is_system_font(family) || self.registry.contains(family)
    }

    /// Selector entries: system fonts, then custom fonts in upload order
    pub fn font_families(&self) -> Vec<String> {
        SYSTEM_FONTS
            .iter()
            .map(|s| s.to_string())
            .chain(self.registry.fonts().map(|f| f.name.clone()))
            .collect()
    }

    /// Apply one edit; repaints once if the state changed.
    pub fn apply(&mut self, edit: StyleEdit) -> Result<bool, StyleError> {
        let changed = self.apply_quiet(edit)?;
        if changed {
            self.repaint();
        }
        Ok(changed)
    }

    /// Apply several edits as one event with a single repaint.
    ///
    /// All or nothing: if any edit is rejected the style is left as it
    /// was and nothing is repainted.
    pub fn batch(&mut self, edits: impl IntoIterator<Item = StyleEdit>) -> Result<bool, StyleError> {
        let registry = &self.registry;
        let mut next = self.style.clone();
        let mut changed = false;
        for edit in edits {
            changed |= next.apply(edit, |f| is_system_font(f) || registry.contains(f))?;
        }
        if changed {
            self.style = next;
            self.repaint();
        }
        Ok(changed)
    }

    fn apply_quiet(&mut self, edit: StyleEdit) -> Result<bool, StyleError> {
        let registry = &self.registry;
        self.style
            .apply(edit, |f| is_system_font(f) || registry.contains(f))
    }

    /// Load uploaded fonts, one at a time, in order.
    ///
    /// Repaints only when a font registered under the active family name
    /// was replaced.
    pub async fn load_fonts(&mut self, uploads: Vec<FontUpload>) -> LoadReport {
        let report = loader::load_batch(&mut self.registry, uploads).await;
        if report.loaded.iter().any(|n| *n == self.style.font_family) {
            self.repaint();
        }
        report
    }

    /// Remove a custom font; resets the family if it was selected.
    pub fn remove_font(&mut self, name: &str) -> Option<CustomFont> {
        let removed = self.registry.remove(name)?;
        if self.style.font_family == name {
            info!(
                "Selected font \"{}\" removed, reverting to {}",
                name, DEFAULT_FONT_FAMILY
            );
            self.style.font_family = DEFAULT_FONT_FAMILY.to_string();
            self.repaint();
        }
        Some(removed)
    }

    /// Save the current surface as PNG into `dir`
    pub fn export(&self, dir: &Path) -> Result<Option<PathBuf>> {
        export::save_png(&self.surface, dir)
    }

    fn repaint(&mut self) {
        let mut resolver = FontResolver::new(&self.registry, self.system_fonts.as_mut());
        Renderer::render(&self.style, &mut resolver, &mut self.surface);
        self.repaints += 1;
        debug!("Repaint #{}", self.repaints);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::resolver::NoSystemFonts;
    use crate::font::test_support::minimal_sfnt;
    use crate::utils::color::Color;

    fn session() -> Session {
        Session::new(StyleState::default(), Box::new(NoSystemFonts))
    }

    async fn with_fonts(names: &[&str]) -> Session {
        let mut s = session();
        let uploads = names
            .iter()
            .map(|n| FontUpload::new(format!("{}.ttf", n), minimal_sfnt()))
            .collect();
        let report = s.load_fonts(uploads).await;
        assert!(report.errors.is_empty());
        s
    }

    #[test]
    fn test_paints_on_creation() {
        let s = session();
        assert_eq!(s.repaint_count(), 1);
        assert!(s.surface().is_painted());
    }

    #[test]
    fn test_one_repaint_per_change() {
        let mut s = session();
        assert_eq!(s.apply(StyleEdit::Bold(true)), Ok(true));
        assert_eq!(s.repaint_count(), 2);
        s.apply(StyleEdit::TextColor(Color::rgb(255, 0, 0))).unwrap();
        assert_eq!(s.repaint_count(), 3);
        // Unchanged value, no repaint
        s.apply(StyleEdit::Bold(true)).unwrap();
        assert_eq!(s.repaint_count(), 3);
        // Rejected edit, no repaint
        assert!(s.apply(StyleEdit::FontFamily("Missing".into())).is_err());
        assert_eq!(s.repaint_count(), 3);
    }

    #[test]
    fn test_batch_coalesces() {
        let mut s = session();
        let changed = s
            .batch([
                StyleEdit::Bold(true),
                StyleEdit::Italic(true),
                StyleEdit::FontSize(72),
            ])
            .unwrap();
        assert!(changed);
        assert_eq!(s.repaint_count(), 2);
        assert!(s.style().italic);
    }

    #[test]
    fn test_rejected_batch_leaves_style_untouched() {
        let mut s = session();
        let before = s.style().clone();
        let err = s
            .batch([
                StyleEdit::Underline(true),
                StyleEdit::FontFamily("Nope".into()),
                StyleEdit::Bold(true),
            ])
            .unwrap_err();
        assert_eq!(err, StyleError::UnknownFontFamily("Nope".into()));
        assert_eq!(s.style(), &before);
        assert_eq!(s.repaint_count(), 1);
    }

    #[test]
    fn test_custom_family_reset_on_start() {
        let mut style = StyleState::default();
        style.font_family = "MyFont".into();
        let s = Session::new(style, Box::new(NoSystemFonts));
        assert_eq!(s.style().font_family, "Arial");
    }

    #[tokio::test]
    async fn test_select_uploaded_font() {
        let mut s = with_fonts(&["MyFont"]).await;
        assert_eq!(s.repaint_count(), 1);
        assert!(s.font_families().ends_with(&["MyFont".to_string()]));
        s.apply(StyleEdit::FontFamily("MyFont".into())).unwrap();
        assert_eq!(s.style().font_family, "MyFont");
    }

    #[tokio::test]
    async fn test_same_state_same_inked_pixels() {
        let mut a = with_fonts(&["Box"]).await;
        let mut b = with_fonts(&["Box"]).await;
        let edits = || {
            [
                StyleEdit::FontFamily("Box".into()),
                StyleEdit::Underline(true),
            ]
        };
        a.batch(edits()).unwrap();
        b.apply(StyleEdit::Bold(true)).unwrap();
        b.batch(edits()).unwrap();
        b.apply(StyleEdit::Bold(false)).unwrap();

        let white = [255u8; 4];
        assert!(a.surface().as_raw().chunks(4).any(|px| px != white));
        assert_eq!(a.surface().as_raw(), b.surface().as_raw());
    }

    #[tokio::test]
    async fn test_remove_selected_font_resets_family() {
        let mut s = with_fonts(&["MyFont", "Other"]).await;
        s.apply(StyleEdit::FontFamily("MyFont".into())).unwrap();
        let before = s.repaint_count();

        let removed = s.remove_font("MyFont").unwrap();
        assert_eq!(removed.name, "MyFont");
        assert_eq!(s.style().font_family, "Arial");
        assert_eq!(s.repaint_count(), before + 1);
    }

    #[tokio::test]
    async fn test_remove_other_font_keeps_family() {
        let mut s = with_fonts(&["MyFont", "Other"]).await;
        s.apply(StyleEdit::FontFamily("MyFont".into())).unwrap();
        let before = s.repaint_count();

        s.remove_font("Other").unwrap();
        assert_eq!(s.style().font_family, "MyFont");
        assert_eq!(s.repaint_count(), before);
        assert!(s.remove_font("Other").is_none());
    }

    #[tokio::test]
    async fn test_reupload_of_active_font_repaints() {
        let mut s = with_fonts(&["MyFont"]).await;
        s.apply(StyleEdit::FontFamily("MyFont".into())).unwrap();
        let before = s.repaint_count();
        s.load_fonts(vec![FontUpload::new("MyFont.otf", minimal_sfnt())])
            .await;
        assert_eq!(s.repaint_count(), before + 1);
        assert_eq!(s.registry().len(), 1);
    }
}
