//! Custom font registry
//!
//! Session-scoped list of user-uploaded fonts. Starts empty; grows only
//! through the loader and shrinks only through explicit removal.
//! Registration order is preserved for the family selector.

use log::info;
use std::sync::Arc;

use super::face::LoadedFace;

/// A successfully loaded user font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFont {
    /// Selectable family name (filename without extension)
    pub name: String,
    /// Filename as uploaded
    pub source_filename: String,
}

struct Entry {
    record: CustomFont,
    face: Arc<LoadedFace>,
}

/// Registered custom fonts, in upload order
#[derive(Default)]
pub struct FontRegistry {
    entries: Vec<Entry>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `face` under `name`.
    ///
    /// An existing font with the same name is replaced in place, keeping
    /// its position. Returns `true` when a previous entry was replaced.
    pub fn register(&mut self, name: &str, source_filename: &str, face: Arc<LoadedFace>) -> bool {
        let record = CustomFont {
            name: name.to_string(),
            source_filename: source_filename.to_string(),
        };
        if let Some(entry) = self.entries.iter_mut().find(|e| e.record.name == name) {
            info!("Custom font replaced: {} ({})", name, source_filename);
            *entry = Entry { record, face };
            return true;
        }
        info!("Custom font registered: {} ({})", name, source_filename);
        self.entries.push(Entry { record, face });
        false
    }

    /// Remove the font registered under `name`
    pub fn remove(&mut self, name: &str) -> Option<CustomFont> {
        let pos = self.entries.iter().position(|e| e.record.name == name)?;
        let entry = self.entries.remove(pos);
        info!("Custom font removed: {}", name);
        Some(entry.record)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.record.name == name)
    }

    /// Decoded face for `name`
    pub fn face(&self, name: &str) -> Option<Arc<LoadedFace>> {
        self.entries
            .iter()
            .find(|e| e.record.name == name)
            .map(|e| e.face.clone())
    }

    /// Records in registration order
    pub fn fonts(&self) -> impl Iterator<Item = &CustomFont> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
