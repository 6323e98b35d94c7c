//! Style state
//!
//! The flat set of user-controlled text and appearance parameters,
//! and the single-field edits the front ends apply to it.

use log::warn;
use thiserror::Error;

use crate::constants::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT,
    DEFAULT_TEXT_COLOR, MAX_FONT_SIZE, MIN_FONT_SIZE, SYSTEM_FONTS,
};
use crate::utils::color::{parse_hex_color, Color};

/// Errors raised when an edit would break a style invariant
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("unknown font family: {0}")]
    UnknownFontFamily(String),
    #[error("invalid color: {0} (expected #rgb or #rrggbb)")]
    InvalidColor(String),
    #[error("no {kind} preset at index {index}")]
    UnknownPreset { kind: &'static str, index: usize },
}

/// Current text content and presentation attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleState {
    pub text: String,
    /// Always within [MIN_FONT_SIZE, MAX_FONT_SIZE]
    pub font_size_px: u32,
    /// A system font name or a registered custom font name
    pub font_family: String,
    pub text_color: Color,
    pub background_color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            font_size_px: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            text_color: default_color(DEFAULT_TEXT_COLOR, Color::BLACK),
            background_color: default_color(DEFAULT_BACKGROUND_COLOR, Color::WHITE),
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

fn default_color(hex: &str, fallback: Color) -> Color {
    parse_hex_color(hex)
        .map(|(r, g, b)| Color::rgb(r, g, b))
        .unwrap_or(fallback)
}

/// Whether `family` is one of the fixed system names
pub fn is_system_font(family: &str) -> bool {
    SYSTEM_FONTS.contains(&family)
}

/// Clamp a requested size into the slider range
pub fn clamp_font_size(px: u32) -> u32 {
    let clamped = px.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    if clamped != px {
        warn!(
            "Font size {}px out of range, clamped to {}px",
            px, clamped
        );
    }
    clamped
}

/// A single-field change, the unit of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleEdit {
    Text(String),
    FontSize(u32),
    FontFamily(String),
    TextColor(Color),
    BackgroundColor(Color),
    Bold(bool),
    Italic(bool),
    Underline(bool),
}

impl StyleState {
    /// Apply one edit.
    ///
    /// `is_known_family` decides whether a family name is selectable
    /// (system list or custom registry). Returns `Ok(true)` when the state
    /// actually changed.
    pub fn apply(
        &mut self,
        edit: StyleEdit,
        is_known_family: impl Fn(&str) -> bool,
    ) -> Result<bool, StyleError> {
        let changed = match edit {
            StyleEdit::Text(text) => replace(&mut self.text, text),
            StyleEdit::FontSize(px) => replace(&mut self.font_size_px, clamp_font_size(px)),
            StyleEdit::FontFamily(family) => {
                if !is_known_family(&family) {
                    return Err(StyleError::UnknownFontFamily(family));
                }
                replace(&mut self.font_family, family)
            }
            StyleEdit::TextColor(c) => replace(&mut self.text_color, c),
            StyleEdit::BackgroundColor(c) => replace(&mut self.background_color, c),
            StyleEdit::Bold(v) => replace(&mut self.bold, v),
            StyleEdit::Italic(v) => replace(&mut self.italic, v),
            StyleEdit::Underline(v) => replace(&mut self.underline, v),
        };
        Ok(changed)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
