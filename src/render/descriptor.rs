//! CSS-style font shorthand
//!
//! Composes `[italic] [bold] <size>px <family>` from the style state, in
//! that fixed token order, and parses the same shorthand back for the
//! command line (`--font "italic bold 48px Georgia"`).

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::style::StyleState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("font shorthand is missing a size (e.g. 48px)")]
    MissingSize,
    #[error("invalid font size: {0}")]
    InvalidSize(String),
    #[error("font shorthand is missing a family name")]
    MissingFamily,
    #[error("unknown font shorthand token: {0}")]
    UnknownToken(String),
}

/// Font request for one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    pub italic: bool,
    pub bold: bool,
    pub size_px: u32,
    pub family: String,
}

impl FontDescriptor {
    pub fn from_style(style: &StyleState) -> Self {
        Self {
            italic: style.italic,
            bold: style.bold,
            size_px: style.font_size_px,
            family: style.font_family.clone(),
        }
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.italic {
            f.write_str("italic ")?;
        }
        if self.bold {
            f.write_str("bold ")?;
        }
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

fn parse_size(token: &str) -> Result<u32, DescriptorError> {
    let digits = token
        .strip_suffix("px")
        .ok_or_else(|| DescriptorError::InvalidSize(token.to_string()))?;
    let value: f32 = digits
        .parse()
        .map_err(|_| DescriptorError::InvalidSize(token.to_string()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(DescriptorError::InvalidSize(token.to_string()));
    }
    Ok(value.round() as u32)
}

impl FromStr for FontDescriptor {
    type Err = DescriptorError;

    /// Accepts style/weight keywords in any order before the size:
    /// `italic`, `oblique`, `normal`, `bold`, `bolder`, or a numeric
    /// weight (600 and above counts as bold).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut italic = false;
        let mut bold = false;
        let mut tokens = s.split_whitespace();
        let size_px = loop {
            let token = tokens.next().ok_or(DescriptorError::MissingSize)?;
            match token.to_ascii_lowercase().as_str() {
                "italic" | "oblique" => italic = true,
                "bold" | "bolder" => bold = true,
                "normal" | "lighter" => {}
                t if t.ends_with("px") => break parse_size(t)?,
                t => match t.parse::<u16>() {
                    Ok(weight) => bold = weight >= 600,
                    Err(_) => return Err(DescriptorError::UnknownToken(token.to_string())),
                },
            }
        };

        let family = tokens
            .collect::<Vec<_>>()
            .join(" ")
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();
        if family.is_empty() {
            return Err(DescriptorError::MissingFamily);
        }

        Ok(Self {
            italic,
            bold,
            size_px,
            family,
        })
    }
}
