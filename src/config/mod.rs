//! Configuration file management
//!
//! Loads TOML configuration files and provides startup settings.
//! Default config path: ~/.config/textimg/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT,
    DEFAULT_TEXT_COLOR,
};
use crate::style::{clamp_font_size, StyleState};
use crate::utils::color::Color;

/// Environment variable overriding the config path
pub const CONFIG_ENV: &str = "TEXTIMG_CONFIG";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial style
    pub style: StyleConfig,
    /// Font settings
    pub fonts: FontsConfig,
    /// Path settings
    pub paths: PathConfig,
}

/// Initial style settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Text content
    pub text: String,
    /// Font size in pixels (12-120)
    pub font_size: u32,
    /// Font family: a system name or the name of a preloaded font
    pub font_family: String,
    /// Text color (#RRGGBB)
    pub text_color: String,
    /// Background color (#RRGGBB)
    pub background_color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

/// Font settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Font files loaded at startup (TTF/OTF/WOFF)
    pub preload: Vec<String>,
}

/// Path settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory the exported image is written to
    pub output_dir: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}

fn parse_color_or(value: &str, fallback: &str, field: &str) -> Color {
    match value.parse::<Color>() {
        Ok(c) => c,
        Err(_) => {
            warn!(
                "Invalid {} \"{}\" in config, using {}",
                field, value, fallback
            );
            fallback.parse().unwrap_or(Color::BLACK)
        }
    }
}

impl StyleConfig {
    /// Convert to a style state.
    ///
    /// Invalid colors fall back to defaults with a warning. The family is
    /// copied as-is; the session validates it once fonts are loaded.
    pub fn to_style_state(&self) -> StyleState {
        StyleState {
            text: self.text.clone(),
            font_size_px: clamp_font_size(self.font_size),
            font_family: self.font_family.clone(),
            text_color: parse_color_or(&self.text_color, DEFAULT_TEXT_COLOR, "text_color"),
            background_color: parse_color_or(
                &self.background_color,
                DEFAULT_BACKGROUND_COLOR,
                "background_color",
            ),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
        }
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("textimg").join("config.toml"))
}

impl Config {
    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. TEXTIMG_CONFIG environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = expand_path(&path);
            if p.exists() {
                return Some(p);
            }
            warn!("{} points to a missing file: {}", CONFIG_ENV, path);
        }

        // 2. User config: ~/.config/textimg/config.toml
        default_config_path().filter(|p| p.exists())
    }

    /// Load configuration with priority:
    /// 1. TEXTIMG_CONFIG environment variable
    /// 2. ~/.config/textimg/config.toml (user config)
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Output directory with `~` expanded
    pub fn output_dir(&self) -> PathBuf {
        expand_path(&self.paths.output_dir)
    }

    /// Preload font paths with `~` expanded
    pub fn preload_paths(&self) -> Vec<PathBuf> {
        self.fonts.preload.iter().map(|p| expand_path(p)).collect()
    }

    /// Default config rendered as commented TOML
    pub fn default_template() -> Result<String> {
        let body = toml::to_string_pretty(&Config::default())?;
        Ok(format!(
            "# textimg configuration\n\
             # Location: ~/.config/textimg/config.toml (or set {})\n\
             # Command line options override these values.\n\n{}",
            CONFIG_ENV, body
        ))
    }

    /// Write the default config to `path`, refusing to overwrite unless
    /// `force` is set
    pub fn write_default_config(path: &Path, force: bool) -> Result<PathBuf> {
        if path.exists() && !force {
            anyhow::bail!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, Self::default_template()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        info!("Config written: {}", path.display());
        Ok(path.to_path_buf())
    }
}
