//! Font loader
//!
//! Validates uploaded font files, decodes them off the event thread one at
//! a time and registers each under a name derived from its filename.
//! A bad file is reported and skipped; the rest of the batch continues.

use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::face::LoadedFace;
use super::registry::FontRegistry;
use super::woff;
use crate::constants::FONT_EXTENSIONS;

/// Per-file load failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FontLoadError {
    #[error("Invalid font file: {file}. Please upload TTF, OTF, WOFF, or WOFF2 files.")]
    InvalidFontFile { file: String },
    #[error("Failed to load font: {file} ({reason})")]
    FontDecodeFailure { file: String, reason: String },
}

impl FontLoadError {
    /// Filename the error refers to
    pub fn file(&self) -> &str {
        match self {
            Self::InvalidFontFile { file } | Self::FontDecodeFailure { file, .. } => file,
        }
    }
}

/// One uploaded file
#[derive(Debug, Clone)]
pub struct FontUpload {
    /// Filename as picked by the user (no directory)
    pub filename: String,
    /// Declared MIME type, if the source provides one
    pub mime: Option<String>,
    pub data: Vec<u8>,
}

impl FontUpload {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime: None,
            data,
        }
    }

    /// Read a font file from disk.
    ///
    /// The extension is checked before the file is opened, so a non-font
    /// path is `InvalidFontFile` whether or not it exists. Unreadable font
    /// files become a decode failure for that file.
    pub fn from_path(path: &Path) -> Result<Self, FontLoadError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if !is_font_file(&filename, None) {
            return Err(FontLoadError::InvalidFontFile { file: filename });
        }
        let data = std::fs::read(path).map_err(|e| FontLoadError::FontDecodeFailure {
            file: filename.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(filename, data))
    }
}

/// Outcome of one batch
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Names registered, in upload order
    pub loaded: Vec<String>,
    /// Per-file failures, in upload order
    pub errors: Vec<FontLoadError>,
}

/// Whether the upload looks like a font by MIME type or extension
pub fn is_font_file(filename: &str, mime: Option<&str>) -> bool {
    if mime.is_some_and(|m| m.to_ascii_lowercase().contains("font")) {
        return true;
    }
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            FONT_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Family name for an uploaded file: the filename without its last
/// extension (`MyFont.ttf` -> `MyFont`, `a.b.otf` -> `a.b`).
pub fn derive_font_name(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}

/// Validate an upload and return its family name
pub fn validate(upload: &FontUpload) -> Result<String, FontLoadError> {
    let invalid = || FontLoadError::InvalidFontFile {
        file: upload.filename.clone(),
    };
    if !is_font_file(&upload.filename, upload.mime.as_deref()) {
        return Err(invalid());
    }
    let name = derive_font_name(&upload.filename);
    if name.trim().is_empty() {
        return Err(invalid());
    }
    Ok(name)
}

/// Decode font bytes (blocking). WOFF 1.0 is unwrapped first.
pub fn decode(filename: &str, data: Vec<u8>) -> Result<LoadedFace, FontLoadError> {
    let failure = |reason: String| FontLoadError::FontDecodeFailure {
        file: filename.to_string(),
        reason,
    };
    let sfnt = woff::to_sfnt(data).map_err(|e| failure(e.to_string()))?;
    LoadedFace::from_bytes(sfnt, 0).map_err(failure)
}

/// Load a batch of uploads into `registry`.
///
/// Files are processed strictly in order: each decode is awaited before
/// the next file starts, so registration order matches upload order.
pub async fn load_batch(registry: &mut FontRegistry, uploads: Vec<FontUpload>) -> LoadReport {
    let mut report = LoadReport::default();
    info!("Loading {} font file(s)", uploads.len());

    for upload in uploads {
        let name = match validate(&upload) {
            Ok(name) => name,
            Err(e) => {
                debug!("{}", e);
                report.errors.push(e);
                continue;
            }
        };

        let FontUpload { filename, data, .. } = upload;
        let decode_name = filename.clone();
        let decoded = tokio::task::spawn_blocking(move || decode(&decode_name, data)).await;

        let face = match decoded {
            Ok(Ok(face)) => face,
            Ok(Err(e)) => {
                warn!("{}", e);
                report.errors.push(e);
                continue;
            }
            Err(join_err) => {
                let e = FontLoadError::FontDecodeFailure {
                    file: filename,
                    reason: join_err.to_string(),
                };
                warn!("{}", e);
                report.errors.push(e);
                continue;
            }
        };

        registry.register(&name, &filename, Arc::new(face));
        report.loaded.push(name);
    }

    report
}
