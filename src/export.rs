//! PNG export
//!
//! Encodes the surface as 8-bit RGBA PNG and saves it under the fixed
//! export filename.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants::EXPORT_FILENAME;
use crate::drawing::Surface;

/// Encode the surface as PNG bytes
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, surface.width(), surface.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .context("Failed to write PNG header")?;
        writer
            .write_image_data(surface.as_raw())
            .context("Failed to encode PNG data")?;
        writer.finish().context("Failed to finish PNG stream")?;
    }
    Ok(out)
}

/// Save the surface to `<dir>/generated-text-image.png`.
///
/// A surface that was never painted is not written; `Ok(None)` is
/// returned instead.
pub fn save_png(surface: &Surface, dir: &Path) -> Result<Option<PathBuf>> {
    if !surface.is_painted() {
        debug!("Export skipped: surface not painted yet");
        return Ok(None);
    }

    let bytes = encode_png(surface)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(EXPORT_FILENAME);
    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(&bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Image saved: {} ({} bytes)", path.display(), bytes.len());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::color::Color;

    #[test]
    fn test_encode_decodes_back() {
        let mut s = Surface::new(8, 4);
        s.fill(Color::rgb(255, 0, 0));
        let bytes = encode_png(&s).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(img.get_pixel(7, 3).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_unpainted_surface_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let s = Surface::new(8, 4);
        assert!(save_png(&s, dir.path()).unwrap().is_none());
        assert!(!dir.path().join(EXPORT_FILENAME).exists());
    }

    #[test]
    fn test_save_uses_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Surface::new(8, 4);
        s.fill(Color::WHITE);
        s.mark_painted();
        let path = save_png(&s, dir.path()).unwrap().unwrap();
        assert_eq!(path.file_name().unwrap(), "generated-text-image.png");
        assert!(path.exists());
    }
}
