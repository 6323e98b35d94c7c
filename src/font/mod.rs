//! Font loading, registration and resolution
//!
//! Handles:
//! - TTF/OTF/WOFF decoding (fontdue, rustybuzz, flate2)
//! - Custom font registry for user uploads
//! - System font lookup (fontconfig)
//! - Text shaping (rustybuzz)

pub mod face;
pub mod fontconfig;
pub mod loader;
pub mod registry;
pub mod resolver;
pub mod shaper;
pub mod woff;

#[cfg(test)]
pub(crate) mod test_support;

pub use face::LoadedFace;
pub use fontconfig::FontconfigSource;
pub use loader::{load_batch, FontLoadError, FontUpload, LoadReport};
pub use registry::{CustomFont, FontRegistry};
pub use resolver::{FontResolver, NoSystemFonts, ResolvedFont, SystemFontSource};
