//! Raster drawing
//!
//! The fixed-size surface, the coverage mask text is composed in, and
//! the geometry helpers the renderer uses for anchoring and underlines.

pub mod geometry;
pub mod surface;

pub use geometry::{underline_geometry, UnderlineGeometry};
pub use surface::{CoverageMask, Surface};
