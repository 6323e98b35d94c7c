//! Global constants for textimg
//!
//! Canvas geometry, style limits, preset palettes and font names
//! shared by the renderer, the session and the command front end.

// ============================================================================
// Canvas
// ============================================================================

/// Surface width (pixels)
pub const CANVAS_WIDTH: u32 = 800;

/// Surface height (pixels)
pub const CANVAS_HEIGHT: u32 = 400;

/// Fixed export filename
pub const EXPORT_FILENAME: &str = "generated-text-image.png";

// ============================================================================
// Style limits
// ============================================================================

/// Minimum font size (pixels)
pub const MIN_FONT_SIZE: u32 = 12;

/// Maximum font size (pixels)
pub const MAX_FONT_SIZE: u32 = 120;

/// Default font size (pixels)
pub const DEFAULT_FONT_SIZE: u32 = 48;

/// Default text content
pub const DEFAULT_TEXT: &str = "Hello World!";

/// Family used on startup and after the selected custom font is removed
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Default text color
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Default background color
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

// ============================================================================
// Underline
// ============================================================================

/// Underline offset below the vertical center, relative to font size
pub const UNDERLINE_OFFSET_SCALE: f32 = 0.1;

/// Underline stroke width relative to font size (before the 1px floor)
pub const UNDERLINE_THICKNESS_DIVISOR: f32 = 20.0;

// ============================================================================
// Synthetic styles
// ============================================================================

/// Horizontal shear for synthesized italic (tan of ~11 degrees)
pub const SYNTHETIC_ITALIC_SKEW: f32 = 0.2;

/// Emboldening strength for synthesized bold, relative to font size
pub const SYNTHETIC_BOLD_SCALE: f32 = 1.0 / 32.0;

// ============================================================================
// Fonts
// ============================================================================

/// Fixed system font names offered by the family selector
pub const SYSTEM_FONTS: [&str; 10] = [
    "Arial",
    "Georgia",
    "Times New Roman",
    "Helvetica",
    "Verdana",
    "Courier New",
    "Impact",
    "Comic Sans MS",
    "Trebuchet MS",
    "Palatino",
];

/// Families tried when the requested family cannot be resolved
pub const FALLBACK_FONTS: [&str; 5] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "FreeSans",
    "sans-serif",
];

/// Accepted font file extensions (lowercase, without dot)
pub const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "woff", "woff2"];

// ============================================================================
// Color presets
// ============================================================================

/// Quick-pick swatches for the text color
pub const TEXT_COLOR_PRESETS: [&str; 10] = [
    "#000000", "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ff00ff", "#00ffff", "#ffa500",
    "#800080", "#ffc0cb",
];

/// Quick-pick swatches for the background color
pub const BACKGROUND_COLOR_PRESETS: [&str; 10] = [
    "#ffffff", "#f0f0f0", "#e0e0e0", "#d0d0d0", "#c0c0c0", "#a0a0a0", "#808080", "#606060",
    "#404040", "#202020",
];
