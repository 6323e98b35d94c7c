//! textimg - styled text to PNG
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │        Input (CLI flags / commands)      │
//! ├──────────────────────────────────────────┤
//! │  StyleEdit  →  Session  ←  Font Loader   │
//! │                   ↓                      │
//! │        Renderer (fontdue, rustybuzz)     │
//! │                   ↓                      │
//! │        Surface 800×400  →  PNG export    │
//! └──────────────────────────────────────────┘
//! ```

pub mod command;
pub mod config;
pub mod constants;
pub mod drawing;
pub mod export;
pub mod font;
pub mod render;
pub mod session;
pub mod style;
pub mod utils;

pub use session::Session;
pub use style::{StyleEdit, StyleError, StyleState};
