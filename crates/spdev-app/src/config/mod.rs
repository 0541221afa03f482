//! Configuration file parsing for the dev launcher
//!
//! Supports:
//! - `.spdev/config.toml` - Paths, timings, preferred simulator, shutdown keyword

pub mod settings;
pub mod types;

pub use settings::{load_settings, settings_path};
pub use types::*;
