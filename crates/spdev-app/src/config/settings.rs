//! Settings parser for .spdev/config.toml

use super::types::Settings;
use spdev_core::prelude::*;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.toml";
const SPDEV_DIR: &str = ".spdev";

/// Location of the settings file for a project root
pub fn settings_path(project_root: &Path) -> PathBuf {
    project_root.join(SPDEV_DIR).join(CONFIG_FILENAME)
}

/// Load settings from .spdev/config.toml
///
/// Returns default settings if file doesn't exist or can't be parsed.
pub fn load_settings(project_root: &Path) -> Settings {
    let config_path = settings_path(project_root);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}
