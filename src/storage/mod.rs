//! Storage Layer
//!
//! Locates the configuration file and works with the image folder.

pub mod library;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{self, AppConfig};

/// File name of the configuration inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "imgview", "ImgViewOcr")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Default location of the configuration file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from `path`, falling back to defaults
///
/// A missing file is normal on first start; an unreadable one is logged
/// and replaced by defaults the next time the config is saved.
pub fn load_or_default(path: &Path) -> AppConfig {
    if path.exists() {
        match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => warn!("Ignoring configuration: {:#}", e),
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}
