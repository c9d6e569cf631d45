//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::analysis::DEFAULT_CENTURY;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Image folder settings
    pub library: LibrarySettings,
    /// Image display settings
    pub display: DisplaySettings,
    /// OCR engine settings
    pub ocr: OcrSettings,
    /// Date normalization settings
    pub dates: DateSettings,
}

/// Image folder settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Last folder chosen by the user
    pub folder_path: Option<PathBuf>,
}

/// Image display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Shrink or grow images to fit the view
    pub scale_to_fit: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { scale_to_fit: true }
    }
}

/// OCR engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Tesseract executable (name on PATH or full path)
    pub command: PathBuf,
    /// Tesseract language(s), e.g. "eng" or "eng+deu"
    pub language: String,
    /// Tesseract page segmentation mode (`--psm`)
    pub page_segmentation_mode: Option<u32>,
    /// Give up on a recognition after this many seconds
    pub timeout_secs: u64,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            command: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            page_segmentation_mode: None,
            timeout_secs: 30,
        }
    }
}

impl OcrSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Date normalization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateSettings {
    /// Century prepended to two-digit years (20 -> 20yy)
    pub century: u8,
}

impl Default for DateSettings {
    fn default() -> Self {
        Self {
            century: DEFAULT_CENTURY,
        }
    }
}

impl AppConfig {
    /// Configured folder, if it still exists on disk
    pub fn existing_folder(&self) -> Option<&Path> {
        let folder = self.library.folder_path.as_deref()?;
        if folder.is_dir() {
            Some(folder)
        } else {
            warn!("Configured folder {:?} no longer exists, ignoring it", folder);
            None
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    let config: AppConfig =
        toml::from_str(&content).with_context(|| format!("Failed to parse config {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write config {:?}", path))?;
    Ok(())
}
