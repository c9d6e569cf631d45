//! Session state of the viewer
//!
//! One session exists for the lifetime of the process. It owns the
//! current folder, the loaded image, the selection being drawn and the
//! OCR text; the UI mutates it only in response to user actions.

use egui::Pos2;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::analysis::DateNormalizer;
use crate::config::{self, AppConfig};
use crate::display::{finalize_selection, DisplayScale, Region, SelectionState};
use crate::error::ViewerError;
use crate::raster::RasterImage;
use crate::storage::library;
use crate::vision::{self, TextBuffer};

/// The image currently shown
#[derive(Debug, Clone)]
pub struct CurrentImage {
    /// File name inside the session folder
    pub name: String,
    /// Decoded pixels
    pub raster: RasterImage,
    /// Changes whenever a different image is loaded
    pub generation: u64,
}

/// Central state of the viewer
#[derive(Debug)]
pub struct Session {
    /// Application configuration
    pub config: AppConfig,
    /// Where `config` is persisted; `None` keeps it in memory only
    config_path: Option<PathBuf>,
    /// Folder the image list comes from
    pub folder: Option<PathBuf>,
    /// Image file names in `folder`
    pub images: Vec<String>,
    /// Loaded image
    pub current: Option<CurrentImage>,
    /// Selection drag over the displayed image
    pub selection: SelectionState,
    /// Accumulated OCR output
    pub ocr_text: TextBuffer,
    /// Result of the last "Process Text"
    pub processed_text: String,
    /// Rename field: file name without extension
    pub rename_base: String,
    /// Rename field: extension without the dot
    pub rename_ext: String,
    /// Runtime state (not persisted)
    pub runtime: RuntimeState,
    next_generation: u64,
}

impl Session {
    /// Create a session, restoring the configured folder if it still exists
    pub fn new(config: AppConfig, config_path: Option<PathBuf>) -> Self {
        let folder = config.existing_folder().map(Path::to_path_buf);

        let mut session = Self {
            config,
            config_path,
            folder,
            images: Vec::new(),
            current: None,
            selection: SelectionState::default(),
            ocr_text: TextBuffer::new(),
            processed_text: String::new(),
            rename_base: String::new(),
            rename_ext: String::new(),
            runtime: RuntimeState::default(),
            next_generation: 1,
        };

        if session.folder.is_some() {
            if let Err(e) = session.refresh_images() {
                session.runtime.report(&e);
            }
        }
        session
    }

    /// Switch to another image folder and remember it
    ///
    /// The folder is listed first; if that fails the session keeps its
    /// previous folder, image and configuration.
    pub fn set_folder(&mut self, folder: PathBuf) -> Result<(), ViewerError> {
        let images = library::list_images(&folder)?;

        info!("Image folder set to {:?}", folder);
        self.config.library.folder_path = Some(folder.clone());
        self.folder = Some(folder);
        self.images = images;
        self.current = None;
        self.selection.clear();
        self.rename_base.clear();
        self.rename_ext.clear();
        self.persist_config();
        Ok(())
    }

    /// Re-read the image list of the current folder
    pub fn refresh_images(&mut self) -> Result<(), ViewerError> {
        let Some(folder) = self.folder.as_deref() else {
            return Ok(());
        };
        self.images = library::list_images(folder)?;
        Ok(())
    }

    /// Load an image from the current folder and show it
    pub fn select_image(&mut self, name: &str) -> Result<(), ViewerError> {
        let folder = self.folder.as_deref().ok_or(ViewerError::NoImageLoaded)?;
        let raster = RasterImage::open(&folder.join(name))?;
        info!("Showing {} ({}x{})", name, raster.width(), raster.height());

        let (base, ext) = library::split_file_name(name);
        self.rename_base = base.to_string();
        self.rename_ext = ext.to_string();

        self.current = Some(CurrentImage {
            name: name.to_string(),
            raster,
            generation: self.next_generation,
        });
        self.next_generation += 1;
        self.selection.clear();
        Ok(())
    }

    pub fn current_raster(&self) -> Option<&RasterImage> {
        self.current.as_ref().map(|c| &c.raster)
    }

    pub fn scale_to_fit(&self) -> bool {
        self.config.display.scale_to_fit
    }

    /// Toggle fitting the image to the view
    ///
    /// The drawn selection no longer matches the new rendering, so it is
    /// discarded. Text already recognized stays; nothing is re-run.
    pub fn set_scale_to_fit(&mut self, enabled: bool) {
        if self.config.display.scale_to_fit == enabled {
            return;
        }
        debug!("Scale to fit: {}", enabled);
        self.config.display.scale_to_fit = enabled;
        self.selection.clear();
        self.persist_config();
    }

    /// Mouse pressed over the image
    pub fn begin_selection(&mut self, pos: Pos2) {
        self.selection.press(pos);
    }

    /// Mouse dragged over the image
    pub fn update_selection(&mut self, pos: Pos2) {
        self.selection.drag(pos);
    }

    /// Mouse released: the source-pixel region to recognize, if any
    pub fn finish_selection(&mut self, pos: Pos2, scale: DisplayScale) -> Option<Region> {
        let (start, end) = self.selection.release(pos)?;
        let (width, height) = self.current_raster()?.dimensions();
        let region = finalize_selection(start, end, scale, width, height);
        match region {
            Some(region) => info!("Selected region {}", region),
            None => debug!("Selection is empty, ignoring"),
        }
        region
    }

    /// Crop the region to hand to the OCR worker
    pub fn prepare_ocr(&self, region: Option<Region>) -> Result<RgbaImage, ViewerError> {
        vision::crop_for_ocr(self.current_raster(), region)
    }

    /// Append text delivered by the OCR worker
    pub fn append_ocr_text(&mut self, text: &str) {
        self.ocr_text.append(text);
    }

    pub fn normalizer(&self) -> DateNormalizer {
        DateNormalizer::new(self.config.dates.century)
    }

    /// Normalize the OCR text into the processed text box
    pub fn process_text(&mut self) -> &str {
        self.processed_text = self.normalizer().normalize(self.ocr_text.as_str());
        &self.processed_text
    }

    /// Clear both text boxes
    pub fn clear_text(&mut self) {
        self.ocr_text.clear();
        self.processed_text.clear();
    }

    /// Rename the current image using the rename fields
    pub fn rename_current(&mut self) -> Result<String, ViewerError> {
        let folder = self.folder.clone().ok_or(ViewerError::NoImageLoaded)?;
        let current = self.current.as_mut().ok_or(ViewerError::NoImageLoaded)?;

        let new_name =
            library::rename_image(&folder, &current.name, &self.rename_base, &self.rename_ext)?;
        current.name = new_name.clone();
        self.refresh_images()?;
        Ok(new_name)
    }

    /// Write the configuration back to disk, reporting failures
    fn persist_config(&mut self) {
        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        match config::save_config(&self.config, path) {
            Ok(()) => debug!("Saved configuration to {:?}", path),
            Err(e) => {
                warn!("Failed to save configuration: {:#}", e);
                self.runtime.set_error(format!("Failed to save configuration: {}", e));
            }
        }
    }
}

/// Runtime state that is not persisted
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// Last informational message
    pub status: Option<String>,
    /// Last error message (if any)
    pub last_error: Option<String>,
    /// An OCR request is running
    pub ocr_pending: bool,
}

impl RuntimeState {
    /// Clear any error state
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Set an informational message, replacing any error
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.last_error = None;
        self.status = Some(status.into());
    }

    /// Record an error if the user should see it
    pub fn report(&mut self, error: &ViewerError) {
        if error.is_user_visible() {
            warn!("{}", error);
            self.set_error(error.to_string());
        }
    }
}
