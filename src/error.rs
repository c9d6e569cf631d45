//! Error types for the viewer core
//!
//! Every error here is recoverable: the interaction layer reports it
//! and leaves the session as it was before the failing action.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::vision::OcrError;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Selection is empty")]
    EmptySelection,
    #[error("No image loaded")]
    NoImageLoaded,
    #[error("OCR engine failure: {0}")]
    OcrEngineFailure(#[source] OcrError),
    #[error("OCR did not finish within {0:?}")]
    OcrTimeout(Duration),
    #[error("OCR request was cancelled")]
    OcrCancelled,
    #[error("Failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),
    #[error("File already exists: {0:?}")]
    FileExists(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    /// Whether the error is worth showing to the user.
    ///
    /// Empty selections and cancelled OCR requests are part of normal
    /// interaction and stay silent.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, ViewerError::EmptySelection | ViewerError::OcrCancelled)
    }
}

impl From<OcrError> for ViewerError {
    fn from(error: OcrError) -> Self {
        match error {
            OcrError::Cancelled => ViewerError::OcrCancelled,
            other => ViewerError::OcrEngineFailure(other),
        }
    }
}
