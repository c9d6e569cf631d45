//! Vision/OCR Layer
//!
//! Crops the selected region out of the current image and hands it to
//! an OCR backend on the [`OcrWorker`]. Recognized text accumulates in
//! a [`TextBuffer`].
//! Backends:
//! - Tesseract command line (default)

pub mod tesseract;
pub mod worker;

pub use tesseract::TesseractOcr;
pub use worker::{CancelToken, OcrPoll, OcrWorker};

use image::RgbaImage;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::display::Region;
use crate::error::ViewerError;
use crate::raster::RasterImage;

/// Failure reported by an OCR backend
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR engine not found: {0}")]
    EngineNotFound(String),
    #[error("Recognition failed: {0}")]
    Recognition(String),
    #[error("Recognition was cancelled")]
    Cancelled,
    #[error("Failed to prepare image for OCR: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A text recognizer
///
/// Receives an already-cropped RGBA region and returns whatever text it
/// recognized. There is no contract on the format of that text.
/// Long-running backends watch `cancel` and stop early with
/// [`OcrError::Cancelled`].
pub trait OcrCapability: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Recognize text in `region`
    fn recognize(&self, region: &RgbaImage, cancel: &CancelToken) -> Result<String, OcrError>;
}

/// Accumulated OCR output
///
/// Fragments are appended in the order the recognitions finished and
/// are only removed by an explicit [`TextBuffer::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment as-is, without a separator
    pub fn append(&mut self, fragment: &str) {
        self.text.push_str(fragment);
        info!("Appended OCR text ({} chars)", fragment.len());
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Editable access for the text box showing the buffer
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }
}

/// Check preconditions and cut the region to recognize
pub fn crop_for_ocr(
    image: Option<&RasterImage>,
    region: Option<Region>,
) -> Result<RgbaImage, ViewerError> {
    let image = image.ok_or(ViewerError::NoImageLoaded)?;
    let region = region.ok_or(ViewerError::EmptySelection)?;
    image.crop(region)
}

/// Run the backend on an already-cropped region
///
/// This is the body of every OCR request the worker runs.
pub fn recognize_cropped(
    engine: &dyn OcrCapability,
    cropped: &RgbaImage,
    cancel: &CancelToken,
) -> Result<String, ViewerError> {
    let start = Instant::now();
    let text = engine.recognize(cropped, cancel)?;
    debug!(
        "{} recognized {} chars in {:?}",
        engine.name(),
        text.len(),
        start.elapsed()
    );
    Ok(text)
}

/// Recognize the text inside `region` and append it to `buffer`
///
/// Blocks until the worker's request finishes or passes its deadline.
/// On any failure the buffer is left unchanged. Returns the recognized
/// fragment.
pub fn extract_text(
    image: Option<&RasterImage>,
    region: Option<Region>,
    worker: &mut OcrWorker,
    buffer: &mut TextBuffer,
) -> Result<String, ViewerError> {
    let cropped = crop_for_ocr(image, region)?;
    worker.submit(cropped);

    match worker.wait() {
        OcrPoll::Finished(result) => {
            let text = result?;
            buffer.append(&text);
            Ok(text)
        }
        // The request was abandoned before it reported back
        OcrPoll::Idle | OcrPoll::Pending => Err(ViewerError::OcrCancelled),
    }
}
