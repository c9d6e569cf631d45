//! Raster image held by the session
//!
//! Wraps a decoded RGBA8 image and cuts regions out of it for OCR.

use image::RgbaImage;
use std::path::Path;
use tracing::debug;

use crate::display::Region;
use crate::error::ViewerError;

/// A decoded image
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// RGBA pixel data
    pixels: RgbaImage,
}

impl RasterImage {
    /// Decode an image file (PNG, JPEG, BMP, GIF, ...)
    pub fn open(path: &Path) -> Result<Self, ViewerError> {
        let decoded = image::open(path).map_err(|source| ViewerError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let pixels = decoded.to_rgba8();
        debug!("Decoded {:?}: {}x{}", path, pixels.width(), pixels.height());

        Ok(Self { pixels })
    }

    /// Wrap pixels that did not come from a file
    #[cfg(test)]
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Image dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Raw RGBA bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Copy a region out of the image
    pub fn crop(&self, region: Region) -> Result<RgbaImage, ViewerError> {
        if region.is_empty() {
            return Err(ViewerError::EmptySelection);
        }
        if !region.fits_within(self.width(), self.height()) {
            return Err(ViewerError::InvalidDimension(format!(
                "region {} exceeds image {}x{}",
                region,
                self.width(),
                self.height()
            )));
        }

        Ok(image::imageops::crop_imm(&self.pixels, region.x, region.y, region.width, region.height)
            .to_image())
    }
}
