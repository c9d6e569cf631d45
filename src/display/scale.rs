//! Aspect-preserving fit of an image into the display area

use crate::error::ViewerError;

/// Ratio between display-space and source-space coordinates, per axis.
///
/// Both factors are derived from the rendered (truncated) size so that
/// mapping a display point back to the source never drifts by more
/// than the truncation of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    pub x: f32,
    pub y: f32,
}

impl DisplayScale {
    /// Same factor on both axes
    pub fn uniform(factor: f32) -> Self {
        Self { x: factor, y: factor }
    }

    /// Image drawn at its native size
    pub fn identity() -> Self {
        Self::uniform(1.0)
    }
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self::identity()
    }
}

/// Size of the image as it is drawn on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledSize {
    /// Rendered width in pixels
    pub width: u32,
    /// Rendered height in pixels
    pub height: u32,
    /// Display / source ratio for converting coordinates
    pub scale: DisplayScale,
}

impl ScaledSize {
    /// Unscaled rendering of an image
    pub fn native(image_width: u32, image_height: u32) -> Self {
        Self {
            width: image_width,
            height: image_height,
            scale: DisplayScale::identity(),
        }
    }
}

/// Fit an image into a display area without distorting it
///
/// The constraining axis fills the area exactly; the other axis is
/// derived from the image's aspect ratio. Rendered dimensions are
/// truncated to whole pixels and never drop below one pixel.
pub fn scale_to_fit(
    image_width: u32,
    image_height: u32,
    area_width: f32,
    area_height: f32,
) -> Result<ScaledSize, ViewerError> {
    if image_width == 0 || image_height == 0 {
        return Err(ViewerError::InvalidDimension(format!(
            "image is {}x{}",
            image_width, image_height
        )));
    }
    if !(area_width >= 1.0 && area_height >= 1.0) || !area_width.is_finite() || !area_height.is_finite() {
        return Err(ViewerError::InvalidDimension(format!(
            "display area is {}x{}",
            area_width, area_height
        )));
    }

    let image_ratio = image_width as f64 / image_height as f64;
    let area_ratio = area_width as f64 / area_height as f64;
    let (area_width, area_height) = (area_width as f64, area_height as f64);

    let (scaled_width, scaled_height) = if area_ratio > image_ratio {
        // Area is relatively wider: height constrains
        let height = area_height;
        ((height * image_ratio).min(area_width), height)
    } else {
        let width = area_width;
        (width, (width / image_ratio).min(area_height))
    };

    let width = (scaled_width as u32).max(1);
    let height = (scaled_height as u32).max(1);

    Ok(ScaledSize {
        width,
        height,
        scale: DisplayScale {
            x: width as f32 / image_width as f32,
            y: height as f32 / image_height as f32,
        },
    })
}
