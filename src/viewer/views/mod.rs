//! Viewer panels
//!
//! Panels edit text fields of the session directly and report
//! everything else as [`ViewerAction`]s for the app to carry out.

mod image;
mod library;
mod text;

pub use image::render_image_view;
pub use library::render_library_panel;
pub use text::render_text_panel;

use crate::display::Region;

/// User action raised by a panel
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    /// Open the folder picker
    ChooseFolder,
    /// Re-read the image list
    RefreshList,
    /// Show an image from the list
    SelectImage(String),
    /// Toggle scale to fit
    SetScaleToFit(bool),
    /// Rename the current image using the rename fields
    Rename,
    /// Mouse pressed on the image
    SelectionStarted,
    /// Drag finished over a non-empty region
    RegionSelected(Region),
    /// Normalize the OCR text
    ProcessText,
    /// Copy the processed text to the clipboard
    CopyProcessedText,
    /// Clear both text boxes
    ClearText,
}
