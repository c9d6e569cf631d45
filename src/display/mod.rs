//! Display Layer
//!
//! Geometry shared by the image view: fitting the image into the
//! available area and turning mouse drags into source-pixel regions.

pub mod scale;
pub mod selection;

pub use scale::{scale_to_fit, DisplayScale, ScaledSize};
pub use selection::{finalize_selection, paint_selection, Region, SelectionState};
