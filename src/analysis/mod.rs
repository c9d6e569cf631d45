//! Text Analysis Layer
//!
//! Post-processing applied to recognized text on user request.

pub mod dates;

pub use dates::{DateNormalizer, DEFAULT_CENTURY};
