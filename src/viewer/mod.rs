//! Viewer window
//!
//! egui/eframe front end: folder list and text panels on the left, the
//! selectable image in the center.

pub mod app;
pub mod components;
pub mod theme;
pub mod views;

pub use app::run_viewer;
