//! Reusable viewer components

pub mod about;
pub mod status_bar;

pub use about::render_about_window;
pub use status_bar::render_status_bar;
