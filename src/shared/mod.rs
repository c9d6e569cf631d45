//! Session state shared by the viewer panels

pub mod state;

pub use state::{RuntimeState, Session};
