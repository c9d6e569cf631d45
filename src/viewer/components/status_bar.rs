//! Status line at the bottom of the window

use egui::{RichText, Vec2};

use crate::shared::RuntimeState;
use crate::viewer::theme::ThemeColors;

/// Kind of message on the status line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    pub fn color(&self) -> egui::Color32 {
        match self {
            StatusKind::Info => ThemeColors::ACCENT_SUCCESS,
            StatusKind::Error => ThemeColors::ACCENT_ERROR,
        }
    }
}

/// Message to show, errors first
pub fn status_message(runtime: &RuntimeState) -> Option<(StatusKind, &str)> {
    if let Some(error) = runtime.last_error.as_deref() {
        return Some((StatusKind::Error, error));
    }
    runtime.status.as_deref().map(|status| (StatusKind::Info, status))
}

/// Render the status line; returns true when the user dismissed it
pub fn render_status_bar(ui: &mut egui::Ui, runtime: &RuntimeState) -> bool {
    let mut dismissed = false;

    ui.horizontal(|ui| {
        match status_message(runtime) {
            Some((kind, message)) => {
                let dot = ui.cursor().left_top() + Vec2::new(6.0, 9.0);
                ui.painter().circle_filled(dot, 4.0, kind.color());
                ui.add_space(16.0);
                ui.label(RichText::new(message).color(ThemeColors::TEXT_PRIMARY));
                if ui.small_button("Dismiss").clicked() {
                    dismissed = true;
                }
            }
            None => {
                ui.label(RichText::new("Ready").color(ThemeColors::TEXT_MUTED));
            }
        }
    });

    dismissed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_takes_precedence() {
        let mut runtime = RuntimeState::default();
        assert!(status_message(&runtime).is_none());

        runtime.status = Some("Renamed".to_string());
        assert_eq!(status_message(&runtime), Some((StatusKind::Info, "Renamed")));

        runtime.set_error("OCR failed");
        assert_eq!(status_message(&runtime), Some((StatusKind::Error, "OCR failed")));
    }
}
