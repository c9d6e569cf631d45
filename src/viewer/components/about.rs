//! Help > About window

use egui::RichText;

use crate::viewer::theme::ThemeColors;

pub const APP_NAME: &str = "Image Viewer";
pub const APP_DESCRIPTION: &str = "Simple image viewer with OCR and selectable area.";

/// Show the About window while `open` is true
pub fn render_about_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("About")
        .open(open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(RichText::new(APP_NAME).heading().color(ThemeColors::ACCENT_PRIMARY));
            ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
            ui.add_space(6.0);
            ui.label(APP_DESCRIPTION);
            ui.label(
                RichText::new("Drag over the image to read text; Process Text turns dates into yyyymmdd.")
                    .small()
                    .color(ThemeColors::TEXT_SECONDARY),
            );
        });
}
