//! OCR text and processed text boxes

use egui::RichText;

use crate::shared::Session;
use crate::viewer::theme::ThemeColors;
use crate::viewer::views::ViewerAction;

/// Render the lower half of the left panel
pub fn render_text_panel(ui: &mut egui::Ui, session: &mut Session, actions: &mut Vec<ViewerAction>) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("OCR text").strong());
        if session.runtime.ocr_pending {
            ui.spinner();
            ui.label(RichText::new("Recognizing...").color(ThemeColors::TEXT_MUTED));
        }
    });
    ui.add(
        egui::TextEdit::multiline(session.ocr_text.text_mut())
            .desired_rows(5)
            .desired_width(f32::INFINITY)
            .font(egui::TextStyle::Monospace),
    );

    if ui.button("Process Text").clicked() {
        actions.push(ViewerAction::ProcessText);
    }

    ui.label(RichText::new("Processed text").strong());
    ui.add(
        egui::TextEdit::multiline(&mut session.processed_text)
            .desired_rows(3)
            .desired_width(f32::INFINITY)
            .font(egui::TextStyle::Monospace),
    );

    ui.horizontal(|ui| {
        if ui
            .add_enabled(
                !session.processed_text.is_empty(),
                egui::Button::new("Copy Processed Text"),
            )
            .clicked()
        {
            actions.push(ViewerAction::CopyProcessedText);
        }
        let has_text = !session.ocr_text.is_empty() || !session.processed_text.is_empty();
        if ui
            .add_enabled(has_text, egui::Button::new("Clear Text"))
            .clicked()
        {
            actions.push(ViewerAction::ClearText);
        }
    });
}
