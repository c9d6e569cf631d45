//! Folder, image list and rename controls

use egui::RichText;

use crate::shared::Session;
use crate::viewer::theme::ThemeColors;
use crate::viewer::views::ViewerAction;

/// Render the upper half of the left panel
pub fn render_library_panel(ui: &mut egui::Ui, session: &mut Session, actions: &mut Vec<ViewerAction>) {
    ui.horizontal(|ui| {
        if ui.button("Choose Folder").clicked() {
            actions.push(ViewerAction::ChooseFolder);
        }
        if ui
            .add_enabled(session.folder.is_some(), egui::Button::new("Refresh List"))
            .clicked()
        {
            actions.push(ViewerAction::RefreshList);
        }
    });

    if let Some(folder) = &session.folder {
        ui.label(
            RichText::new(folder.display().to_string())
                .small()
                .color(ThemeColors::TEXT_MUTED),
        );
    }

    let mut scale_to_fit = session.scale_to_fit();
    if ui.checkbox(&mut scale_to_fit, "Scale to Fit").changed() {
        actions.push(ViewerAction::SetScaleToFit(scale_to_fit));
    }

    ui.add_space(4.0);

    let current = session.current.as_ref().map(|c| c.name.as_str());
    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(egui::Rounding::same(4.0))
        .inner_margin(4.0)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("image_list")
                .max_height(220.0)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if session.images.is_empty() {
                        let hint = if session.folder.is_some() {
                            "No images in this folder"
                        } else {
                            "Choose a folder to list its images"
                        };
                        ui.label(RichText::new(hint).color(ThemeColors::TEXT_MUTED));
                    }
                    for name in &session.images {
                        let selected = current == Some(name.as_str());
                        if ui.selectable_label(selected, name).clicked() && !selected {
                            actions.push(ViewerAction::SelectImage(name.clone()));
                        }
                    }
                });
        });

    ui.add_space(4.0);

    let has_image = session.current.is_some();
    ui.horizontal(|ui| {
        ui.add_enabled(
            has_image,
            egui::TextEdit::singleline(&mut session.rename_base).desired_width(180.0),
        );
        ui.label(".");
        ui.add_enabled(
            has_image,
            egui::TextEdit::singleline(&mut session.rename_ext).desired_width(50.0),
        );
    });
    if ui.add_enabled(has_image, egui::Button::new("Rename")).clicked() {
        actions.push(ViewerAction::Rename);
    }
}
