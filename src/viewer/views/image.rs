//! Image view with rubber-band selection

use egui::{Color32, Pos2, Rect, RichText, Sense, TextureHandle};
use tracing::debug;

use crate::display::{paint_selection, scale_to_fit, ScaledSize};
use crate::shared::Session;
use crate::viewer::theme::ThemeColors;
use crate::viewer::views::ViewerAction;

/// Render the current image, scaled to the panel when enabled
pub fn render_image_view(
    ui: &mut egui::Ui,
    session: &mut Session,
    texture: Option<&TextureHandle>,
    actions: &mut Vec<ViewerAction>,
) {
    let dimensions = session.current_raster().map(|r| r.dimensions());
    let (Some(texture), Some((width, height))) = (texture, dimensions) else {
        ui.centered_and_justified(|ui| {
            ui.label(
                RichText::new("Select an image from the list")
                    .size(15.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        });
        return;
    };

    if session.scale_to_fit() {
        let available = ui.available_size();
        match scale_to_fit(width, height, available.x, available.y) {
            Ok(fit) => draw_image(ui, session, texture, fit, actions),
            // Panel collapsed to nothing, e.g. while the window is minimized
            Err(e) => debug!("Skipping image draw: {}", e),
        }
    } else {
        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                draw_image(ui, session, texture, ScaledSize::native(width, height), actions);
            });
    }
}

/// Draw the texture at `fit` size and handle mouse selection over it
fn draw_image(
    ui: &mut egui::Ui,
    session: &mut Session,
    texture: &TextureHandle,
    fit: ScaledSize,
    actions: &mut Vec<ViewerAction>,
) {
    let size = egui::vec2(fit.width as f32, fit.height as f32);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

    ui.painter().image(
        texture.id(),
        rect,
        Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0)),
        Color32::WHITE,
    );

    // Selection points are kept relative to the image's top-left corner
    let to_local = |pos: Pos2| (pos - rect.min).to_pos2();

    if response.drag_started() {
        // Drags are recognized only after the pointer moved a little;
        // start from where the button actually went down
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let Some(pos) = origin {
            session.begin_selection(to_local(pos));
            actions.push(ViewerAction::SelectionStarted);
        }
    }

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            session.update_selection(to_local(pos));
        }
    }

    if response.drag_stopped() {
        let end = response
            .interact_pointer_pos()
            .map(to_local)
            .or(session.selection.current_point);
        if let Some(end) = end {
            if let Some(region) = session.finish_selection(end, fit.scale) {
                actions.push(ViewerAction::RegionSelected(region));
            }
        }
    }

    paint_selection(&ui.painter_at(rect), rect.min, &session.selection);
}
