//! Viewer application entry point

use eframe::egui;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::shared::Session;
use crate::viewer::components::{render_about_window, render_status_bar};
use crate::viewer::theme;
use crate::viewer::views::{
    render_image_view, render_library_panel, render_text_panel, ViewerAction,
};
use crate::vision::{OcrCapability, OcrPoll, OcrWorker, TesseractOcr};

/// How often to check on a running OCR request
const OCR_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The main viewer application
pub struct ViewerApp {
    /// Session state
    session: Session,
    /// Background OCR runner
    ocr: OcrWorker,
    /// Texture of the current image and the generation it was made from
    texture: Option<(u64, egui::TextureHandle)>,
    /// Whether theme has been applied
    theme_applied: bool,
    /// About window visible
    show_about: bool,
}

impl ViewerApp {
    /// Create the app with the Tesseract backend from the session config
    pub fn new(session: Session) -> Self {
        let engine: Arc<dyn OcrCapability> = Arc::new(TesseractOcr::from_settings(&session.config.ocr));
        let timeout = session.config.ocr.timeout();
        Self::with_engine(session, engine, timeout)
    }

    /// Create the app with a specific OCR backend
    pub fn with_engine(session: Session, engine: Arc<dyn OcrCapability>, timeout: Duration) -> Self {
        Self {
            session,
            ocr: OcrWorker::new(engine, timeout),
            texture: None,
            theme_applied: false,
            show_about: false,
        }
    }

    /// Create eframe options for the viewer window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1000.0, 680.0])
                .with_min_inner_size([640.0, 420.0])
                .with_title("Image Viewer with OCR and Selectable Area"),
            ..Default::default()
        }
    }

    /// Upload the current image to the GPU when it changed
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let Some(current) = &self.session.current else {
            self.texture = None;
            return;
        };
        if matches!(&self.texture, Some((generation, _)) if *generation == current.generation) {
            return;
        }

        let (width, height) = current.raster.dimensions();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            current.raster.as_raw(),
        );
        let texture = ctx.load_texture(
            format!("image_{}", current.generation),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        debug!("Uploaded texture for {} ({}x{})", current.name, width, height);
        self.texture = Some((current.generation, texture));
    }

    /// Collect the result of a running OCR request
    fn poll_ocr(&mut self, ctx: &egui::Context) {
        match self.ocr.poll() {
            OcrPoll::Idle => self.session.runtime.ocr_pending = false,
            OcrPoll::Pending => {
                self.session.runtime.ocr_pending = true;
                ctx.request_repaint_after(OCR_POLL_INTERVAL);
            }
            OcrPoll::Finished(result) => {
                self.session.runtime.ocr_pending = false;
                match result {
                    Ok(text) => {
                        self.session.append_ocr_text(&text);
                        if text.trim().is_empty() {
                            self.session.runtime.set_status("No text recognized in selection");
                        } else {
                            self.session.runtime.clear_error();
                        }
                    }
                    Err(e) => self.session.runtime.report(&e),
                }
            }
        }
    }

    /// Carry out actions raised by the panels
    fn handle_action(&mut self, ctx: &egui::Context, action: ViewerAction) {
        debug!("Action: {:?}", action);
        let session = &mut self.session;

        match action {
            ViewerAction::ChooseFolder => {
                let mut dialog = rfd::FileDialog::new().set_title("Choose a directory containing images");
                if let Some(folder) = &session.folder {
                    dialog = dialog.set_directory(folder);
                }
                if let Some(folder) = dialog.pick_folder() {
                    // The old selection belongs to an image that is going away
                    self.ocr.cancel();
                    match session.set_folder(folder) {
                        Ok(()) => session.runtime.set_status(format!("{} images", session.images.len())),
                        Err(e) => session.runtime.report(&e),
                    }
                }
            }
            ViewerAction::RefreshList => {
                if let Err(e) = session.refresh_images() {
                    session.runtime.report(&e);
                }
            }
            ViewerAction::SelectImage(name) => match session.select_image(&name) {
                Ok(()) => {
                    self.ocr.cancel();
                }
                Err(e) => session.runtime.report(&e),
            },
            ViewerAction::SetScaleToFit(enabled) => session.set_scale_to_fit(enabled),
            ViewerAction::Rename => match session.rename_current() {
                Ok(new_name) => session.runtime.set_status(format!("File renamed to {}", new_name)),
                Err(e) => session.runtime.report(&e),
            },
            ViewerAction::SelectionStarted => {
                if self.ocr.cancel() {
                    info!("New selection started, previous OCR request dropped");
                }
            }
            ViewerAction::RegionSelected(region) => match session.prepare_ocr(Some(region)) {
                Ok(cropped) => {
                    self.ocr.submit(cropped);
                    session.runtime.ocr_pending = true;
                    ctx.request_repaint_after(OCR_POLL_INTERVAL);
                }
                Err(e) => session.runtime.report(&e),
            },
            ViewerAction::ProcessText => {
                session.process_text();
            }
            ViewerAction::CopyProcessedText => {
                let text = session.processed_text.clone();
                ctx.output_mut(|o| o.copied_text = text);
                session.runtime.set_status("Processed text copied to clipboard");
            }
            ViewerAction::ClearText => session.clear_text(),
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme once
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.poll_ocr(ctx);
        self.sync_texture(ctx);

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if render_status_bar(ui, &self.session.runtime) {
                self.session.runtime.clear_error();
                self.session.runtime.status = None;
            }
        });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .min_width(250.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(6.0);
                    render_library_panel(ui, &mut self.session, &mut actions);
                    ui.separator();
                    render_text_panel(ui, &mut self.session, &mut actions);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let texture = self.texture.as_ref().map(|(_, texture)| texture);
            render_image_view(ui, &mut self.session, texture, &mut actions);
        });

        render_about_window(ctx, &mut self.show_about);

        for action in actions {
            self.handle_action(ctx, action);
        }
    }
}

/// Run the viewer application
pub fn run_viewer(session: Session) -> Result<(), eframe::Error> {
    let app = ViewerApp::new(session);
    eframe::run_native(
        "imgview-ocr",
        ViewerApp::options(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
