//! Main desktop application.
//!
//! This module contains the `CareerShotApp` struct which implements the
//! `eframe::App` trait, renders whichever of the four screens the state
//! machine derives, and dispatches remote calls on background threads.

use std::path::Path;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;

use eframe::egui;
use tracing::warn;

use super::widgets;
use crate::codec;
use crate::config::Config;
use crate::error::{Operation, user_facing_message};
use crate::gemini::GeminiClient;
use crate::state::{AppState, RemoteRequest, Screen, TaskOutcome};

const IMAGE_FILE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// The career photo application window.
///
/// All mutable state lives in [`AppState`]; this struct only adds the
/// plumbing around it: the completion channel for background requests and
/// cached textures for the two images on screen.
pub struct CareerShotApp {
    state: AppState,
    config: Config,

    // Completion events from background request threads
    rx: Receiver<TaskOutcome>,
    tx: Sender<TaskOutcome>,

    // Texture cache; `None` means "decode on next frame"
    preview_texture: Option<egui::TextureHandle>,
    preview_broken: bool,
    result_texture: Option<egui::TextureHandle>,
    result_broken: bool,
}

impl CareerShotApp {
    pub fn new(config: Config) -> Self {
        let (tx, rx) = channel();
        Self {
            state: AppState::new(),
            config,
            rx,
            tx,
            preview_texture: None,
            preview_broken: false,
            result_texture: None,
            result_broken: false,
        }
    }

    /// Applies completion events sent by background request threads.
    fn process_task_events(&mut self, ctx: &egui::Context) {
        while let Ok(outcome) = self.rx.try_recv() {
            if matches!(outcome, TaskOutcome::Completed { .. }) {
                self.result_texture = None;
                self.result_broken = false;
            }
            self.state.finish(outcome);
            ctx.request_repaint();
        }
    }

    /// Spawns a background thread that runs the remote call and reports
    /// back through the channel. The UI enforces a single in-flight call by
    /// disabling the triggers while the state machine is pending.
    fn dispatch(&self, request: RemoteRequest) {
        let tx = self.tx.clone();
        let config = self.config.clone();
        let operation = request.operation;

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build();

            match runtime {
                Ok(rt) => {
                    rt.block_on(async {
                        let client = GeminiClient::new(&config);
                        let result = match operation {
                            Operation::Generate => {
                                client
                                    .generate(
                                        &request.payload,
                                        &request.mime_type,
                                        &request.instruction,
                                    )
                                    .await
                            }
                            Operation::Edit => {
                                client
                                    .edit(
                                        &request.payload,
                                        &request.mime_type,
                                        &request.instruction,
                                    )
                                    .await
                            }
                        };

                        let outcome = match result {
                            Ok(payload) => TaskOutcome::Completed { operation, payload },
                            Err(e) => TaskOutcome::Failed {
                                operation,
                                message: user_facing_message(operation, &e),
                            },
                        };
                        let _ = tx.send(outcome);
                    });
                }
                Err(e) => {
                    let _ = tx.send(TaskOutcome::Failed {
                        operation,
                        message: format!("Failed to create async runtime: {}", e),
                    });
                }
            }
        });
    }

    fn submit_generate(&mut self) {
        let Some(request) = self.state.begin_generate() else {
            return;
        };
        self.result_texture = None;
        self.result_broken = false;
        self.dispatch(request);
    }

    fn submit_edit(&mut self) {
        let Some(request) = self.state.begin_edit() else {
            return;
        };
        self.dispatch(request);
    }

    fn start_over(&mut self) {
        self.state.reset();
        self.preview_texture = None;
        self.preview_broken = false;
        self.result_texture = None;
        self.result_broken = false;
    }

    /// Loads an image from a filesystem path into the state machine.
    /// Non-image files are silently ignored; read failures surface an error.
    fn upload_from_path(&mut self, path: &Path) {
        let mime = codec::mime_from_path(path);
        if !mime.starts_with("image/") {
            return;
        }
        match codec::encode_file(path) {
            Ok(image) => {
                if self.state.upload(image) {
                    self.preview_texture = None;
                    self.preview_broken = false;
                }
            }
            Err(e) => {
                warn!("Upload failed: {:?}", e);
                self.state.fail_upload(e.to_string());
            }
        }
    }

    /// Handles files dropped onto the window.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(path) = &file.path {
                self.upload_from_path(path);
            } else if let Some(bytes) = &file.bytes {
                // Some platforms deliver the content directly, with a MIME
                // type but no path.
                if !file.mime.starts_with("image/") {
                    continue;
                }
                let image = codec::encode_bytes(bytes, &file.mime);
                if self.state.upload(image) {
                    self.preview_texture = None;
                    self.preview_broken = false;
                }
            }
        }
    }

    /// Opens the native file dialog for click-to-browse selection.
    fn browse_for_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_FILE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.upload_from_path(&path);
    }

    /// Saves the currently displayed generated image via a save dialog.
    fn save_result(&self) {
        let Some(data_url) = self.state.generated() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("career-photo.png")
            .add_filter("PNG image", &["png"])
            .save_file()
        else {
            return;
        };

        let saved = codec::decode_payload(codec::data_url_payload(data_url))
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(Into::into));
        if let Err(e) = saved {
            warn!("Failed to save image to {}: {:?}", path.display(), e);
        }
    }

    /// Lazily decodes the uploaded photo for the preview thumbnail.
    fn ensure_preview_texture(&mut self, ctx: &egui::Context) {
        if self.preview_texture.is_some() || self.preview_broken {
            return;
        }
        let Some(image) = self.state.uploaded() else {
            return;
        };
        match widgets::texture_from_payload(ctx, "upload-preview", &image.payload) {
            Ok(texture) => self.preview_texture = Some(texture),
            Err(e) => {
                warn!("Preview decode failed: {:?}", e);
                self.preview_broken = true;
            }
        }
    }

    /// Lazily decodes the generated image for the result screen.
    fn ensure_result_texture(&mut self, ctx: &egui::Context) {
        if self.result_texture.is_some() || self.result_broken {
            return;
        }
        let Some(data_url) = self.state.generated() else {
            return;
        };
        let payload = codec::data_url_payload(data_url);
        match widgets::texture_from_payload(ctx, "generated-image", payload) {
            Ok(texture) => self.result_texture = Some(texture),
            Err(e) => {
                warn!("Result decode failed: {:?}", e);
                self.result_broken = true;
            }
        }
    }

    fn render_upload(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.heading("Your Future, Imagined");
            ui.label("Upload a clear photo and your dream job. Let our AI bring your career to life.");
            ui.add_space(16.0);

            // Drop zone
            let zone_size = egui::vec2(ui.available_width().min(480.0), 220.0);
            let (rect, response) = ui.allocate_exact_size(zone_size, egui::Sense::click());
            let hovering_files = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
            widgets::draw_drop_zone(ui.painter(), rect, hovering_files);

            if let Some(texture) = &self.preview_texture {
                widgets::paint_fitted_image(ui.painter(), rect.shrink(8.0), texture);
            } else {
                let label = if self.state.uploaded().is_some() {
                    "Photo selected"
                } else {
                    "Drop an image here, or click to browse"
                };
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    label,
                    egui::FontId::proportional(14.0),
                    egui::Color32::GRAY,
                );
            }
            if response.clicked() {
                self.browse_for_image();
            }

            ui.add_space(16.0);
            ui.label("Enter a Profession");
            let profession_edit = ui.add(
                egui::TextEdit::singleline(self.state.profession_mut())
                    .desired_width(320.0)
                    .hint_text("e.g., Astronaut, Chef, Wildlife Photographer"),
            );

            ui.add_space(12.0);
            let enter_pressed = profession_edit.has_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .add_enabled(
                    self.state.can_generate(),
                    egui::Button::new("Generate My Career Photo"),
                )
                .clicked();
            if (clicked || enter_pressed) && self.state.can_generate() {
                self.submit_generate();
            }
        });
    }

    fn render_loading(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.35);
            ui.spinner();
            ui.add_space(12.0);
            ui.label("Imagining your new career... this might take a moment.");
        });
    }

    fn render_error(&mut self, ui: &mut egui::Ui, message: &str) {
        let mut try_again = false;
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading("Oops! Something went wrong.");
            ui.add_space(8.0);
            ui.colored_label(egui::Color32::from_rgb(220, 60, 60), message);
            ui.add_space(16.0);
            if ui.button("Try Again").clicked() {
                try_again = true;
            }
        });
        if try_again {
            self.start_over();
        }
    }

    fn render_result(&mut self, ui: &mut egui::Ui) {
        let mut start_over = false;
        let mut save = false;
        let mut edit = false;

        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.heading("Here you are!");
            ui.add_space(8.0);

            // Reserve the bottom strip for the edit controls.
            let image_height = (ui.available_height() - 110.0).max(180.0);
            let image_area = egui::vec2(ui.available_width(), image_height);
            let (rect, _) = ui.allocate_exact_size(image_area, egui::Sense::hover());
            if let Some(texture) = &self.result_texture {
                widgets::paint_fitted_image(ui.painter(), rect, texture);
            } else {
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Could not display the generated image.",
                    egui::FontId::proportional(14.0),
                    egui::Color32::GRAY,
                );
            }

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() - 560.0).max(0.0) / 2.0);
                let edit_field = ui.add(
                    egui::TextEdit::singleline(self.state.edit_instruction_mut())
                        .desired_width(320.0)
                        .hint_text("Describe a change, e.g., add a hat"),
                );
                let enter_pressed =
                    edit_field.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let clicked = ui
                    .add_enabled(self.state.can_edit(), egui::Button::new("Apply Edit"))
                    .clicked();
                edit = clicked || (enter_pressed && self.state.can_edit());
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() - 220.0).max(0.0) / 2.0);
                if ui.button("Save Image…").clicked() {
                    save = true;
                }
                if ui.button("Start Over").clicked() {
                    start_over = true;
                }
            });
        });

        if edit {
            self.submit_edit();
        }
        if save {
            self.save_result();
        }
        if start_over {
            self.start_over();
        }
    }
}

impl eframe::App for CareerShotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_task_events(ctx);

        // Keep polling the completion channel while a request is in flight;
        // without input events egui would otherwise never repaint.
        if self.state.is_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        if !self.state.is_pending() {
            self.handle_dropped_files(ctx);
        }

        self.ensure_preview_texture(ctx);
        self.ensure_result_texture(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.state.screen() {
                Screen::Upload => self.render_upload(ui),
                Screen::Loading => self.render_loading(ui),
                Screen::Error => {
                    let message = self
                        .state
                        .error()
                        .unwrap_or("An unknown error occurred.")
                        .to_string();
                    self.render_error(ui, &message);
                }
                Screen::Result => self.render_result(ui),
            }
        });
    }
}
