use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use object_measure::client::HttpClient;
use object_measure::config::Config;
use object_measure::local_image::LocalImage;
use object_measure_common::{
    Error as CommonError, Job, Section, Ticket, ViewController, AREA_UNIT, OBJECT_LIST_HEADING,
};
use tracing::{info, warn};

use crate::io::{
    decode_preview, fetch_result_thumb, load_local, pick_image, save_result_image, upload_blocking,
    Thumb,
};
use crate::model::EguiView;

const ACCENT: Color32 = Color32::from_rgb(246, 196, 69);

pub struct DesktopApp {
    controller: ViewController<EguiView, LocalImage>,
    client: Option<HttpClient>,
    status: String,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
    preview_texture: Option<egui::TextureHandle>,
    result_texture: Option<egui::TextureHandle>,
    result_source: Option<String>,
    saving: bool,
}

enum WorkerMessage {
    Decoded {
        ticket: Ticket,
        outcome: object_measure_common::Result<String>,
        thumb: Option<Thumb>,
    },
    Uploaded {
        ticket: Ticket,
        outcome: object_measure_common::Result<String>,
    },
    ResultImage {
        source: String,
        thumb: Result<Thumb, String>,
    },
    Saved {
        message: String,
    },
}

enum UiAction {
    Browse,
    Submit,
    Reset,
    SaveResult,
}

impl DesktopApp {
    pub fn new(config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        let server_url = config.server_url();
        let (client, status) =
            match HttpClient::new(&server_url, Duration::from_secs(config.timeout_seconds)) {
                Ok(client) => (Some(client), format!("Server: {server_url}")),
                Err(err) => {
                    warn!(error = %err, "invalid server url");
                    (None, format!("Invalid server URL: {err}"))
                }
            };

        Self {
            controller: ViewController::new(EguiView::default())
                .with_max_upload_bytes(config.max_upload_bytes),
            client,
            status,
            tx,
            rx,
            preview_texture: None,
            result_texture: None,
            result_source: None,
            saving: false,
        }
    }

    fn open_path(&mut self, path: PathBuf) {
        match load_local(&path) {
            Ok(image) => self.select(image),
            Err(err) => self.status = format!("Open failed: {err:#}"),
        }
    }

    fn select(&mut self, image: LocalImage) {
        self.preview_texture = None;
        let Some(job) = self.controller.select_file(Some(image)) else {
            return;
        };
        self.status = format!("Reading {}", job.file.file_name);
        self.spawn_decode(job);
    }

    fn spawn_decode(&self, job: Job<LocalImage>) {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let message = match decode_preview(&job.file) {
                Ok((data_url, thumb)) => WorkerMessage::Decoded {
                    ticket: job.ticket,
                    outcome: Ok(data_url),
                    thumb: Some(thumb),
                },
                Err(err) => WorkerMessage::Decoded {
                    ticket: job.ticket,
                    outcome: Err(CommonError::Decode(format!("{err:#}"))),
                    thumb: None,
                },
            };
            let _ = tx.send(message);
        });
    }

    fn submit(&mut self) {
        let Some(job) = self.controller.submit() else {
            return;
        };
        let Some(client) = self.client.clone() else {
            self.controller.complete_upload(
                job.ticket,
                Err(CommonError::Transport("no server configured".to_string())),
            );
            return;
        };

        self.status = format!("Uploading to {}", client.base_url());
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let outcome = upload_blocking(&client, &job.file);
            let _ = tx.send(WorkerMessage::Uploaded {
                ticket: job.ticket,
                outcome,
            });
        });
    }

    fn reset(&mut self) {
        self.controller.reset();
        self.preview_texture = None;
        self.result_texture = None;
        self.result_source = None;
        self.status.clear();
    }

    fn request_result_image(&mut self) {
        let (Some(result), Some(client)) = (self.controller.result(), self.client.clone()) else {
            return;
        };
        let source = result.result_image.clone();
        if source.is_empty() || self.result_source.as_deref() == Some(source.as_str()) {
            return;
        }
        self.result_source = Some(source.clone());
        self.result_texture = None;

        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let thumb = fetch_result_thumb(&client, &source).map_err(|e| format!("{e:#}"));
            let _ = tx.send(WorkerMessage::ResultImage { source, thumb });
        });
    }

    fn save_result(&mut self) {
        let (Some(result), Some(client)) = (self.controller.result(), self.client.clone()) else {
            return;
        };
        let source = result.result_image.clone();
        let default_name = source
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty() && !name.starts_with("data:"))
            .unwrap_or("result.png")
            .to_string();
        let Some(dest) = rfd::FileDialog::new().set_file_name(&default_name).save_file() else {
            return;
        };

        self.saving = true;
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let message = match save_result_image(&client, &source, &dest) {
                Ok(()) => format!("Saved {}", dest.display()),
                Err(err) => format!("Save failed: {err:#}"),
            };
            let _ = tx.send(WorkerMessage::Saved { message });
        });
    }

    fn poll_messages(&mut self, ctx: &egui::Context) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                WorkerMessage::Decoded { ticket, outcome, thumb } => {
                    if self.controller.complete_decode(ticket, outcome) {
                        self.status.clear();
                        self.preview_texture = thumb.map(|t| load_texture(ctx, "preview", t));
                    }
                }
                WorkerMessage::Uploaded { ticket, outcome } => {
                    if self.controller.complete_upload(ticket, outcome) {
                        self.status.clear();
                        if self.controller.section() == Section::Result {
                            self.request_result_image();
                        }
                    }
                }
                WorkerMessage::ResultImage { source, thumb } => {
                    if self.result_source.as_deref() != Some(source.as_str()) {
                        continue;
                    }
                    match thumb {
                        Ok(thumb) => self.result_texture = Some(load_texture(ctx, "result", thumb)),
                        Err(err) => {
                            warn!(error = %err, "result image unavailable");
                            self.status = format!("Result image unavailable: {err}");
                        }
                    }
                }
                WorkerMessage::Saved { message } => {
                    info!("{message}");
                    self.saving = false;
                    self.status = message;
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // 複数ドロップ時は先頭のみ
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if let Some(path) = file.path {
            self.open_path(path);
        } else if let Some(bytes) = file.bytes {
            self.select(LocalImage::from_bytes(&file.name, bytes));
        }
    }

    fn render_upload(&self, ui: &mut egui::Ui, hovering: bool, actions: &mut Vec<UiAction>) {
        let frame = egui::Frame::none()
            .fill(if hovering { Color32::from_rgb(31, 35, 48) } else { Color32::from_rgb(24, 28, 40) })
            .stroke(egui::Stroke::new(2.0, if hovering { ACCENT } else { Color32::from_gray(60) }))
            .rounding(egui::Rounding::same(10.0))
            .inner_margin(egui::Margin::same(40.0));

        let inner = frame.show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Drop an image here").size(18.0));
                ui.label("or click to choose a file");
            });
        });

        if inner.response.interact(egui::Sense::click()).clicked() {
            actions.push(UiAction::Browse);
        }
    }

    fn render_preview(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        if let Some(selected) = self.controller.selected() {
            ui.label(RichText::new(&selected.file.file_name).strong());
        }
        if let Some(texture) = &self.preview_texture {
            ui.add(egui::Image::new(texture).max_size(egui::vec2(640.0, 480.0)));
        }
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Measure Objects").clicked() {
                actions.push(UiAction::Submit);
            }
            if ui.button("Choose Another").clicked() {
                actions.push(UiAction::Reset);
            }
        });
    }

    fn render_loading(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.spinner();
            ui.label("Analyzing image...");
        });
    }

    fn render_result(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let Some(result) = &self.controller.view().result else {
            return;
        };

        egui::Grid::new("summary").striped(true).min_col_width(120.0).show(ui, |ui| {
            ui.label(RichText::new("Objects").color(Color32::from_gray(200)));
            ui.label(RichText::new(&result.object_count).strong());
            ui.end_row();
            ui.label(RichText::new("Total Area").color(Color32::from_gray(200)));
            ui.label(format!("{} {}", result.total_area, AREA_UNIT));
            ui.end_row();
            ui.label(RichText::new("Average Area").color(Color32::from_gray(200)));
            ui.label(format!("{} {}", result.average_area, AREA_UNIT));
            ui.end_row();
        });

        ui.add_space(8.0);
        match &self.result_texture {
            Some(texture) => {
                ui.add(egui::Image::new(texture).max_size(egui::vec2(640.0, 480.0)));
            }
            None if !result.result_image.is_empty() => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading result image...");
                });
            }
            None => {}
        }

        ui.add_space(8.0);
        ui.label(RichText::new(OBJECT_LIST_HEADING).strong());
        egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
            for entry in &result.objects {
                ui.horizontal(|ui| {
                    ui.label(&entry.label);
                    ui.label(RichText::new(entry.area_with_unit()).color(ACCENT));
                });
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Analyze Another Image").clicked() {
                actions.push(UiAction::Reset);
            }
            let can_save = !self.saving && self.client.is_some() && !result.result_image.is_empty();
            if ui.add_enabled(can_save, egui::Button::new("Save Result Image")).clicked() {
                actions.push(UiAction::SaveResult);
            }
        });
    }

    fn render_error(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.label(RichText::new(&self.controller.view().error_text).color(Color32::from_rgb(235, 87, 87)));
        ui.add_space(8.0);
        if ui.button("Try Again").clicked() {
            actions.push(UiAction::Reset);
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Browse => {
                if let Some(path) = pick_image() {
                    self.open_path(path);
                }
            }
            UiAction::Submit => self.submit(),
            UiAction::Reset => self.reset(),
            UiAction::SaveResult => self.save_result(),
        }
    }
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    // 日本語のファイル名を表示するため
    let candidates = [
        r"C:\Windows\Fonts\meiryo.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("cjk_fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .push("cjk_fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

fn load_texture(ctx: &egui::Context, name: &str, thumb: Thumb) -> egui::TextureHandle {
    let color_image = egui::ColorImage::from_rgba_unmultiplied(thumb.size, &thumb.pixels);
    ctx.load_texture(name, color_image, egui::TextureOptions::default())
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages(ctx);
        if self.controller.is_busy() || self.saving {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        if self.controller.section() == Section::Upload {
            self.handle_dropped_files(ctx);
        }
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
        });

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Object Size Measurement");
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                let view = self.controller.view();
                if view.is_visible(Section::Upload) {
                    self.render_upload(ui, hovering, &mut actions);
                }
                if view.is_visible(Section::Preview) {
                    self.render_preview(ui, &mut actions);
                }
                if view.is_visible(Section::Loading) {
                    self.render_loading(ui);
                }
                if view.is_visible(Section::Result) {
                    self.render_result(ui, &mut actions);
                }
                if view.is_visible(Section::Error) {
                    self.render_error(ui, &mut actions);
                }
            });
        });

        for action in actions {
            self.apply(action);
        }
    }
}
