#![windows_subsystem = "windows"]
//! API Data Viewer - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use tracing::info;
use types::{FetchState, RequestStatus};
use ui::components;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "api-data-viewer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,api_data_viewer=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = utils::get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "API Data Viewer starting");

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(760.0, 560.0)))
        .with_min_inner_size([520.0, 400.0])
        .with_title("API Data Viewer");

    // Set window/taskbar icon from the inline SVG logo
    {
        let (rgba, w, h) = utils::rasterize_logo(256);
        let icon = egui::IconData { rgba, width: w, height: h };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "API Data Viewer",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // F5 triggers a fetch from anywhere outside the settings modal
        if !self.show_settings && ctx.input(|i| i.key_pressed(egui::Key::F5)) {
            self.fetch_data(ctx);
        }

        // Snapshot shared state once per frame
        let state = self.fetch_state.lock().unwrap().clone();

        self.render_settings_modal(ctx);

        // Bottom panels must be added before the CentralPanel
        self.render_status_bar(ctx, &state);
        self.render_request_log(ctx, &state);

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin { left: 16, right: 16, top: 12, bottom: 8 }),
            )
            .show(ctx, |ui| {
                self.render_header(ui, ctx);
                ui.add_space(10.0);
                self.render_endpoint_row(ui, ctx, &state);
                ui.add_space(10.0);
                self.render_output(ui, &state);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

// ============================================================================
// VIEW RENDERING
// ============================================================================

impl App {
    fn render_header(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            let texture = self.logo_texture.get_or_insert_with(|| {
                let (pixels, w, h) = utils::rasterize_logo(64);
                ctx.load_texture(
                    "logo",
                    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                    egui::TextureOptions::LINEAR,
                )
            });
            ui.image(egui::load::SizedTexture::new(texture.id(), egui::vec2(22.0, 22.0)));
            ui.add(
                egui::Label::new(
                    egui::RichText::new("API DATA VIEWER")
                        .size(12.0)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let gear = components::icon_button(ui, egui_phosphor::regular::GEAR, 24.0);
                if gear.clicked() {
                    self.api_base_edit = self.api_base.clone();
                    self.show_settings = true;
                }
                gear.on_hover_text("Settings");

                let log_btn =
                    components::icon_button(ui, egui_phosphor::regular::LIST_BULLETS, 24.0);
                if log_btn.clicked() {
                    self.show_request_log = !self.show_request_log;
                    self.save_settings();
                }
                log_btn.on_hover_text("Request log");
            });
        });
    }

    fn render_endpoint_row(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, state: &FetchState) {
        theme::section_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("GET")
                            .size(12.0)
                            .strong()
                            .color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(self.data_url())
                            .monospace()
                            .size(12.0)
                            .color(theme::TEXT_MUTED),
                    )
                    .truncate()
                    .selectable(false),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let fetch_text =
                        format!("{} Fetch Data", egui_phosphor::regular::DOWNLOAD_SIMPLE);
                    let response = components::painted_button(
                        ui,
                        &fetch_text,
                        theme::BTN_ACCENT,
                        theme::ACCENT_TEXT,
                        egui::vec2(128.0, 30.0),
                    );
                    // Clicks while requests are in flight start more requests;
                    // there is no de-duplication.
                    if response.clicked() {
                        self.fetch_data(ctx);
                    }
                    response.on_hover_text("F5");

                    if state.active_count > 0 {
                        ui.add(egui::Spinner::new().size(14.0).color(theme::ACCENT));
                    }
                });
            });
        });
    }

    fn render_output(&mut self, ui: &mut egui::Ui, state: &FetchState) {
        theme::section_frame().show(ui, |ui| {
            match &state.output {
                Some(text) => {
                    let is_error = text.starts_with(ERROR_PREFIX);
                    let color = if is_error {
                        theme::STATUS_ERROR
                    } else {
                        theme::TEXT_SECONDARY
                    };
                    egui::ScrollArea::both()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            let label = egui::Label::new(
                                egui::RichText::new(text)
                                    .monospace()
                                    .size(12.5)
                                    .color(color),
                            )
                            .selectable(true);
                            let label = if self.wrap_output {
                                label.wrap()
                            } else {
                                label.extend()
                            };
                            ui.add(label);
                        });
                }
                None => {
                    // The output region is never written before the first fetch
                    ui.centered_and_justified(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new("No data fetched yet")
                                    .size(13.0)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    });
                }
            }
        });
    }

    fn render_request_log(&mut self, ctx: &egui::Context, state: &FetchState) {
        if !self.show_request_log || state.records.is_empty() {
            return;
        }
        egui::TopBottomPanel::bottom("request_log")
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin { left: 16, right: 16, top: 0, bottom: 4 }),
            )
            .show(ctx, |ui| {
                theme::section_frame().show(ui, |ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("REQUESTS")
                                .size(11.0)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                    ui.add_space(4.0);
                    egui::ScrollArea::vertical()
                        .max_height(110.0)
                        .auto_shrink([false, true])
                        .show(ui, |ui| {
                            for rec in state.records.iter().rev() {
                                let (icon, color) = match &rec.status {
                                    RequestStatus::InFlight => {
                                        (egui_phosphor::regular::CLOCK, theme::STATUS_WARNING)
                                    }
                                    RequestStatus::Done => (
                                        egui_phosphor::regular::CHECK_CIRCLE,
                                        theme::STATUS_SUCCESS,
                                    ),
                                    RequestStatus::Failed(_) => {
                                        (egui_phosphor::regular::X_CIRCLE, theme::STATUS_ERROR)
                                    }
                                };
                                let elapsed = match &rec.finished_at {
                                    Some(end) => {
                                        components::format_duration(&rec.started_at, end)
                                    }
                                    None => "in flight".to_string(),
                                };
                                let row = ui.horizontal(|ui| {
                                    ui.add(
                                        egui::Label::new(
                                            egui::RichText::new(icon).size(13.0).color(color),
                                        )
                                        .selectable(false),
                                    );
                                    ui.add(
                                        egui::Label::new(
                                            egui::RichText::new(format!("#{:03}", rec.id))
                                                .monospace()
                                                .size(12.0)
                                                .color(theme::TEXT_MUTED),
                                        )
                                        .selectable(false),
                                    );
                                    ui.add(
                                        egui::Label::new(
                                            egui::RichText::new(components::format_time(
                                                &rec.started_at,
                                            ))
                                            .size(12.0)
                                            .color(theme::TEXT_DIM),
                                        )
                                        .selectable(false),
                                    );
                                    ui.add(
                                        egui::Label::new(
                                            egui::RichText::new(elapsed)
                                                .size(12.0)
                                                .color(theme::TEXT_DIM),
                                        )
                                        .selectable(false),
                                    );
                                });
                                if let RequestStatus::Failed(msg) = &rec.status {
                                    row.response.on_hover_text(msg);
                                }
                            }
                        });
                });
            });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context, state: &FetchState) {
        egui::TopBottomPanel::bottom("status_bar")
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin { left: 16, right: 16, top: 2, bottom: 8 }),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if state.active_count > 0 {
                        ui.add(egui::Spinner::new().size(12.0).color(theme::ACCENT));
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(format!("{} in flight", state.active_count))
                                    .size(12.0)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    }
                    if state.completed_count > 0 {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(format!(
                                    "{} {}",
                                    egui_phosphor::regular::CHECK_CIRCLE,
                                    state.completed_count
                                ))
                                .size(12.0)
                                .color(theme::STATUS_SUCCESS),
                            )
                            .selectable(false),
                        );
                    }
                    if state.failed_count > 0 {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(format!(
                                    "{} {}",
                                    egui_phosphor::regular::X_CIRCLE,
                                    state.failed_count
                                ))
                                .size(12.0)
                                .color(theme::STATUS_ERROR),
                            )
                            .selectable(false),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(format!("v{}", APP_VERSION))
                                    .size(10.0)
                                    .color(egui::Color32::from_rgb(0x45, 0x45, 0x4c)),
                            )
                            .selectable(false),
                        );
                        if let Some(t) = &state.last_finished {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(format!(
                                        "Updated {}",
                                        components::format_time(t)
                                    ))
                                    .size(12.0)
                                    .color(theme::TEXT_DIM),
                                )
                                .selectable(false),
                            );
                        }
                    });
                });
            });
    }

    // Settings modal (centered overlay)
    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(
                egui::Frame::new()
                    .fill(egui::Color32::from_rgb(0x1a, 0x1a, 0x1e))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0x2a, 0x2a, 0x2e)))
                    .corner_radius(theme::RADIUS_LARGE)
                    .inner_margin(egui::Margin::same(20)),
            )
            .show(ctx, |ui| {
                ui.set_width(340.0);

                // Title bar with close button
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(egui::RichText::new("Settings").size(16.0).strong())
                            .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if components::icon_button(ui, egui_phosphor::regular::X, 24.0).clicked() {
                            self.show_settings = false;
                        }
                    });
                });
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — Endpoint —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("API Endpoint")
                            .size(13.0)
                            .color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                let applied = egui::Frame::new()
                    .fill(theme::BG_INPUT)
                    .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE))
                    .corner_radius(theme::RADIUS_DEFAULT)
                    .inner_margin(egui::Margin::symmetric(6, 4))
                    .show(ui, |ui| {
                        let te = ui.add(
                            egui::TextEdit::singleline(&mut self.api_base_edit)
                                .frame(false)
                                .desired_width(ui.available_width())
                                .font(egui::FontId::monospace(13.0)),
                        );
                        te.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    })
                    .inner;
                if applied {
                    let trimmed = self.api_base_edit.trim();
                    self.api_base = if trimmed.is_empty() {
                        DEFAULT_API_BASE.to_string()
                    } else {
                        trimmed.to_string()
                    };
                    self.api_base_edit = self.api_base.clone();
                    self.save_settings();
                    info!(api_base = %self.api_base, "Endpoint changed");
                }
                ui.add_space(2.0);
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(format!("GET {}", self.data_url()))
                            .size(11.0)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — View —
                ui.add(
                    egui::Label::new(egui::RichText::new("View").size(13.0).color(theme::ACCENT))
                        .selectable(false),
                );
                ui.add_space(2.0);
                if theme::settings_checkbox(ui, self.wrap_output, "Wrap output text", true) {
                    self.wrap_output = !self.wrap_output;
                    self.save_settings();
                }
                if theme::settings_checkbox(ui, self.show_request_log, "Show request log", true) {
                    self.show_request_log = !self.show_request_log;
                    self.save_settings();
                }

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — Logs —
                ui.add(
                    egui::Label::new(egui::RichText::new("Logs").size(13.0).color(theme::ACCENT))
                        .selectable(false),
                );
                ui.add_space(2.0);
                let response = components::painted_button(
                    ui,
                    &format!("{}  Open Logs", egui_phosphor::regular::FOLDER_OPEN),
                    theme::BTN_DEFAULT,
                    egui::Color32::WHITE,
                    egui::vec2(120.0, 26.0),
                );
                if response.clicked() {
                    let logs_dir = self.data_dir.join("logs");
                    std::fs::create_dir_all(&logs_dir).ok();
                    let _ = open::that(&logs_dir);
                }
            });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }
}
