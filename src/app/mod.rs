//! App module - contains the main application state and logic

mod fetch;

use crate::constants::*;
use crate::settings::Settings;
use crate::theme;
use crate::types::FetchState;
use crate::utils;
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Fetch state shared with background tasks
    pub(crate) fetch_state: Arc<Mutex<FetchState>>,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) client: reqwest::Client,
    // Endpoint
    pub(crate) api_base: String,
    pub(crate) api_base_edit: String,
    // View
    pub(crate) wrap_output: bool,
    pub(crate) show_request_log: bool,
    pub(crate) show_settings: bool,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    // Window geometry tracking for save on exit
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let api_base = settings.api_base_or_default();

        Self {
            fetch_state: Arc::new(Mutex::new(FetchState::default())),
            runtime: tokio::runtime::Runtime::new().unwrap(),
            client: reqwest::Client::new(),
            api_base: api_base.clone(),
            api_base_edit: api_base,
            wrap_output: settings.wrap_output,
            show_request_log: settings.show_request_log,
            show_settings: false,
            logo_texture: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    /// Full URL of the data endpoint for the configured base.
    pub fn data_url(&self) -> String {
        utils::join_url(&self.api_base, API_DATA_PATH)
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            api_base: Some(self.api_base.clone()),
            wrap_output: self.wrap_output,
            show_request_log: self.show_request_log,
        };
        settings.save(&self.data_dir);
    }
}
