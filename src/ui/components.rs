//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use crate::theme;
use chrono::{DateTime, Local};
use eframe::egui;

/// Clock-style timestamp for the status row and request log
pub fn format_time(t: &DateTime<Local>) -> String {
    t.format("%H:%M:%S").to_string()
}

/// Short human-readable duration between request start and finish
pub fn format_duration(started: &DateTime<Local>, finished: &DateTime<Local>) -> String {
    let ms = finished
        .signed_duration_since(*started)
        .num_milliseconds()
        .max(0);
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

/// Custom-painted button with hover/press effects
pub fn painted_button(
    ui: &mut egui::Ui,
    text: &str,
    fill: egui::Color32,
    text_color: egui::Color32,
    size: egui::Vec2,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    if ui.is_rect_visible(rect) {
        let (fill, draw_rect) = theme::button_visual(&response, fill, rect);
        ui.painter().rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
        ui.painter().text(
            draw_rect.center(),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(13.0),
            text_color,
        );
    }
    response
}

/// Square icon button with a hover background. Returns the response.
pub fn icon_button(ui: &mut egui::Ui, icon: &str, size: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::click());
    let color = if response.hovered() {
        ui.painter()
            .rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_SURFACE);
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        theme::TEXT_PRIMARY
    } else {
        theme::TEXT_DIM
    };
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(size * 0.65),
        color,
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn duration_formats_sub_second_as_millis() {
        let start = Local.timestamp_millis_opt(1_000_000).unwrap();
        let end = Local.timestamp_millis_opt(1_000_420).unwrap();
        assert_eq!(format_duration(&start, &end), "420ms");
    }

    #[test]
    fn duration_formats_seconds_with_one_decimal() {
        let start = Local.timestamp_millis_opt(1_000_000).unwrap();
        let end = Local.timestamp_millis_opt(1_002_500).unwrap();
        assert_eq!(format_duration(&start, &end), "2.5s");
    }

    #[test]
    fn duration_clamps_clock_skew_to_zero() {
        let start = Local.timestamp_millis_opt(1_000_000).unwrap();
        let end = Local.timestamp_millis_opt(999_000).unwrap();
        assert_eq!(format_duration(&start, &end), "0ms");
    }
}
