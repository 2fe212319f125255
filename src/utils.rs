//! Utility functions

use std::path::PathBuf;

// Square artwork used for the sidebar logo and the window/taskbar icon
pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect x="2" y="2" width="60" height="60" rx="14" fill="#18181b"/><path d="M26 15c-5 0-7 2.5-7 7v4c0 3.5-1.8 5.5-5.5 6 3.7.5 5.5 2.5 5.5 6v4c0 4.5 2 7 7 7" fill="none" stroke="#38bdf8" stroke-width="4.5" stroke-linecap="round"/><path d="M38 15c5 0 7 2.5 7 7v4c0 3.5 1.8 5.5 5.5 6-3.7.5-5.5 2.5-5.5 6v4c0 4.5-2 7-7 7" fill="none" stroke="#38bdf8" stroke-width="4.5" stroke-linecap="round"/><circle cx="32" cy="32" r="2.8" fill="#e4e4e7"/></svg>"##;

/// Rasterize the logo SVG to a square RGBA image of the given size.
pub fn rasterize_logo(size: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).unwrap();
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), size, size)
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the app data directory path
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("API Data Viewer")
}

/// Join an endpoint base URL and a request path, tolerating trailing slashes.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("http://127.0.0.1:8000/", "/api/v1/data"),
            "http://127.0.0.1:8000/api/v1/data"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8000", "/api/v1/data"),
            "http://127.0.0.1:8000/api/v1/data"
        );
    }
}
