//! Fetch-and-display logic

use super::App;
use crate::constants::ERROR_PREFIX;
use eframe::egui;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Failure anywhere in the request/decode cycle. Both sources are handled
/// at the same boundary and rendered the same way.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

/// GET the endpoint and decode the body as JSON.
///
/// The HTTP status is deliberately not checked: a non-2xx response whose
/// body parses as JSON is returned like any other payload.
pub async fn fetch_payload(
    client: &reqwest::Client,
    url: &str,
) -> Result<serde_json::Value, FetchError> {
    let response = client.get(url).send().await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Convert a request result into the text shown in the output region:
/// 2-space pretty-printed JSON, or the prefixed error message.
pub fn display_text(result: &Result<serde_json::Value, FetchError>) -> String {
    match result {
        Ok(value) => serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("{}{}", ERROR_PREFIX, e)),
        Err(e) => format!("{}{}", ERROR_PREFIX, e),
    }
}

impl App {
    /// Trigger handler: spawn an independent fetch task. Overlapping
    /// activations spawn overlapping requests; there is no de-duplication
    /// and no cancellation, and the last completion owns the output.
    pub fn fetch_data(&mut self, ctx: &egui::Context) {
        let url = self.data_url();
        let id = self.fetch_state.lock().unwrap().begin_request();
        info!(id, url = %url, "Request started");

        let client = self.client.clone();
        let state = Arc::clone(&self.fetch_state);
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = fetch_payload(&client, &url).await;
            match &result {
                Ok(_) => debug!(id, "Response decoded"),
                Err(e) => error!(id, error = %e, "Request failed"),
            }
            let ok = result.is_ok();
            let text = display_text(&result);

            let mut s = state.lock().unwrap();
            s.finish_request(id, text, ok);
            drop(s);
            ctx.request_repaint();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::API_DATA_PATH;

    fn client() -> reqwest::Client {
        reqwest::Client::new()
    }

    #[tokio::test]
    async fn success_pretty_prints_with_two_space_indent() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", API_DATA_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"a":1}"#)
            .create_async()
            .await;

        let url = format!("{}{}", server.url(), API_DATA_PATH);
        let result = fetch_payload(&client(), &url).await;

        assert_eq!(display_text(&result), "{\n  \"a\": 1\n}");
    }

    #[tokio::test]
    async fn malformed_body_reports_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", API_DATA_PATH)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let url = format!("{}{}", server.url(), API_DATA_PATH);
        let result = fetch_payload(&client(), &url).await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
        let text = display_text(&result);
        assert!(text.starts_with(ERROR_PREFIX));
        assert!(text.len() > ERROR_PREFIX.len());
    }

    #[tokio::test]
    async fn transport_failure_reports_prefixed_error() {
        // Nothing listens on the discard port
        let url = format!("http://127.0.0.1:1{}", API_DATA_PATH);
        let result = fetch_payload(&client(), &url).await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
        assert!(display_text(&result).starts_with(ERROR_PREFIX));
    }

    #[tokio::test]
    async fn non_2xx_json_body_still_displays_as_data() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", API_DATA_PATH)
            .with_status(500)
            .with_body(r#"{"error":"boom"}"#)
            .create_async()
            .await;

        let url = format!("{}{}", server.url(), API_DATA_PATH);
        let result = fetch_payload(&client(), &url).await;

        assert!(result.is_ok());
        assert_eq!(display_text(&result), "{\n  \"error\": \"boom\"\n}");
    }
}
