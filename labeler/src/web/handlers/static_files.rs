//! Static file serving handlers
//!
//! The review page and its script are embedded in the binary at build time.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Embedded static assets
#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

fn content_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Serve index.html for root path
pub async fn serve_index() -> Response {
    match StaticAssets::get("index.html") {
        Some(file) => Html(String::from_utf8_lossy(&file.data).into_owned()).into_response(),
        None => (StatusCode::NOT_FOUND, "Review page not found").into_response(),
    }
}

/// Serve static files
pub async fn serve_static(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');
    match StaticAssets::get(path) {
        Some(file) => (
            [
                (header::CONTENT_TYPE, content_type(path)),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            file.data.into_owned(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "File not found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(content_type("app.js"), "application/javascript; charset=utf-8");
        assert_eq!(content_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type("blob"), "application/octet-stream");
    }

    #[test]
    fn test_assets_are_embedded() {
        assert!(StaticAssets::get("index.html").is_some());
        assert!(StaticAssets::get("app.js").is_some());
    }

    #[test]
    fn test_script_reuses_session_and_sends_reviewer() {
        let script = StaticAssets::get("app.js").unwrap();
        let script = String::from_utf8_lossy(&script.data);
        assert!(script.contains("sessionStorage"));
        assert!(script.contains("reviewer: document.getElementById('reviewer').value || undefined"));
        assert!(script.contains("'session_not_found'"));
    }
}
