//! Embedded static assets for the browser UI
//!
//! In development, falls back to serving from the filesystem.

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;
use std::path::PathBuf;

#[derive(Embed)]
#[folder = "ui"]
struct Assets;

fn asset_response(path: &str, data: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    ([(header::CONTENT_TYPE, mime.as_ref().to_string())], Body::from(data)).into_response()
}

/// Serve embedded static files, with filesystem fallback for development
pub async fn serve_static(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');

    if let Some(content) = Assets::get(path) {
        return asset_response(path, content.data.to_vec());
    }

    // Never resolve outside the ui directory
    if !path.split('/').any(|part| part == "..") {
        if let Ok(content) = std::fs::read(PathBuf::from("ui").join(path)) {
            return asset_response(path, content);
        }
    }

    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Get the index.html content (embedded or from filesystem)
#[must_use]
pub fn get_index_html() -> Option<String> {
    if let Some(content) = Assets::get("index.html") {
        return String::from_utf8(content.data.to_vec()).ok();
    }

    std::fs::read_to_string("ui/index.html").ok()
}
