//! Static file serving from the configured static directory.

use std::path::Path as FsPath;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::fs;
use tracing::warn;

use crate::state::AppState;

/// Create the static files router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/static/{*path}", get(serve_static))
        .route("/favicon.ico", get(favicon))
}

/// Serve a static file.
async fn serve_static(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    serve_file(&state.config().static_dir, &path).await
}

async fn favicon(State(state): State<AppState>) -> Response {
    serve_file(&state.config().static_dir, "favicon.ico").await
}

async fn serve_file(static_dir: &FsPath, path: &str) -> Response {
    let path = path.trim_start_matches('/');
    if !is_safe_relative(path) {
        return not_found();
    }

    let file_path = static_dir.join(path);

    let content = match fs::read(&file_path).await {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %file_path.display(), error = %e, "failed to read static file");
            }
            return not_found();
        }
    };

    (
        [
            (header::CONTENT_TYPE, mime_from_path(&file_path)),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        Body::from(content),
    )
        .into_response()
}

/// Reject traversal, NUL bytes and empty paths.
fn is_safe_relative(path: &str) -> bool {
    !path.is_empty()
        && !path.contains('\0')
        && !path.contains('\\')
        && path.split('/').all(|segment| segment != "..")
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

fn mime_from_path(path: &FsPath) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("html") => "text/html",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("woff2") => "font/woff2",
        Some("mp4") => "video/mp4",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn traversal_is_rejected() {
        assert!(!is_safe_relative("../secrets.env"));
        assert!(!is_safe_relative("css/../../etc/passwd"));
        assert!(!is_safe_relative("a\0b"));
        assert!(!is_safe_relative(""));
        assert!(is_safe_relative("css/site.css"));
        assert!(is_safe_relative("img/logo..v2.png"));
    }

    #[test]
    fn mime_types() {
        assert_eq!(mime_from_path(Path::new("site.css")), "text/css");
        assert_eq!(mime_from_path(Path::new("hero.webp")), "image/webp");
        assert_eq!(mime_from_path(Path::new("favicon.ico")), "image/x-icon");
        assert_eq!(mime_from_path(Path::new("blob")), "application/octet-stream");
    }
}
