//! Shared route helpers for page rendering and admin checks.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::session;
use crate::state::AppState;

/// Default page size for admin listings.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Largest page size an admin listing accepts.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Require an admin session for an API handler.
///
/// The guard skips `/api`, so API handlers check the server-side session
/// themselves and answer 401 instead of redirecting.
pub async fn require_admin(session: &Session) -> AppResult<Uuid> {
    session::current_admin(session)
        .await
        .ok_or(AppError::Unauthorized)
}

/// Clamp `limit`/`offset` query values into a sane window.
pub fn page_window(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

/// Render a template, answering 500 with a plain error page on failure.
pub fn render_template(state: &AppState, template: &str, context: &tera::Context) -> Response {
    match state.theme().render(template, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), template = %template, "failed to render template");
            render_error_page()
        }
    }
}

/// The page shown when rendering fails. Never includes error details.
pub fn render_error_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(
            r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Error</title></head>
<body><h1>Something went wrong</h1><p>The page could not be displayed.</p></body></html>"#,
        ),
    )
        .into_response()
}

/// The page shown for paths with no content.
pub fn render_not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Not found</title></head>
<body><h1>Page not found</h1></body></html>"#,
        ),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_defaults_and_clamps() {
        assert_eq!(page_window(None, None), (DEFAULT_PAGE_SIZE, 0));
        assert_eq!(page_window(Some(0), Some(-5)), (1, 0));
        assert_eq!(page_window(Some(10_000), Some(20)), (MAX_PAGE_SIZE, 20));
    }

    #[test]
    fn error_page_is_500() {
        assert_eq!(render_error_page().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
