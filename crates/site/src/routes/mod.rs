//! HTTP route handlers.

pub mod appointments;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod helpers;
pub mod messages;
pub mod pages;
pub mod static_files;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::warn;

use crate::config::Config;
use crate::middleware::{guard_access, negotiate_locale};
use crate::state::AppState;

/// Build the application router with its middleware stack.
///
/// Generic over the session store so the server can use Redis while tests
/// use the in-memory store.
pub fn build_router<Store>(state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    let cors = build_cors_layer(state.config());

    Router::new()
        .merge(pages::router())
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(appointments::router())
        .merge(messages::router())
        .merge(health::router())
        .merge(static_files::router())
        // Middleware layers (last added = first executed in request flow):
        // TraceLayer → CORS → access guard → session → locale → routes
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            negotiate_locale,
        ))
        .layer(session_layer)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            guard_access,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if config.cors_allowed_origins.len() == 1 && config.cors_allowed_origins[0] == "*" {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        // Credentialed CORS cannot use wildcard headers.
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(true)
    }
}
