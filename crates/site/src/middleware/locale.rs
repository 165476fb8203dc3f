//! Locale negotiation middleware.
//!
//! Resolves the active locale from the first URL segment and records it in
//! the request extensions. Unsupported or absent segments resolve to the
//! default locale; a request is never rejected for its locale.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::services::locale::Locale;
use crate::state::AppState;

/// The resolved locale for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocale(pub Locale);

/// Middleware recording the request's [`ResolvedLocale`].
pub async fn negotiate_locale(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let locale = state.locales().resolve_path(request.uri().path());
    request.extensions_mut().insert(ResolvedLocale(locale));
    next.run(request).await
}

impl FromRequestParts<AppState> for ResolvedLocale {
    type Rejection = std::convert::Infallible;

    /// Reads the value set by [`negotiate_locale`], resolving from the path
    /// when the middleware did not run (e.g. in isolated handler tests).
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(resolved) = parts.extensions.get::<ResolvedLocale>() {
            return Ok(*resolved);
        }
        Ok(ResolvedLocale(state.locales().resolve_path(parts.uri.path())))
    }
}
