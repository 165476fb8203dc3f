//! Localized public pages.
//!
//! The locale segment is resolved by the locale middleware; an unsupported
//! segment renders the default locale rather than a 404. A bare segment that
//! names a protected section is the exception: it has no page here.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;

use super::helpers::{render_error_page, render_not_found_page};
use crate::middleware::ResolvedLocale;
use crate::middleware::access_guard::has_session_credential;
use crate::services::locale::Locale;
use crate::state::AppState;
use crate::theme::{ColorScheme, Page, PageContext};

/// Create the pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/{locale}", get(home))
        .route("/{locale}/about", get(about))
        .route("/{locale}/services", get(services))
        .route("/{locale}/contact", get(contact))
}

/// Send the bare root to the default locale's home page.
async fn root(State(state): State<AppState>) -> Redirect {
    Redirect::to(&Page::Home.path(state.locales().default_locale()))
}

async fn home(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    ResolvedLocale(locale): ResolvedLocale,
    headers: HeaderMap,
) -> Response {
    if Locale::from_code(&segment).is_none()
        && state.access_policy().is_protected(&format!("/{segment}"))
    {
        return render_not_found_page();
    }
    render_page(&state, Page::Home, locale, &headers)
}

async fn about(
    State(state): State<AppState>,
    ResolvedLocale(locale): ResolvedLocale,
    headers: HeaderMap,
) -> Response {
    render_page(&state, Page::About, locale, &headers)
}

async fn services(
    State(state): State<AppState>,
    ResolvedLocale(locale): ResolvedLocale,
    headers: HeaderMap,
) -> Response {
    render_page(&state, Page::Services, locale, &headers)
}

async fn contact(
    State(state): State<AppState>,
    ResolvedLocale(locale): ResolvedLocale,
    headers: HeaderMap,
) -> Response {
    render_page(&state, Page::Contact, locale, &headers)
}

fn render_page(
    state: &AppState,
    page: Page,
    locale: Locale,
    headers: &HeaderMap,
) -> Response {
    let dictionary = state.dictionaries().get(locale);
    let ctx = PageContext {
        locale,
        dictionary: &dictionary,
        color_scheme: ColorScheme::from_headers(headers),
        authenticated: has_session_credential(headers),
    };

    match page.render(state.theme(), &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(
                error = %format!("{e:#}"),
                page = page.slug(),
                locale = %locale,
                "failed to render page"
            );
            render_error_page()
        }
    }
}
