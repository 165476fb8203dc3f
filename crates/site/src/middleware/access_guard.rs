//! Session-gated access guard.
//!
//! Runs before routing on every request that is not excluded (API routes,
//! static assets, image assets, favicon). Only the *presence* of the
//! `user-session` cookie counts as authenticated here; handlers that need
//! the admin identity consult the server-side session themselves.
//!
//! Decision order, first match wins:
//! 1. protected path without a session credential → redirect to `/login`
//! 2. session credential on `/login` or `/` → redirect to `/dashboard`
//! 3. allow

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use regex::Regex;
use tower_sessions::cookie::Cookie;

use crate::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// Paths matching this pattern never reach the guard.
pub const DEFAULT_EXCLUDE_PATTERN: &str = r"^/(api|static|images|favicon\.ico)";

/// Path prefixes that require a session credential.
pub const PROTECTED_PREFIXES: &[&str] = &[
    "/dashboard",
    "/services",
    "/equipment",
    "/partners",
    "/pricing",
    "/blog",
    "/testimonials",
    "/team",
    "/messages",
    "/appointments",
    "/admins",
];

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/dashboard";
pub const ROOT_PATH: &str = "/";

/// How protected prefixes are compared with request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixMatch {
    /// `path == prefix` or `path` starts with `prefix + "/"`.
    Segment,
    /// Plain string prefix: `/servicesXYZ` counts as `/services`.
    ///
    /// Matches the behavior of the site this server replaced.
    Raw,
}

impl PrefixMatch {
    pub fn matches(self, path: &str, prefix: &str) -> bool {
        match self {
            PrefixMatch::Raw => path.starts_with(prefix),
            PrefixMatch::Segment => match path.strip_prefix(prefix) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

/// Outcome of evaluating a request against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectTo(&'static str),
}

/// Path classification plus the exclusion filter.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    exclude: Regex,
    prefix_match: PrefixMatch,
}

impl AccessPolicy {
    pub fn new(exclude_pattern: &str, prefix_match: PrefixMatch) -> Result<Self, regex::Error> {
        Ok(Self {
            exclude: Regex::new(exclude_pattern)?,
            prefix_match,
        })
    }

    /// True when the guard is bypassed entirely for this path.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.is_match(path)
    }

    pub fn is_protected(&self, path: &str) -> bool {
        PROTECTED_PREFIXES
            .iter()
            .any(|prefix| self.prefix_match.matches(path, prefix))
    }

    /// Decide what to do with a request that passed the exclusion filter.
    pub fn evaluate(&self, path: &str, authenticated: bool) -> GuardDecision {
        if self.is_protected(path) && !authenticated {
            return GuardDecision::RedirectTo(LOGIN_PATH);
        }

        if authenticated && (path == LOGIN_PATH || path == ROOT_PATH) {
            return GuardDecision::RedirectTo(LANDING_PATH);
        }

        GuardDecision::Allow
    }
}

/// True when the request carries a non-empty session cookie.
pub fn has_session_credential(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .any(|cookie| cookie.name() == SESSION_COOKIE_NAME && !cookie.value().is_empty())
}

/// Middleware applying the access policy.
pub async fn guard_access(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let policy = state.access_policy();
    let path = request.uri().path();

    if policy.is_excluded(path) {
        return next.run(request).await;
    }

    let authenticated = has_session_credential(request.headers());

    match policy.evaluate(path, authenticated) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectTo(target) => {
            tracing::debug!(path = %path, authenticated, location = target, "access guard redirect");
            Redirect::to(target).into_response()
        }
    }
}
