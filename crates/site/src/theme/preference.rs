//! Light/dark color scheme preference.
//!
//! The preference is per-browser state carried in the `theme` cookie. It is
//! read on every page request and rendered into `<html data-theme="...">`,
//! so the first paint already uses the right palette. With no cookie the
//! page follows the operating system (`prefers-color-scheme`) through CSS.

use axum::http::{HeaderMap, header};
use serde::Serialize;
use tower_sessions::cookie::Cookie;

/// Name of the preference cookie, written by the client-side toggle.
pub const THEME_COOKIE_NAME: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
    /// No explicit choice; follow the operating system.
    #[default]
    System,
}

impl ColorScheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
            ColorScheme::System => "system",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "light" => ColorScheme::Light,
            "dark" => ColorScheme::Dark,
            _ => ColorScheme::System,
        }
    }

    /// Read the preference from the request cookies.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == THEME_COOKIE_NAME)
            .map(|cookie| Self::parse(cookie.value()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn reads_cookie() {
        assert_eq!(ColorScheme::from_headers(&headers("theme=dark")), ColorScheme::Dark);
        assert_eq!(
            ColorScheme::from_headers(&headers("user-session=abc; theme=light")),
            ColorScheme::Light
        );
    }

    #[test]
    fn missing_or_unknown_follows_system() {
        assert_eq!(ColorScheme::from_headers(&HeaderMap::new()), ColorScheme::System);
        assert_eq!(ColorScheme::from_headers(&headers("theme=neon")), ColorScheme::System);
    }
}
