//! Supported locales, locale resolution, and text direction.
//!
//! The locale of a request comes from the first URL segment (`/ar/about`).
//! Anything that is not a supported code resolves to the configured default;
//! resolution never fails.

use std::fmt;

use serde::Serialize;

/// A supported locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Fr,
    Ar,
}

impl Locale {
    /// Every supported locale, in the order pages and exports enumerate them.
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Fr, Locale::Ar];

    /// The URL code for this locale.
    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Ar => "ar",
        }
    }

    /// Parse a URL code. Matching is exact and case-sensitive, like the URL
    /// prefix itself: `/EN/about` is not an English page.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == code)
    }

    /// Native name, used by the language switcher.
    pub const fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Fr => "Français",
            Locale::Ar => "العربية",
        }
    }

    /// Text direction for this locale.
    pub const fn direction(self) -> Direction {
        match self {
            Locale::Ar => Direction::Rtl,
            Locale::En | Locale::Fr => Direction::Ltr,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps request segments to supported locales.
#[derive(Debug, Clone, Copy)]
pub struct LocaleResolver {
    default: Locale,
}

impl LocaleResolver {
    pub fn new(default: Locale) -> Self {
        Self { default }
    }

    /// The locale used when a request names none (or an unsupported one).
    pub fn default_locale(&self) -> Locale {
        self.default
    }

    /// The fixed ordered set of supported locales.
    pub fn list_locales(&self) -> &'static [Locale] {
        &Locale::ALL
    }

    /// Resolve a requested segment, falling back to the default locale.
    pub fn resolve(&self, segment: &str) -> Locale {
        Locale::from_code(segment).unwrap_or(self.default)
    }

    /// Resolve the locale named by the first segment of a request path.
    pub fn resolve_path(&self, path: &str) -> Locale {
        match split_locale_prefix(path) {
            Some((locale, _)) => locale,
            None => self.default,
        }
    }

    /// Text direction for a locale.
    pub fn direction_of(&self, locale: Locale) -> Direction {
        locale.direction()
    }
}

/// Split a supported locale prefix off a path.
///
/// Returns `Some((locale, remaining_path))` when the first segment is a
/// supported code. The code must be the entire first segment, so
/// `/enterprise` does not match `en`. A bare prefix (`/ar`) leaves `/`.
pub fn split_locale_prefix(path: &str) -> Option<(Locale, &str)> {
    let trimmed = path.strip_prefix('/')?;

    let (candidate, rest) = match trimmed.find('/') {
        Some(pos) => (&trimmed[..pos], &trimmed[pos..]),
        None => (trimmed, ""),
    };

    let locale = Locale::from_code(candidate)?;

    if rest.is_empty() {
        Some((locale, "/"))
    } else {
        Some((locale, rest))
    }
}
