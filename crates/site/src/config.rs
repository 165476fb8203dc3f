//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::middleware::access_guard::{DEFAULT_EXCLUDE_PATTERN, PrefixMatch};
use crate::services::locale::Locale;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Redis connection URL for the session store. When None, sessions are
    /// kept in process memory.
    pub redis_url: Option<String>,

    /// Whether the session cookie carries the `Secure` attribute.
    ///
    /// Defaults to true when `APP_ENV=production`, false otherwise;
    /// `COOKIE_SECURE` overrides either way.
    pub cookie_secure: bool,

    /// Locale used when the URL carries no supported locale (default: fr).
    pub default_locale: Locale,

    /// Directory holding one dictionary per locale (default: ./dictionaries).
    pub dictionaries_dir: PathBuf,

    /// Directory holding Tera templates (default: ./templates).
    pub templates_dir: PathBuf,

    /// Directory served under /static (default: ./static).
    pub static_dir: PathBuf,

    /// Paths matching this regex bypass the access guard.
    pub guard_exclude_pattern: String,

    /// Protected-prefix matching mode: "segment" (default) or "raw".
    pub guard_prefix_match: PrefixMatch,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests feed a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            lookup("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let redis_url = lookup("REDIS_URL").filter(|v| !v.trim().is_empty());

        let production = lookup("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(v) => parse_bool(&v).context("COOKIE_SECURE must be true or false")?,
            None => production,
        };

        let default_locale = match lookup("DEFAULT_LOCALE") {
            Some(code) => match Locale::from_code(code.trim()) {
                Some(locale) => locale,
                None => bail!("DEFAULT_LOCALE '{code}' is not a supported locale"),
            },
            None => Locale::Fr,
        };

        let dictionaries_dir = lookup("DICTIONARIES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./dictionaries"));

        let templates_dir = lookup("TEMPLATES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./templates"));

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./static"));

        let guard_exclude_pattern =
            lookup("GUARD_EXCLUDE_PATTERN").unwrap_or_else(|| DEFAULT_EXCLUDE_PATTERN.to_string());

        let guard_prefix_match = match lookup("GUARD_PREFIX_MATCH")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            None | Some("segment") => PrefixMatch::Segment,
            Some("raw") => PrefixMatch::Raw,
            Some(other) => bail!("GUARD_PREFIX_MATCH must be 'segment' or 'raw', got '{other}'"),
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|| vec!["*".to_string()]);

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            redis_url,
            cookie_secure,
            default_locale,
            dictionaries_dir,
            templates_dir,
            static_dir,
            guard_exclude_pattern,
            guard_prefix_match,
            cors_allowed_origins,
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("invalid boolean '{other}'"),
    }
}
