//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::middleware::AccessPolicy;
use crate::services::dictionary::{DictionaryStore, FileDictionarySource};
use crate::services::locale::LocaleResolver;
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    config: Config,

    /// Locale resolution against the configured default.
    locales: LocaleResolver,

    /// Per-locale dictionaries, immutable after startup.
    dictionaries: DictionaryStore,

    /// Theme engine for template rendering.
    theme: Arc<ThemeEngine>,

    /// Path classification for the access guard.
    access_policy: AccessPolicy,
}

impl AppState {
    /// Connect to the database, run migrations, and load content.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;

        Self::with_pool(config, db).await
    }

    /// Build state around an existing pool.
    ///
    /// Dictionaries and templates are loaded here; either failing is fatal.
    pub async fn with_pool(config: &Config, db: PgPool) -> Result<Self> {
        let source = FileDictionarySource::new(&config.dictionaries_dir);
        let dictionaries = DictionaryStore::load(&source).await.with_context(|| {
            format!(
                "failed to load dictionaries from {}",
                config.dictionaries_dir.display()
            )
        })?;
        info!(dir = %config.dictionaries_dir.display(), "dictionaries loaded");

        let theme = ThemeEngine::new(&config.templates_dir).context("failed to load templates")?;

        let access_policy =
            AccessPolicy::new(&config.guard_exclude_pattern, config.guard_prefix_match)
                .context("GUARD_EXCLUDE_PATTERN is not a valid regex")?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                db,
                config: config.clone(),
                locales: LocaleResolver::new(config.default_locale),
                dictionaries,
                theme: Arc::new(theme),
                access_policy,
            }),
        })
    }

    /// Get the database pool.
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the locale resolver.
    pub fn locales(&self) -> &LocaleResolver {
        &self.inner.locales
    }

    /// Get the dictionary store.
    pub fn dictionaries(&self) -> &DictionaryStore {
        &self.inner.dictionaries
    }

    /// Get the theme engine.
    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    pub fn access_policy(&self) -> &AccessPolicy {
        &self.inner.access_policy
    }

    /// Whether cookies set by handlers carry `Secure`.
    pub fn cookie_secure(&self) -> bool {
        self.inner.config.cookie_secure
    }

    /// Check if PostgreSQL is healthy.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
