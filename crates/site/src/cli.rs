//! Command-line interface.
//!
//! `serve` is the default. The other commands run with a minimal context and
//! never start the HTTP server.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::fs;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::models::{Admin, validate};
use crate::services::dictionary::{DictionaryStore, FileDictionarySource};
use crate::services::locale::LocaleResolver;
use crate::theme::{ColorScheme, Page, PageContext, ThemeEngine};

/// Minimum admin password length.
pub const MIN_PASSWORD_LEN: usize = 10;

#[derive(Debug, Parser)]
#[command(name = "medassist", version, about = "Medassist site server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Load every dictionary and verify structural parity.
    CheckDictionaries,

    /// Render every localized page to a static tree.
    Export {
        /// Output directory; created if missing.
        #[arg(long)]
        out: PathBuf,
    },

    /// Create a dashboard admin account.
    CreateAdmin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        /// Read from the environment so it stays out of shell history.
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

/// Load and parity-check all dictionaries, printing a summary.
pub async fn cmd_check_dictionaries(config: &Config) -> Result<()> {
    let store = load_dictionaries(config).await?;
    let resolver = LocaleResolver::new(config.default_locale);

    println!("{:<8} {:<10} {:<5} {:>6}", "LOCALE", "NAME", "DIR", "KEYS");
    println!("{}", "-".repeat(32));
    for &locale in resolver.list_locales() {
        let dictionary = store.get(locale);
        println!(
            "{:<8} {:<10} {:<5} {:>6}",
            locale.as_str(),
            locale.native_name(),
            resolver.direction_of(locale),
            dictionary.key_paths().len()
        );
    }
    println!("All dictionaries share the same structure.");

    Ok(())
}

/// Pre-render one static tree per supported locale.
///
/// Returns the number of pages written.
pub async fn cmd_export(config: &Config, out: &Path) -> Result<usize> {
    let store = load_dictionaries(config).await?;
    let theme = ThemeEngine::new(&config.templates_dir).context("failed to load templates")?;
    let resolver = LocaleResolver::new(config.default_locale);

    let mut written = 0;
    for &locale in resolver.list_locales() {
        let dictionary = store.get(locale);
        let ctx = PageContext {
            locale,
            dictionary: &dictionary,
            color_scheme: ColorScheme::System,
            authenticated: false,
        };

        for page in Page::ALL {
            let html = page
                .render(&theme, &ctx)
                .with_context(|| format!("failed to render {}", page.path(locale)))?;
            let target = out.join(page.export_path(locale));
            write_file(&target, html.as_bytes()).await?;
            written += 1;
        }
    }

    // The bare root forwards to the default locale, as the server does.
    let home = Page::Home.path(resolver.default_locale());
    let redirect = format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <meta http-equiv=\"refresh\" content=\"0; url={home}\"></head></html>\n"
    );
    write_file(&out.join("index.html"), redirect.as_bytes()).await?;

    info!(pages = written, out = %out.display(), "static export complete");
    println!("Exported {written} pages to {}", out.display());
    Ok(written)
}

/// Create an admin account.
pub async fn cmd_create_admin(config: &Config, email: &str, name: &str, password: &str) -> Result<()> {
    if let Err(message) = validate::email(email) {
        bail!(message);
    }
    if let Err(message) = validate::required("name", name, validate::MAX_SHORT_FIELD) {
        bail!(message);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        bail!("password must be at least {MIN_PASSWORD_LEN} characters");
    }

    let pool = db::create_pool(config).await?;
    db::run_migrations(&pool).await?;

    if Admin::find_by_email(&pool, email).await?.is_some() {
        bail!("an admin with email '{}' already exists", email.trim());
    }

    let admin = Admin::create(&pool, email, name, password).await?;
    info!(admin_id = %admin.id, "admin created");
    println!("Created admin {} <{}>", admin.name, admin.email);
    Ok(())
}

async fn load_dictionaries(config: &Config) -> Result<DictionaryStore> {
    let source = FileDictionarySource::new(&config.dictionaries_dir);
    DictionaryStore::load(&source).await.with_context(|| {
        format!(
            "failed to load dictionaries from {}",
            config.dictionaries_dir.display()
        )
    })
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["medassist"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn export_requires_out() {
        assert!(Cli::try_parse_from(["medassist", "export"]).is_err());
        let cli = Cli::try_parse_from(["medassist", "export", "--out", "dist"]).unwrap();
        match cli.command {
            Some(Command::Export { out }) => assert_eq!(out, PathBuf::from("dist")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn create_admin_takes_password_flag() {
        let cli = Cli::try_parse_from([
            "medassist",
            "create-admin",
            "--email",
            "admin@example.com",
            "--name",
            "Admin",
            "--password",
            "long enough secret",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Command::CreateAdmin { .. })));
    }
}
