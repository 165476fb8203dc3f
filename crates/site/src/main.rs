//! Medassist site server.
//!
//! Localized marketing pages, the session access guard, and the admin API.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tower_sessions::MemoryStore;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use medassist_site::cli::{self, Cli, Command};
use medassist_site::config::Config;
use medassist_site::routes;
use medassist_site::session;
use medassist_site::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::CheckDictionaries => cli::cmd_check_dictionaries(&config).await,
        Command::Export { out } => cli::cmd_export(&config, &out).await.map(|_| ()),
        Command::CreateAdmin {
            email,
            name,
            password,
        } => cli::cmd_create_admin(&config, &email, &name, &password).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    info!(
        port = config.port,
        default_locale = %config.default_locale,
        "Starting Medassist site server"
    );

    // Database, migrations, dictionaries and templates; any failure is fatal.
    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    let app = match &config.redis_url {
        Some(url) => {
            let store = session::redis_store(url)
                .await
                .context("failed to create session store")?;
            info!("Sessions stored in Redis");
            routes::build_router(state, session::session_layer(store, config.cookie_secure))
        }
        None => {
            info!("REDIS_URL not set; sessions kept in memory");
            routes::build_router(
                state,
                session::session_layer(MemoryStore::default(), config.cookie_secure),
            )
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
