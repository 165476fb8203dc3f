//! Session cookie and session store management.
//!
//! The session id travels in the `user-session` cookie. The access guard only
//! checks that cookie for presence; the admin id lives server-side in the
//! session store (Redis when configured, process memory otherwise).

use anyhow::{Context, Result};
use axum::http::{HeaderValue, header};
use axum::response::Response;
use fred::prelude::*;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Cookie, SameSite};
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};
use tower_sessions_redis_store::RedisStore;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "user-session";

/// Session key for the authenticated admin's id.
pub const SESSION_ADMIN_ID: &str = "admin_id";

/// Session expiry after inactivity (24 hours).
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 24;

/// Wrap a session store in the cookie policy used by the site.
///
/// `HttpOnly` and `SameSite=Strict` always; `Secure` in production.
pub fn session_layer<Store: SessionStore>(store: Store, secure: bool) -> SessionManagerLayer<Store> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(secure)
        .with_http_only(true)
        .with_same_site(SameSite::Strict)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            DEFAULT_SESSION_EXPIRY_HOURS,
        )))
}

/// Connect the Redis-backed session store.
pub async fn redis_store(redis_url: &str) -> Result<RedisStore<Pool>> {
    let config = Config::from_url(redis_url).context("failed to parse Redis URL")?;

    let pool = Builder::from_config(config)
        .build_pool(1)
        .context("failed to create Redis pool")?;

    pool.init()
        .await
        .context("failed to connect to Redis for sessions")?;

    Ok(RedisStore::new(pool))
}

/// A cookie that immediately expires the session cookie in the browser.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(Duration::ZERO)
        .build()
}

/// Append the removal cookie to a response.
pub fn expire_cookie(response: &mut Response, secure: bool) {
    if let Ok(value) = HeaderValue::from_str(&removal_cookie(secure).to_string()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

/// The admin logged in on this session, if any.
pub async fn current_admin(session: &Session) -> Option<Uuid> {
    session.get(SESSION_ADMIN_ID).await.ok().flatten()
}

/// Record a successful login, rotating the session id first.
pub async fn start_admin_session(session: &Session, admin_id: Uuid) -> Result<()> {
    session
        .cycle_id()
        .await
        .context("failed to rotate session id")?;
    session
        .insert(SESSION_ADMIN_ID, admin_id)
        .await
        .context("failed to store admin id in session")?;
    Ok(())
}

/// Drop all server-side session state.
pub async fn end_session(session: &Session) {
    if let Err(e) = session.flush().await {
        tracing::warn!(error = %e, "failed to flush session");
    }
}
