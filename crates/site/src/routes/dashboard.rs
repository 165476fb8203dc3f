//! Admin landing page and listings.
//!
//! The guard only sees the cookie. A cookie whose session is gone (expired
//! or flushed store) gets here as "authenticated"; it is expired and sent to
//! the login page, otherwise `/login` and `/dashboard` would bounce forever.

use axum::Router;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use tower_sessions::Session;

use super::helpers::{DEFAULT_PAGE_SIZE, render_error_page, render_template};
use crate::middleware::access_guard::{LANDING_PATH, LOGIN_PATH};
use crate::models::{Admin, Appointment, ContactMessage};
use crate::session;
use crate::state::AppState;

/// Number of entries shown per section on the landing page.
const RECENT_LIMIT: i64 = 5;

/// Create the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LANDING_PATH, get(dashboard))
        .route("/appointments", get(appointments))
        .route("/messages", get(messages))
}

/// Resolve the logged-in admin or build the stale-session response.
async fn admin_or_login(state: &AppState, session: &Session) -> Result<Admin, Response> {
    if let Some(id) = session::current_admin(session).await {
        match Admin::find_by_id(state.db(), id).await {
            Ok(Some(admin)) => return Ok(admin),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "failed to load admin");
                return Err(render_error_page());
            }
        }
    }

    session::end_session(session).await;
    let mut response = Redirect::to(LOGIN_PATH).into_response();
    session::expire_cookie(&mut response, state.cookie_secure());
    Err(response)
}

fn admin_context(admin: &Admin, section: &str) -> tera::Context {
    let mut context = tera::Context::new();
    context.insert("admin", admin);
    context.insert("section", section);
    context
}

/// GET /dashboard
async fn dashboard(State(state): State<AppState>, session: Session) -> Response {
    let admin = match admin_or_login(&state, &session).await {
        Ok(admin) => admin,
        Err(response) => return response,
    };

    let db = state.db();
    let (appointments, messages, pending, unread) = match tokio::try_join!(
        Appointment::list(db, RECENT_LIMIT, 0),
        ContactMessage::list(db, false, RECENT_LIMIT, 0),
        Appointment::count_pending(db),
        ContactMessage::count_unread(db),
    ) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "failed to load dashboard");
            return render_error_page();
        }
    };

    let mut context = admin_context(&admin, "dashboard");
    context.insert("appointments", &appointments);
    context.insert("messages", &messages);
    context.insert("pending_count", &pending);
    context.insert("unread_count", &unread);
    render_template(&state, "admin/dashboard.html", &context)
}

/// GET /appointments
async fn appointments(State(state): State<AppState>, session: Session) -> Response {
    let admin = match admin_or_login(&state, &session).await {
        Ok(admin) => admin,
        Err(response) => return response,
    };

    match Appointment::list(state.db(), DEFAULT_PAGE_SIZE, 0).await {
        Ok(appointments) => {
            let mut context = admin_context(&admin, "appointments");
            context.insert("appointments", &appointments);
            render_template(&state, "admin/appointments.html", &context)
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "failed to list appointments");
            render_error_page()
        }
    }
}

/// GET /messages
async fn messages(State(state): State<AppState>, session: Session) -> Response {
    let admin = match admin_or_login(&state, &session).await {
        Ok(admin) => admin,
        Err(response) => return response,
    };

    match ContactMessage::list(state.db(), false, DEFAULT_PAGE_SIZE, 0).await {
        Ok(messages) => {
            let mut context = admin_context(&admin, "messages");
            context.insert("messages", &messages);
            render_template(&state, "admin/messages.html", &context)
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "failed to list messages");
            render_error_page()
        }
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn admin_context_omits_password_hash() {
        let admin = Admin {
            id: Uuid::now_v7(),
            email: "admin@example.com".to_string(),
            name: "Nadia".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };
        let json = admin_context(&admin, "dashboard").into_json();
        assert_eq!(json["admin"]["name"], "Nadia");
        assert!(json["admin"].get("password_hash").is_none());
        assert_eq!(json["section"], "dashboard");
    }
}
