//! Admin login and logout.
//!
//! Login stores the admin id in the server-side session, which makes the
//! session layer issue the `user-session` cookie. Logout flushes the session
//! and expires the cookie with `Max-Age=0`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::info;

use super::helpers::render_template;
use crate::error::ErrorResponse;
use crate::middleware::access_guard::{LANDING_PATH, LOGIN_PATH};
use crate::models::Admin;
use crate::session;
use crate::state::AppState;

/// Login request, as JSON or form data.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

/// Why a login attempt failed.
#[derive(Debug)]
enum LoginError {
    InvalidCredentials,
    Internal,
}

impl LoginError {
    fn status_code(&self) -> StatusCode {
        match self {
            LoginError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            LoginError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            LoginError::InvalidCredentials => "Invalid email or password",
            LoginError::Internal => "Internal server error",
        }
    }
}

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_form).post(login_form_submit))
        .route("/forgot-password", get(forgot_password))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

/// GET /login
async fn login_form(State(state): State<AppState>) -> Response {
    render_template(&state, "login.html", &tera::Context::new())
}

/// POST /login (form data)
async fn login_form_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginRequest>,
) -> Response {
    match do_login(&state, &session, &form).await {
        Ok(()) => Redirect::to(LANDING_PATH).into_response(),
        Err(e) => {
            let mut context = tera::Context::new();
            context.insert("error", e.message());
            context.insert("email", form.email.trim());
            let mut response = render_template(&state, "login.html", &context);
            if response.status().is_success() {
                *response.status_mut() = e.status_code();
            }
            response
        }
    }
}

/// GET /forgot-password
async fn forgot_password(State(state): State<AppState>) -> Response {
    render_template(&state, "forgot_password.html", &tera::Context::new())
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    match do_login(&state, &session, &request).await {
        Ok(()) => Ok(Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
        })),
        Err(e) => Err((
            e.status_code(),
            Json(ErrorResponse {
                error: e.message().to_string(),
            }),
        )),
    }
}

/// POST /api/auth/logout
///
/// Always succeeds, even without a session, so a stale cookie can be cleared.
async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Some(admin_id) = session::current_admin(&session).await {
        info!(admin_id = %admin_id, "admin logged out");
    }
    session::end_session(&session).await;

    let mut response = Redirect::to(LOGIN_PATH).into_response();
    session::expire_cookie(&mut response, state.cookie_secure());
    response
}

async fn do_login(
    state: &AppState,
    session: &Session,
    request: &LoginRequest,
) -> Result<(), LoginError> {
    let admin = match Admin::find_by_email(state.db(), &request.email).await {
        Ok(Some(admin)) => admin,
        Ok(None) => return Err(LoginError::InvalidCredentials),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "database error during login");
            return Err(LoginError::Internal);
        }
    };

    if !admin.verify_password(&request.password) {
        return Err(LoginError::InvalidCredentials);
    }

    session::start_admin_session(session, admin.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %format!("{e:#}"), "failed to start admin session");
            LoginError::Internal
        })?;

    info!(admin_id = %admin.id, "admin logged in");
    Ok(())
}
