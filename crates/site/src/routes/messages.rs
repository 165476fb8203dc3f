//! Contact message API.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use super::helpers::{page_window, require_admin};
use crate::error::{AppError, AppResult};
use crate::models::{ContactMessage, CreateContactMessage};
use crate::state::AppState;

/// Create the messages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/messages", post(create).get(list))
        .route("/api/messages/{id}", patch(mark).delete(remove))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only messages not yet read.
    #[serde(default)]
    pub unread: bool,
}

#[derive(Debug, Deserialize)]
pub struct MarkRead {
    pub is_read: bool,
}

/// POST /api/messages
async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateContactMessage>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ContactMessage>)> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    input.validate().map_err(AppError::BadRequest)?;

    let locale = state
        .locales()
        .resolve(input.locale.as_deref().unwrap_or_default());
    let message = ContactMessage::create(state.db(), &input, locale).await?;

    tracing::info!(message_id = %message.id, locale = %locale, "contact message received");
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/messages
async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ContactMessage>>> {
    require_admin(&session).await?;
    let (limit, offset) = page_window(query.limit, query.offset);
    Ok(Json(
        ContactMessage::list(state.db(), query.unread, limit, offset).await?,
    ))
}

/// PATCH /api/messages/{id}
async fn mark(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    payload: Result<Json<MarkRead>, JsonRejection>,
) -> AppResult<Json<ContactMessage>> {
    require_admin(&session).await?;
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    ContactMessage::set_read(state.db(), id, body.is_read)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// DELETE /api/messages/{id}
async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let admin_id = require_admin(&session).await?;
    if !ContactMessage::delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(message_id = %id, admin_id = %admin_id, "contact message deleted");
    Ok(StatusCode::NO_CONTENT)
}
