//! Appointment API.
//!
//! Booking is public; listing, status changes and deletion need an admin
//! session.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use super::helpers::{page_window, require_admin};
use crate::error::{AppError, AppResult};
use crate::models::{Appointment, AppointmentStatus, CreateAppointment};
use crate::state::AppState;

/// Create the appointments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/appointments", post(create).get(list))
        .route(
            "/api/appointments/{id}",
            get(show).patch(update_status).delete(remove),
        )
}

/// Query parameters for listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Body of a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatus {
    pub status: String,
}

/// POST /api/appointments
async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateAppointment>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    input.validate().map_err(AppError::BadRequest)?;

    let locale = state
        .locales()
        .resolve(input.locale.as_deref().unwrap_or_default());
    let appointment = Appointment::create(state.db(), &input, locale).await?;

    tracing::info!(
        appointment_id = %appointment.id,
        locale = %locale,
        service = %appointment.service,
        "appointment requested"
    );
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /api/appointments
async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    require_admin(&session).await?;
    let (limit, offset) = page_window(query.limit, query.offset);
    Ok(Json(Appointment::list(state.db(), limit, offset).await?))
}

/// GET /api/appointments/{id}
async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    require_admin(&session).await?;
    Appointment::find_by_id(state.db(), id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// PATCH /api/appointments/{id}
async fn update_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateStatus>, JsonRejection>,
) -> AppResult<Json<Appointment>> {
    let admin_id = require_admin(&session).await?;
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let status: AppointmentStatus = body.status.parse().map_err(AppError::BadRequest)?;

    let appointment = Appointment::update_status(state.db(), id, status)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(appointment_id = %id, admin_id = %admin_id, status = %status, "appointment status changed");
    Ok(Json(appointment))
}

/// DELETE /api/appointments/{id}
async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let admin_id = require_admin(&session).await?;
    if !Appointment::delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(appointment_id = %id, admin_id = %admin_id, "appointment deleted");
    Ok(StatusCode::NO_CONTENT)
}
