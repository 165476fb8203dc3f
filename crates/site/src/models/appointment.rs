//! Appointment requests submitted from the public site.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::validate;
use crate::services::locale::Locale;

/// Appointment record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Appointment {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Requested service, as labelled on the services page.
    pub service: String,
    pub preferred_date: Option<NaiveDate>,
    pub message: String,
    /// One of [`AppointmentStatus`], stored as text.
    pub status: String,
    /// Locale the request was submitted in.
    pub locale: String,
    pub created_at: DateTime<Utc>,
}

/// Appointment workflow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "completed" => Ok(AppointmentStatus::Completed),
            other => Err(format!("unknown appointment status '{other}'")),
        }
    }
}

/// Input for booking an appointment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointment {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default)]
    pub message: String,
    /// Locale code of the page the form was on; unsupported codes fall back.
    #[serde(default)]
    pub locale: Option<String>,
}

impl CreateAppointment {
    /// Check field presence and lengths.
    pub fn validate(&self) -> Result<(), String> {
        validate::required("full_name", &self.full_name, validate::MAX_SHORT_FIELD)?;
        validate::email(&self.email)?;
        validate::required("phone", &self.phone, validate::MAX_SHORT_FIELD)?;
        validate::required("service", &self.service, validate::MAX_SHORT_FIELD)?;
        validate::optional("message", &self.message, validate::MAX_MESSAGE)?;
        Ok(())
    }
}

const COLUMNS: &str =
    "id, full_name, email, phone, service, preferred_date, message, status, locale, created_at";

impl Appointment {
    /// Insert a new pending appointment.
    pub async fn create(pool: &PgPool, input: &CreateAppointment, locale: Locale) -> Result<Self> {
        let id = Uuid::now_v7();

        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            INSERT INTO appointments
                (id, full_name, email, phone, service, preferred_date, message, status, locale)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(input.full_name.trim())
        .bind(input.email.trim())
        .bind(input.phone.trim())
        .bind(input.service.trim())
        .bind(input.preferred_date)
        .bind(input.message.trim())
        .bind(AppointmentStatus::Pending.as_str())
        .bind(locale.as_str())
        .fetch_one(pool)
        .await
        .context("failed to create appointment")?;

        Ok(appointment)
    }

    /// List appointments, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {COLUMNS} FROM appointments ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("failed to list appointments")?;

        Ok(appointments)
    }

    /// Find an appointment by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch appointment by id")?;

        Ok(appointment)
    }

    /// Change an appointment's status. Returns None if it does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Self>> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "UPDATE appointments SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await
        .context("failed to update appointment status")?;

        Ok(appointment)
    }

    /// Delete an appointment. Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete appointment")?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of appointments still awaiting confirmation.
    pub async fn count_pending(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE status = $1")
            .bind(AppointmentStatus::Pending.as_str())
            .fetch_one(pool)
            .await
            .context("failed to count pending appointments")?;

        Ok(count)
    }
}
