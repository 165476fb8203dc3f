//! Messages sent through the contact form.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::validate;
use crate::services::locale::Locale;

/// Contact message record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub locale: String,
    pub created_at: DateTime<Utc>,
}

/// Input for sending a contact message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub locale: Option<String>,
}

impl CreateContactMessage {
    pub fn validate(&self) -> Result<(), String> {
        validate::required("name", &self.name, validate::MAX_SHORT_FIELD)?;
        validate::email(&self.email)?;
        if let Some(phone) = &self.phone {
            validate::optional("phone", phone, validate::MAX_SHORT_FIELD)?;
        }
        validate::optional("subject", &self.subject, validate::MAX_SHORT_FIELD)?;
        validate::required("message", &self.message, validate::MAX_MESSAGE)?;
        Ok(())
    }
}

const COLUMNS: &str = "id, name, email, phone, subject, message, is_read, locale, created_at";

impl ContactMessage {
    /// Store a new unread message.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactMessage,
        locale: Locale,
    ) -> Result<Self> {
        let id = Uuid::now_v7();
        let phone = input
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let message = sqlx::query_as::<_, ContactMessage>(&format!(
            r#"
            INSERT INTO contact_messages (id, name, email, phone, subject, message, locale)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(input.name.trim())
        .bind(input.email.trim())
        .bind(phone)
        .bind(input.subject.trim())
        .bind(input.message.trim())
        .bind(locale.as_str())
        .fetch_one(pool)
        .await
        .context("failed to create contact message")?;

        Ok(message)
    }

    /// List messages, newest first. `unread_only` hides messages already read.
    pub async fn list(pool: &PgPool, unread_only: bool, limit: i64, offset: i64) -> Result<Vec<Self>> {
        let messages = sqlx::query_as::<_, ContactMessage>(&format!(
            r#"
            SELECT {COLUMNS} FROM contact_messages
            WHERE ($1 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("failed to list contact messages")?;

        Ok(messages)
    }

    /// Mark a message read or unread. Returns None if it does not exist.
    pub async fn set_read(pool: &PgPool, id: Uuid, is_read: bool) -> Result<Option<Self>> {
        let message = sqlx::query_as::<_, ContactMessage>(&format!(
            "UPDATE contact_messages SET is_read = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(is_read)
        .fetch_optional(pool)
        .await
        .context("failed to update contact message")?;

        Ok(message)
    }

    /// Delete a message. Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete contact message")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_unread(pool: &PgPool) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages WHERE is_read = FALSE")
                .fetch_one(pool)
                .await
                .context("failed to count unread contact messages")?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> CreateContactMessage {
        CreateContactMessage {
            name: "Claire Martin".to_string(),
            email: "claire@example.fr".to_string(),
            phone: None,
            subject: "Tarifs".to_string(),
            message: "Bonjour, quels sont vos tarifs ?".to_string(),
            locale: Some("fr".to_string()),
        }
    }

    #[test]
    fn valid_message_passes() {
        assert!(message().validate().is_ok());
    }

    #[test]
    fn empty_body_is_rejected() {
        let mut input = message();
        input.message = "\n".to_string();
        assert_eq!(input.validate(), Err("message is required".to_string()));
    }

    #[test]
    fn overlong_phone_is_rejected() {
        let mut input = message();
        input.phone = Some("9".repeat(validate::MAX_SHORT_FIELD + 1));
        assert!(input.validate().is_err());
    }
}
