//! Admin accounts for the dashboard.

use anyhow::{Context, Result};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Admin record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    /// Create an admin with an Argon2id password hash.
    pub async fn create(pool: &PgPool, email: &str, name: &str, password: &str) -> Result<Self> {
        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .context("password hashing task panicked")??;

        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(email.trim())
        .bind(name.trim())
        .bind(&password_hash)
        .fetch_one(pool)
        .await
        .context("failed to create admin")?;

        Ok(admin)
    }

    /// Find an admin by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, name, password_hash, created_at FROM admins WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email.trim())
        .fetch_optional(pool)
        .await
        .context("failed to fetch admin by email")?;

        Ok(admin)
    }

    /// Find an admin by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, name, password_hash, created_at FROM admins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch admin by id")?;

        Ok(admin)
    }

    /// Verify a password against this admin's hash.
    pub fn verify_password(&self, password: &str) -> bool {
        if self.password_hash.is_empty() {
            return false;
        }

        let Ok(parsed_hash) = PasswordHash::new(&self.password_hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn admin_with_hash(password_hash: String) -> Admin {
        Admin {
            id: Uuid::now_v7(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            password_hash,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));

        let admin = admin_with_hash(hash);
        assert!(admin.verify_password("correct horse"));
        assert!(!admin.verify_password("wrong horse"));
    }

    #[test]
    fn empty_or_garbage_hash_never_verifies() {
        assert!(!admin_with_hash(String::new()).verify_password(""));
        assert!(!admin_with_hash("not-a-phc-string".to_string()).verify_password("x"));
    }

    #[test]
    fn hash_is_not_serialized() {
        let admin = admin_with_hash("$argon2id$secret".to_string());
        let json = serde_json::to_value(&admin).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "admin@example.com");
    }
}
