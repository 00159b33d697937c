//! User records and identity-store operations.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;

/// A user as stored. The password hash never leaves this type; responses
/// use [`UserResponse`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User shape safe to return to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// SQLite-backed identity store.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
    op_timeout: Duration,
}

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

impl UserStore {
    pub fn new(pool: SqlitePool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    /// Insert a new user. A taken email surfaces as `Duplicate` via the
    /// unique index.
    pub async fn insert_user(&self, user: &UserRecord) -> Result<(), AppError> {
        db::with_deadline(self.op_timeout, async {
            sqlx::query(
                r#"
                INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at.to_rfc3339())
            .bind(user.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AppError> {
        db::with_deadline(self.op_timeout, async {
            let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref().map(decode_user).transpose()
        })
        .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        db::with_deadline(self.op_timeout, async {
            let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref().map(decode_user).transpose()
        })
        .await
    }

    /// Update name, email, and optionally the password hash. Returns the
    /// updated record, or `None` when no such user exists.
    pub async fn update_user(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<Option<UserRecord>, AppError> {
        let updated = db::with_deadline(self.op_timeout, async {
            let now = Utc::now().to_rfc3339();
            let result = match password_hash {
                Some(hash) => {
                    sqlx::query(
                        r#"
                        UPDATE users
                        SET name = ?1, email = ?2, password_hash = ?3, updated_at = ?4
                        WHERE id = ?5
                        "#,
                    )
                    .bind(name)
                    .bind(email)
                    .bind(hash)
                    .bind(&now)
                    .bind(id.to_string())
                    .execute(&self.pool)
                    .await?
                }
                None => {
                    sqlx::query(
                        "UPDATE users SET name = ?1, email = ?2, updated_at = ?3 WHERE id = ?4",
                    )
                    .bind(name)
                    .bind(email)
                    .bind(&now)
                    .bind(id.to_string())
                    .execute(&self.pool)
                    .await?
                }
            };
            Ok(result.rows_affected() > 0)
        })
        .await?;

        if !updated {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Delete a user; reports whether a row was actually removed.
    pub async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        db::with_deadline(self.op_timeout, async {
            let result = sqlx::query("DELETE FROM users WHERE id = ?1")
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        db::with_deadline(self.op_timeout, async {
            let rows = sqlx::query(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
            ))
            .fetch_all(&self.pool)
            .await?;
            rows.iter().map(decode_user).collect()
        })
        .await
    }
}

fn decode_user(row: &SqliteRow) -> Result<UserRecord, AppError> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(UserRecord {
        id: db::parse_uuid(&id)?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: db::parse_datetime(&created_at)?,
        updated_at: db::parse_datetime(&updated_at)?,
    })
}
