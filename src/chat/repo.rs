//! Chat room persistence.
//!
//! Direct-chat uniqueness is enforced here, at the storage boundary: the
//! `chats.direct_key` column holds the normalized user pair and carries a
//! partial unique index, so two racing inserts for the same pair cannot both
//! land. The service layer translates the resulting `Duplicate` into a
//! re-fetch.
//!
//! Membership lives in `chat_members` with a composite primary key, which
//! makes group adds a set union and removes a set difference - both
//! idempotent without any in-process locking.

use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::chat::model::Chat;
use crate::db;
use crate::error::AppError;

/// SQLite-backed chat room repository.
#[derive(Clone)]
pub struct ChatRepository {
    pool: SqlitePool,
    op_timeout: Duration,
    strict_decode: bool,
}

const CHAT_COLUMNS: &str =
    "id, is_group, chat_name, creator_id, latest_message, latest_message_id, created_at";

impl ChatRepository {
    pub fn new(pool: SqlitePool, op_timeout: Duration, strict_decode: bool) -> Self {
        Self {
            pool,
            op_timeout,
            strict_decode,
        }
    }

    /// Look up the direct chat between two users, in either order.
    pub async fn find_direct_chat(&self, a: Uuid, b: Uuid) -> Result<Option<Chat>, AppError> {
        db::with_deadline(self.op_timeout, async {
            let key = crate::chat::model::direct_pair_key(a, b);
            let row = sqlx::query(&format!(
                "SELECT {CHAT_COLUMNS} FROM chats WHERE direct_key = ?1"
            ))
            .bind(&key)
            .fetch_optional(&self.pool)
            .await?;

            match row {
                Some(row) => Ok(Some(self.hydrate(&row).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Insert a direct chat and its two members.
    ///
    /// Does not re-check for an existing pair; the caller is expected to
    /// have looked first. A concurrent insert of the same pair surfaces as
    /// [`AppError::Duplicate`] via the unique index on `direct_key`.
    pub async fn insert_direct_chat(&self, chat: &Chat) -> Result<(), AppError> {
        db::with_deadline(self.op_timeout, self.insert_chat(chat)).await
    }

    /// Insert a group chat and its members.
    ///
    /// Fails if the member set (creator included) has fewer than two users.
    pub async fn insert_group_chat(&self, chat: &Chat) -> Result<(), AppError> {
        if chat.users.len() < 2 {
            return Err(AppError::validation(
                "cannot create a group with fewer than 2 participants",
            ));
        }
        db::with_deadline(self.op_timeout, self.insert_chat(chat)).await
    }

    async fn insert_chat(&self, chat: &Chat) -> Result<(), AppError> {
        let created_at = chat.created_at.to_rfc3339();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO chats (id, is_group, chat_name, creator_id, latest_message,
                               latest_message_id, direct_key, created_at)
            VALUES (?1, ?2, ?3, ?4, '', '', ?5, ?6)
            "#,
        )
        .bind(chat.id.to_string())
        .bind(chat.is_group)
        .bind(&chat.chat_name)
        .bind(chat.creator_id.to_string())
        .bind(chat.direct_key())
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;

        for user in &chat.users {
            sqlx::query(
                "INSERT INTO chat_members (chat_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
            )
            .bind(chat.id.to_string())
            .bind(user.to_string())
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Union `user_ids` into a group chat's member set.
    ///
    /// Matches only group chats; a direct chat id or an unknown id is
    /// `NotFound`. Duplicate members in the input are absorbed by the
    /// composite primary key.
    pub async fn add_users_to_group(
        &self,
        chat_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<Chat, AppError> {
        db::with_deadline(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;
            self.require_group(&mut tx, chat_id).await?;

            let joined_at = Utc::now().to_rfc3339();
            for user in user_ids {
                sqlx::query(
                    r#"
                    INSERT INTO chat_members (chat_id, user_id, joined_at)
                    VALUES (?1, ?2, ?3)
                    ON CONFLICT (chat_id, user_id) DO NOTHING
                    "#,
                )
                .bind(chat_id.to_string())
                .bind(user.to_string())
                .bind(&joined_at)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok(())
        })
        .await?;

        self.updated_group(chat_id).await
    }

    /// Remove a single user from a group chat's member set.
    ///
    /// Removing a user who is not a member is a no-op success.
    pub async fn remove_user_from_group(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
    ) -> Result<Chat, AppError> {
        db::with_deadline(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;
            self.require_group(&mut tx, chat_id).await?;

            sqlx::query("DELETE FROM chat_members WHERE chat_id = ?1 AND user_id = ?2")
                .bind(chat_id.to_string())
                .bind(user_id.to_string())
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(())
        })
        .await?;

        self.updated_group(chat_id).await
    }

    /// All chats, direct and group, that contain the given user.
    ///
    /// An empty result is not an error at this layer.
    pub async fn list_chats_for_user(&self, user_id: Uuid) -> Result<Vec<Chat>, AppError> {
        db::with_deadline(self.op_timeout, async {
            let rows = sqlx::query(&format!(
                r#"
                SELECT {CHAT_COLUMNS} FROM chats
                INNER JOIN chat_members ON chat_members.chat_id = chats.id
                WHERE chat_members.user_id = ?1
                ORDER BY chats.created_at DESC
                "#
            ))
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

            let mut chats = Vec::with_capacity(rows.len());
            for row in &rows {
                match self.hydrate(row).await {
                    Ok(chat) => chats.push(chat),
                    Err(err) if !self.strict_decode => {
                        tracing::warn!("skipping undecodable chat row: {err}");
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok(chats)
        })
        .await
    }

    /// Fetch a single chat with its member set.
    pub async fn fetch_chat(&self, chat_id: Uuid) -> Result<Option<Chat>, AppError> {
        db::with_deadline(self.op_timeout, async {
            let row = sqlx::query(&format!("SELECT {CHAT_COLUMNS} FROM chats WHERE id = ?1"))
                .bind(chat_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

            match row {
                Some(row) => Ok(Some(self.hydrate(&row).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn require_group(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        chat_id: Uuid,
    ) -> Result<(), AppError> {
        let found = sqlx::query("SELECT id FROM chats WHERE id = ?1 AND is_group = 1")
            .bind(chat_id.to_string())
            .fetch_optional(&mut **tx)
            .await?;
        if found.is_none() {
            return Err(AppError::not_found("group chat not found"));
        }
        Ok(())
    }

    async fn updated_group(&self, chat_id: Uuid) -> Result<Chat, AppError> {
        self.fetch_chat(chat_id)
            .await?
            .ok_or_else(|| AppError::not_found("group chat not found"))
    }

    async fn hydrate(&self, row: &SqliteRow) -> Result<Chat, AppError> {
        let parsed = ChatRow::from_row(row)?;
        let users = load_members(&self.pool, &parsed.id).await?;
        parsed.into_chat(users)
    }
}

async fn load_members(pool: &SqlitePool, chat_id: &str) -> Result<Vec<Uuid>, AppError> {
    let rows = sqlx::query("SELECT user_id FROM chat_members WHERE chat_id = ?1")
        .bind(chat_id)
        .fetch_all(pool)
        .await?;

    let mut users = Vec::with_capacity(rows.len());
    for row in &rows {
        let raw: String = row.try_get("user_id")?;
        users.push(db::parse_uuid(&raw)?);
    }
    Ok(users)
}

struct ChatRow {
    id: String,
    is_group: bool,
    chat_name: String,
    creator_id: String,
    latest_message: String,
    latest_message_id: String,
    created_at: String,
}

impl ChatRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            is_group: row.try_get("is_group")?,
            chat_name: row.try_get("chat_name")?,
            creator_id: row.try_get("creator_id")?,
            latest_message: row.try_get("latest_message")?,
            latest_message_id: row.try_get("latest_message_id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_chat(self, mut users: Vec<Uuid>) -> Result<Chat, AppError> {
        users.sort();
        Ok(Chat {
            id: db::parse_uuid(&self.id)?,
            is_group: self.is_group,
            chat_name: self.chat_name,
            creator_id: db::parse_uuid(&self.creator_id)?,
            users,
            latest_message: self.latest_message,
            latest_message_id: self.latest_message_id,
            created_at: db::parse_datetime(&self.created_at)?,
        })
    }
}
