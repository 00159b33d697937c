//! Message persistence.
//!
//! Messages are insert-only. Listing is scoped to one room and ordered by
//! the logical timestamp, so out-of-order arrival still reads back in
//! non-decreasing send order. No ordering is promised across rooms.

use std::time::Duration;

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::chat::model::Message;
use crate::db;
use crate::error::AppError;

/// SQLite-backed message repository.
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
    op_timeout: Duration,
    strict_decode: bool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool, op_timeout: Duration, strict_decode: bool) -> Self {
        Self {
            pool,
            op_timeout,
            strict_decode,
        }
    }

    /// All messages in a room, in non-decreasing timestamp order.
    ///
    /// With the default permissive decode policy, a stored row that fails
    /// to decode is skipped with a warning instead of failing the whole
    /// listing; `strict_decode` turns such rows into an error.
    pub async fn list_messages_for_room(&self, room_id: Uuid) -> Result<Vec<Message>, AppError> {
        db::with_deadline(self.op_timeout, async {
            let rows = sqlx::query(
                r#"
                SELECT id, room_id, user_id, content, content_type, timestamp
                FROM messages
                WHERE room_id = ?1
                ORDER BY timestamp ASC
                "#,
            )
            .bind(room_id.to_string())
            .fetch_all(&self.pool)
            .await?;

            let mut messages = Vec::with_capacity(rows.len());
            for row in &rows {
                match decode_message(row) {
                    Ok(message) => messages.push(message),
                    Err(err) if !self.strict_decode => {
                        tracing::warn!("skipping undecodable message row: {err}");
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok(messages)
        })
        .await
    }

    /// Persist a message and refresh the owning chat's latest-message cache.
    pub async fn create_message(&self, message: &Message) -> Result<(), AppError> {
        db::with_deadline(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;

            sqlx::query(
                r#"
                INSERT INTO messages (id, room_id, user_id, content, content_type, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(message.id.to_string())
            .bind(message.room_id.to_string())
            .bind(message.user_id.to_string())
            .bind(&message.content)
            .bind(&message.content_type)
            .bind(message.timestamp)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE chats SET latest_message = ?1, latest_message_id = ?2 WHERE id = ?3",
            )
            .bind(&message.content)
            .bind(message.id.to_string())
            .bind(message.room_id.to_string())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(())
        })
        .await
    }
}

fn decode_message(row: &SqliteRow) -> Result<Message, AppError> {
    let id: String = row.try_get("id")?;
    let room_id: String = row.try_get("room_id")?;
    let user_id: String = row.try_get("user_id")?;

    Ok(Message {
        id: db::parse_uuid(&id)?,
        room_id: db::parse_uuid(&room_id)?,
        user_id: db::parse_uuid(&user_id)?,
        content: row.try_get("content")?,
        content_type: row.try_get("content_type")?,
        timestamp: row.try_get("timestamp")?,
    })
}
