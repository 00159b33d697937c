//! Chat and message domain types plus the request shapes the handlers accept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat room: either a two-user direct conversation or a named group.
///
/// `users` is a set, kept sorted so two chats with the same membership
/// compare equal regardless of insertion order. `latest_message` and
/// `latest_message_id` are a denormalized cache of the most recent message,
/// empty until the first message lands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: Uuid,
    /// Immutable after creation.
    pub is_group: bool,
    /// Required for groups, always empty for direct chats.
    pub chat_name: String,
    pub creator_id: Uuid,
    pub users: Vec<Uuid>,
    pub latest_message: String,
    pub latest_message_id: String,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    /// Build a fresh direct chat between two distinct users.
    pub fn direct(creator: Uuid, other: Uuid) -> Self {
        let mut users = vec![creator, other];
        users.sort();
        Self {
            id: Uuid::new_v4(),
            is_group: false,
            chat_name: String::new(),
            creator_id: creator,
            users,
            latest_message: String::new(),
            latest_message_id: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Build a fresh group chat. The creator is always a member.
    pub fn group(creator: Uuid, members: &[Uuid], chat_name: impl Into<String>) -> Self {
        let mut users: Vec<Uuid> = members.to_vec();
        users.push(creator);
        users.sort();
        users.dedup();
        Self {
            id: Uuid::new_v4(),
            is_group: true,
            chat_name: chat_name.into(),
            creator_id: creator,
            users,
            latest_message: String::new(),
            latest_message_id: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Storage key enforcing direct-chat uniqueness; `None` for groups.
    pub fn direct_key(&self) -> Option<String> {
        if self.is_group {
            return None;
        }
        let (a, b) = (self.users[0], self.users[1]);
        Some(direct_pair_key(a, b))
    }
}

/// Normalized key for an unordered user pair.
///
/// Both orderings of the same pair produce the same key; the unique index
/// on this column is what collapses concurrent direct-chat creation into a
/// single row.
pub fn direct_pair_key(a: Uuid, b: Uuid) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{lo}:{hi}")
}

/// A single chat message. Insert-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    /// Owning chat.
    pub room_id: Uuid,
    /// Sender.
    pub user_id: Uuid,
    pub content: String,
    pub content_type: String,
    /// Logical send time in milliseconds, non-decreasing per room.
    pub timestamp: i64,
}

impl Message {
    pub fn new(room_id: Uuid, user_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            user_id,
            content: content.into(),
            content_type: "text".to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Result of a direct-chat creation request: the chat, plus whether this
/// call created it or found it already present.
#[derive(Debug, Serialize)]
pub struct DirectChatOutcome {
    pub created: bool,
    pub chat: Chat,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    pub user_id: Uuid,
    pub second_user_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToGroupRequest {
    pub chat_id: Uuid,
    pub users: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFromGroupRequest {
    pub chat_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupChatRequest {
    pub user_id: Uuid,
    pub users: Vec<Uuid>,
    pub chat_name: String,
}
