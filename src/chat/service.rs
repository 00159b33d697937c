//! Chat orchestration.
//!
//! Stateless request/response transformations over the two repositories.
//! The one piece of real consistency logic lives in
//! [`ChatService::create_direct_chat`]: the lookup-then-insert sequence is
//! not atomic, so a concurrent creation for the same pair can slip between
//! the two steps. The storage-level unique index turns the loser's insert
//! into a `Duplicate`, which is translated here into "already exists" plus
//! a re-fetch instead of an error.

use uuid::Uuid;

use crate::chat::messages::MessageRepository;
use crate::chat::model::{Chat, DirectChatOutcome, Message};
use crate::chat::repo::ChatRepository;
use crate::error::AppError;

/// Orchestrates chat creation, membership changes, and message listing.
///
/// Repositories are injected at construction; the service holds no other
/// state.
#[derive(Clone)]
pub struct ChatService {
    chats: ChatRepository,
    messages: MessageRepository,
    /// When set, a user with zero chats gets `NotFound` instead of an empty
    /// list, matching the service this one replaces.
    empty_chats_as_error: bool,
}

impl ChatService {
    pub fn new(
        chats: ChatRepository,
        messages: MessageRepository,
        empty_chats_as_error: bool,
    ) -> Self {
        Self {
            chats,
            messages,
            empty_chats_as_error,
        }
    }

    /// Create the direct chat between two users, or return the existing one.
    ///
    /// Idempotent: `created` is true only for the call that actually
    /// inserted the row, including under concurrent creation for the same
    /// pair.
    pub async fn create_direct_chat(
        &self,
        user_id: Uuid,
        second_user_id: Uuid,
    ) -> Result<DirectChatOutcome, AppError> {
        if user_id == second_user_id {
            return Err(AppError::validation(
                "a direct chat requires two distinct users",
            ));
        }

        if let Some(chat) = self.chats.find_direct_chat(user_id, second_user_id).await? {
            return Ok(DirectChatOutcome {
                created: false,
                chat,
            });
        }

        let chat = Chat::direct(user_id, second_user_id);
        match self.chats.insert_direct_chat(&chat).await {
            Ok(()) => {
                tracing::info!(chat_id = %chat.id, "direct chat created");
                Ok(DirectChatOutcome {
                    created: true,
                    chat,
                })
            }
            // Lost the race: someone else inserted this pair between our
            // lookup and our insert. Their chat wins.
            Err(AppError::Duplicate(_)) => {
                let chat = self
                    .chats
                    .find_direct_chat(user_id, second_user_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::storage("direct chat missing after duplicate insert")
                    })?;
                Ok(DirectChatOutcome {
                    created: false,
                    chat,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Create a group chat from a creator, a member list, and a name.
    ///
    /// The creator is always appended, so the member list must contribute
    /// at least one other user.
    pub async fn create_group_chat(
        &self,
        creator_id: Uuid,
        member_ids: &[Uuid],
        chat_name: &str,
    ) -> Result<Chat, AppError> {
        let has_other_member = member_ids.iter().any(|id| *id != creator_id);
        if !has_other_member {
            return Err(AppError::validation(
                "cannot create a group with fewer than 2 participants",
            ));
        }
        if chat_name.trim().is_empty() {
            return Err(AppError::validation("a group chat requires a name"));
        }

        let chat = Chat::group(creator_id, member_ids, chat_name);
        self.chats.insert_group_chat(&chat).await?;
        tracing::info!(chat_id = %chat.id, members = chat.users.len(), "group chat created");
        Ok(chat)
    }

    /// Add users to a group chat's member set.
    pub async fn add_members_to_group(
        &self,
        chat_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<Chat, AppError> {
        self.chats.add_users_to_group(chat_id, user_ids).await
    }

    /// Remove one user from a group chat's member set.
    pub async fn remove_member_from_group(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
    ) -> Result<Chat, AppError> {
        self.chats.remove_user_from_group(chat_id, user_id).await
    }

    /// All chats the user belongs to.
    pub async fn list_user_chats(&self, user_id: Uuid) -> Result<Vec<Chat>, AppError> {
        let chats = self.chats.list_chats_for_user(user_id).await?;
        if chats.is_empty() && self.empty_chats_as_error {
            return Err(AppError::not_found("no chats were found for this user"));
        }
        Ok(chats)
    }

    /// All messages in a room, oldest first.
    pub async fn list_room_messages(&self, chat_id: Uuid) -> Result<Vec<Message>, AppError> {
        self.messages.list_messages_for_room(chat_id).await
    }

    /// Persist a message into a room.
    ///
    /// The HTTP surface does not expose sending; this exists for the
    /// ingestion path and keeps the chat's latest-message cache current.
    pub async fn store_message(&self, message: &Message) -> Result<(), AppError> {
        self.messages.create_message(message).await
    }
}
