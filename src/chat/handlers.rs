//! Chat HTTP handlers.
//!
//! Thin translation between the JSON surface and [`ChatService`]; every
//! response goes through the uniform envelope.

use axum::extract::{Path, State};

use crate::chat::model::{
    AddToGroupRequest, CreateChatRequest, CreateGroupChatRequest, DeleteFromGroupRequest,
};
use crate::chat::service::ChatService;
use crate::error::AppError;
use crate::response::{ApiJson, ApiResponse};

/// POST /create_chat
///
/// Create or fetch the direct chat between two users. Answers 201 when this
/// call created the room and 200 when it already existed.
pub async fn create_chat(
    State(service): State<ChatService>,
    ApiJson(request): ApiJson<CreateChatRequest>,
) -> Result<ApiResponse, AppError> {
    let outcome = service
        .create_direct_chat(request.user_id, request.second_user_id)
        .await?;

    let data = serde_json::json!({
        "created": outcome.created,
        "chat": outcome.chat,
    });
    if outcome.created {
        Ok(ApiResponse::created("chat room created", data))
    } else {
        Ok(ApiResponse::ok("chat room already exists", data))
    }
}

/// PUT /add_to_group
pub async fn add_to_group(
    State(service): State<ChatService>,
    ApiJson(request): ApiJson<AddToGroupRequest>,
) -> Result<ApiResponse, AppError> {
    let chat = service
        .add_members_to_group(request.chat_id, &request.users)
        .await?;

    Ok(ApiResponse::ok(
        "users added to group",
        serde_json::json!({ "chat": chat }),
    ))
}

/// DELETE /delete_from_group
pub async fn delete_from_group(
    State(service): State<ChatService>,
    ApiJson(request): ApiJson<DeleteFromGroupRequest>,
) -> Result<ApiResponse, AppError> {
    let chat = service
        .remove_member_from_group(request.chat_id, request.user_id)
        .await?;

    Ok(ApiResponse::ok(
        "user removed from group",
        serde_json::json!({ "chat": chat }),
    ))
}

/// GET /get_all_chats/{userId}
pub async fn get_all_chats(
    State(service): State<ChatService>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse, AppError> {
    let user_id = parse_id(&user_id, "user id")?;
    let chats = service.list_user_chats(user_id).await?;

    let count = chats.len();
    Ok(ApiResponse::ok(
        format!("{count} chats were found"),
        serde_json::json!({ "chats": chats, "count": count }),
    ))
}

/// GET /get_all_messages/{chatId}
pub async fn get_all_messages(
    State(service): State<ChatService>,
    Path(chat_id): Path<String>,
) -> Result<ApiResponse, AppError> {
    let chat_id = parse_id(&chat_id, "chat id")?;
    let messages = service.list_room_messages(chat_id).await?;

    Ok(ApiResponse::ok(
        "messages found",
        serde_json::json!({ "messages": messages }),
    ))
}

/// POST /create_group_chat
pub async fn create_group_chat(
    State(service): State<ChatService>,
    ApiJson(request): ApiJson<CreateGroupChatRequest>,
) -> Result<ApiResponse, AppError> {
    let chat = service
        .create_group_chat(request.user_id, &request.users, &request.chat_name)
        .await?;

    Ok(ApiResponse::created(
        "group chat created",
        serde_json::json!({ "chat": chat }),
    ))
}

/// Parse a path segment into a UUID, rejecting garbage with a 400 envelope
/// rather than the framework's plain-text rejection.
fn parse_id(raw: &str, what: &str) -> Result<uuid::Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("invalid {what}: {raw}")))
}
