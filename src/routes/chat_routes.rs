//! Chat route configuration.
//!
//! - `POST /create_chat` - create or fetch a direct chat
//! - `PUT /add_to_group` - add users to a group chat
//! - `DELETE /delete_from_group` - remove a user from a group chat
//! - `GET /get_all_chats/{userId}` - list chats containing a user
//! - `GET /get_all_messages/{chatId}` - list messages in a room
//! - `POST /create_group_chat` - create a group chat

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::chat::handlers::{
    add_to_group, create_chat, create_group_chat, delete_from_group, get_all_chats,
    get_all_messages,
};
use crate::server::state::AppState;

pub fn configure_chat_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/create_chat", post(create_chat))
        .route("/add_to_group", put(add_to_group))
        .route("/delete_from_group", delete(delete_from_group))
        .route("/get_all_chats/{user_id}", get(get_all_chats))
        .route("/get_all_messages/{chat_id}", get(get_all_messages))
        .route("/create_group_chat", post(create_group_chat))
}
