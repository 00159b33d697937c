//! Shared test fixtures.

pub mod database;

use std::time::Duration;

use huddle::chat::{ChatRepository, ChatService, MessageRepository};
use huddle::server::AppConfig;

use self::database::TestDatabase;

pub const OP_TIMEOUT: Duration = Duration::from_secs(10);

/// Config pointed at a test database.
pub fn test_config(db: &TestDatabase) -> AppConfig {
    AppConfig {
        database_url: db.url.clone(),
        jwt_secret: "test-secret".to_string(),
        ..AppConfig::default()
    }
}

/// Chat service wired to a test database with default behavior flags.
pub fn chat_service(db: &TestDatabase) -> ChatService {
    chat_service_with_flags(db, false, false)
}

/// Chat service with explicit decode/empty-list behavior.
pub fn chat_service_with_flags(
    db: &TestDatabase,
    strict_row_decode: bool,
    empty_chats_as_error: bool,
) -> ChatService {
    let chats = ChatRepository::new(db.pool().clone(), OP_TIMEOUT, strict_row_decode);
    let messages = MessageRepository::new(db.pool().clone(), OP_TIMEOUT, strict_row_decode);
    ChatService::new(chats, messages, empty_chats_as_error)
}
