//! Server initialization.
//!
//! Wires the pool into the repositories, the repositories into the service,
//! and everything into the router. Repositories are constructed here and
//! injected; there are no process-wide storage handles.

use axum::Router;

use crate::auth::users::UserStore;
use crate::chat::messages::MessageRepository;
use crate::chat::repo::ChatRepository;
use crate::chat::service::ChatService;
use crate::db;
use crate::error::AppError;
use crate::routes::router::create_router;
use crate::server::config::AppConfig;
use crate::server::state::AppState;

/// Connect to the database, run migrations, and build the application.
pub async fn create_app(config: AppConfig) -> Result<Router, AppError> {
    let pool = db::connect(&config.database_url).await?;
    Ok(build_app(config, pool))
}

/// Assemble the application around an existing pool.
///
/// Split out from [`create_app`] so tests can point the app at their own
/// database.
pub fn build_app(config: AppConfig, pool: sqlx::SqlitePool) -> Router {
    let chats = ChatRepository::new(pool.clone(), config.op_timeout, config.strict_row_decode);
    let messages = MessageRepository::new(pool.clone(), config.op_timeout, config.strict_row_decode);
    let service = ChatService::new(chats, messages, config.empty_chats_as_error);
    let users = UserStore::new(pool, config.op_timeout);

    let state = AppState {
        config,
        chats: service,
        users,
    };

    create_router(state)
}
