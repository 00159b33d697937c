//! Application state and `FromRef` extraction.
//!
//! `AppState` is the single state container handed to the router. The
//! `FromRef` impls let handlers pull just the piece they need -
//! `State<ChatService>`, `State<UserStore>`, or `State<AppConfig>` -
//! without seeing the rest.

use axum::extract::FromRef;

use crate::auth::users::UserStore;
use crate::chat::service::ChatService;
use crate::server::config::AppConfig;

/// Central state container for the Axum application.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub chats: ChatService,
    pub users: UserStore,
}

impl FromRef<AppState> for ChatService {
    fn from_ref(state: &AppState) -> Self {
        state.chats.clone()
    }
}

impl FromRef<AppState> for UserStore {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
