//! Server setup: configuration, application state, initialization.

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::AppConfig;
pub use init::{build_app, create_app};
pub use state::AppState;
