//! Server configuration.
//!
//! Loaded once from environment variables into a plain struct that is
//! passed into constructors; nothing else in the crate reads the
//! environment.

use std::time::Duration;

/// Runtime configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// SQLite connection string.
    pub database_url: String,
    /// HTTP listen port.
    pub port: u16,
    /// HS256 signing secret for session tokens.
    pub jwt_secret: String,
    /// Deadline applied to every storage operation.
    pub op_timeout: Duration,
    /// Fail a listing when a stored row does not decode, instead of
    /// skipping it with a warning.
    pub strict_row_decode: bool,
    /// Treat a user with zero chats as `NotFound` instead of an empty
    /// list. Off by default; kept for compatibility with the service this
    /// one replaces.
    pub empty_chats_as_error: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://huddle.db?mode=rwc".to_string(),
            port: 3000,
            jwt_secret: "change-me-in-production".to_string(),
            op_timeout: Duration::from_secs(10),
            strict_row_decode: false,
            empty_chats_as_error: false,
        }
    }
}

impl AppConfig {
    /// Build configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using development fallback");
                defaults.jwt_secret
            }
        };

        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            port: env_parsed("SERVER_PORT").unwrap_or(defaults.port),
            jwt_secret,
            op_timeout: env_parsed("DB_OP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.op_timeout),
            strict_row_decode: env_flag("STRICT_ROW_DECODE"),
            empty_chats_as_error: env_flag("EMPTY_CHATS_AS_ERROR"),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.op_timeout, Duration::from_secs(10));
        assert!(!config.strict_row_decode);
        assert!(!config.empty_chats_as_error);
    }
}
