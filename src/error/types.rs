use axum::http::StatusCode;
use thiserror::Error;

/// Application-wide error type.
///
/// Carries a human-readable message per variant; the variant alone decides
/// the HTTP status code. Errors are never retried here - retries, if
/// desired, are the caller's responsibility - and none of them is fatal to
/// the process.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// Credentials were presented and rejected.
    #[error("{0}")]
    Unauthorized(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness constraint was violated.
    #[error("{0}")]
    Duplicate(String),

    /// A storage operation exceeded its deadline.
    #[error("storage deadline exceeded")]
    Timeout,

    /// Unclassified storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Duplicate(_) => StatusCode::CONFLICT,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Classify raw sqlx errors at the storage boundary.
///
/// A unique-index violation is how the store reports "this already exists"
/// (the direct-chat pair index, the user email index), so it becomes
/// `Duplicate` rather than an opaque 500. Everything else that is not a
/// missing row is unclassified.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound("record not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Duplicate(db.message().to_string())
            }
            _ => Self::Storage(err.to_string()),
        }
    }
}
