//! Uniform response envelope.
//!
//! Every endpoint, success or failure, answers with the same JSON shape:
//!
//! ```json
//! {
//!   "status": 200,
//!   "message": "chat room created",
//!   "data": { ... }
//! }
//! ```
//!
//! The `status` field mirrors the HTTP status code so callers that lose the
//! transport status (proxies, logging pipelines) can still classify the
//! response. Error responses go through the same shape via the
//! `IntoResponse` impl in [`crate::error`].

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::AppError;

/// Success envelope returned by handlers.
#[derive(Debug)]
pub struct ApiResponse {
    status: StatusCode,
    message: String,
    data: serde_json::Value,
}

impl ApiResponse {
    /// 200 OK envelope.
    pub fn ok(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self::with_status(StatusCode::OK, message, data)
    }

    /// 201 Created envelope.
    pub fn created(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    /// Envelope with an explicit status code.
    pub fn with_status(
        status: StatusCode,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "status": self.status.as_u16(),
            "message": self.message,
            "data": self.data,
        });
        (self.status, Json(body)).into_response()
    }
}

/// `Json<T>` wrapper whose rejection is an [`AppError`].
///
/// Axum's stock `Json` extractor answers malformed bodies with a plain-text
/// rejection, which would be the one response in the API that skips the
/// envelope. This wrapper folds the rejection into the normal error path.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(AppError::validation(format!(
                "unable to parse request body: {rejection}"
            ))),
        }
    }
}
