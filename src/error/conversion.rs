//! Error-to-response conversion.
//!
//! Errors are rendered through the same `{status, message, data}` envelope
//! as successes, with an empty `data` object, so callers can parse every
//! response the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::types::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self}");
        } else {
            tracing::warn!("request rejected ({}): {self}", status.as_u16());
        }

        let body = serde_json::json!({
            "status": status.as_u16(),
            "message": self.to_string(),
            "data": {},
        });
        (status, Json(body)).into_response()
    }
}
