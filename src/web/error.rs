use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::core::error::AppError;

/// Errors returned by the JSON endpoints, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum WebError {
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Internal(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            WebError::Forbidden(_) => StatusCode::FORBIDDEN,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            WebError::Unauthorized(msg)
            | WebError::Forbidden(msg)
            | WebError::BadRequest(msg)
            | WebError::Internal(msg) => msg,
        }
    }
}

impl From<AppError> for WebError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => WebError::BadRequest(msg),
            AppError::Unauthorized(msg) => WebError::Unauthorized(msg),
            other => {
                log::error!("Request failed: {}", other);
                WebError::Internal(other.user_message())
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "error": self.message()
        }));

        (status, body).into_response()
    }
}
