use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use issue_relay::{DispatchError, FormError, TransportError};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid form: {0}")]
    InvalidForm(#[from] FormError),

    #[error("Issue tracker error: {0}")]
    Upstream(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ServerError::BadRequest(_) | ServerError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            ServerError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ServerError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Authentication(_) => "AUTH_FAILED",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::InvalidForm(_) => "INVALID_FORM",
            ServerError::Upstream(_) => "UPSTREAM_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<DispatchError> for ServerError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::BadRequest(msg) => ServerError::BadRequest(msg),
            DispatchError::InvalidForm(err) => ServerError::InvalidForm(err),
            DispatchError::Transport(err) => err.into(),
        }
    }
}

impl From<TransportError> for ServerError {
    fn from(err: TransportError) -> Self {
        match err {
            missing @ TransportError::MissingCredentials => {
                ServerError::Authentication(missing.to_string())
            }
            other => ServerError::Upstream(other.to_string()),
        }
    }
}
