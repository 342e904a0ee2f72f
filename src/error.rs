use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failures of the round trip to the verification backend.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Nothing to verify
    #[error("text to verify is empty")]
    EmptyText,

    /// Backend answered with a non-success status
    #[error("API request failed: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("verification request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    /// Body was not JSON
    #[error("could not decode backend response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CheckError::Timeout
        } else if err.is_decode() {
            CheckError::Decode(err.to_string())
        } else {
            CheckError::Transport(err.to_string())
        }
    }
}

impl CheckError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckError::EmptyText => StatusCode::BAD_REQUEST,
            CheckError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            CheckError::Status { .. } | CheckError::Transport(_) | CheckError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
