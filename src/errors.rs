use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// The entered identifier is not numeric or not in the reference table.
    InvalidIdentifier(String),
    /// The scoring API answered with a non-success status code.
    UpstreamStatus {
        /// Endpoint path that was called (e.g. `/predict`).
        endpoint: &'static str,
        /// Numeric HTTP status code.
        status: u16,
    },
    /// The scoring API could not be reached.
    Transport(String),
    /// The scoring API body could not be decoded.
    Decode(String),
    /// The reference dataset could not be loaded.
    Dataset(String),
    /// A chart or the page template failed to render.
    Render(String),
}

impl AppError {
    /// Short description used in inline page messages.
    ///
    /// Status failures show only the numeric code, other failures their description.
    pub fn inline_detail(&self) -> String {
        match self {
            AppError::UpstreamStatus { status, .. } => status.to_string(),
            AppError::InvalidIdentifier(msg)
            | AppError::Transport(msg)
            | AppError::Decode(msg)
            | AppError::Dataset(msg)
            | AppError::Render(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidIdentifier(msg) => write!(f, "Invalid identifier: {}", msg),
            AppError::UpstreamStatus { endpoint, status } => {
                write!(f, "Scoring API {} returned status {}", endpoint, status)
            }
            AppError::Transport(msg) => write!(f, "Scoring API request failed: {}", msg),
            AppError::Decode(msg) => write!(f, "Failed to decode scoring API response: {}", msg),
            AppError::Dataset(msg) => write!(f, "Reference dataset error: {}", msg),
            AppError::Render(msg) => write!(f, "Rendering error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Scoring API failures are shown inline on the page; reaching this
    /// means the page itself could not be produced.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidIdentifier(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UpstreamStatus { .. } | AppError::Transport(_) | AppError::Decode(_) => {
                tracing::error!("Scoring API error: {}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "External service error".to_string(),
                )
            }
            AppError::Dataset(_) | AppError::Render(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Dataset(err.to_string())
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError::Render(err.to_string())
    }
}
