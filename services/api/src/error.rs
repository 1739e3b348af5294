use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use refund_router::config::documents::DocumentError;
use refund_router::config::ConfigError;

#[derive(Debug)]
pub enum ApiError {
    Config(ConfigError),
    Documents(DocumentError),
    /// The tracing subscriber could not be built or installed.
    Telemetry(String),
    Io(std::io::Error),
    Server(axum::Error),
    /// The request body is structurally fine but fails domain validation.
    InvalidRequest(String),
    /// A transaction inside an otherwise valid batch fails validation.
    InvalidTransaction(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(err) => write!(f, "configuration error: {}", err),
            ApiError::Documents(err) => write!(f, "document error: {}", err),
            ApiError::Telemetry(message) => write!(f, "telemetry error: {}", message),
            ApiError::Io(err) => write!(f, "io error: {}", err),
            ApiError::Server(err) => write!(f, "server error: {}", err),
            ApiError::InvalidRequest(message) => write!(f, "{}", message),
            ApiError::InvalidTransaction(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Config(err) => Some(err),
            ApiError::Documents(err) => Some(err),
            ApiError::Io(err) => Some(err),
            ApiError::Server(err) => Some(err),
            ApiError::Telemetry(_)
            | ApiError::InvalidRequest(_)
            | ApiError::InvalidTransaction(_) => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidTransaction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Config(_)
            | ApiError::Documents(_)
            | ApiError::Telemetry(_)
            | ApiError::Io(_)
            | ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for ApiError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DocumentError> for ApiError {
    fn from(value: DocumentError) -> Self {
        Self::Documents(value)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for ApiError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}
