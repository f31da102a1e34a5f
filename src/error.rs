use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Configuration error
    ConfigError(String),
    /// A required snapshot upload was not supplied
    InputMissing(String),
    /// An uploaded snapshot exceeds the configured size limit
    InputTooLarge {
        name: String,
        size: usize,
        limit: usize,
    },
    /// Reconciliation failed; the whole batch is discarded
    Computation(String),
    /// Malformed multipart upload
    Multipart(MultipartError),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::InputMissing(msg) => write!(f, "Missing input: {}", msg),
            Self::InputTooLarge { name, size, limit } => write!(
                f,
                "File '{}' is too large: {:.1}MB exceeds the {:.1}MB limit",
                name,
                *size as f64 / 1024.0 / 1024.0,
                *limit as f64 / 1024.0 / 1024.0,
            ),
            Self::Computation(msg) => write!(f, "Processing error: {}", msg),
            Self::Multipart(err) => write!(f, "Invalid upload: {}", err),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InputMissing(_) => StatusCode::BAD_REQUEST,
            Self::InputTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Computation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::ConfigError(_) => "config_error",
        AppError::InputMissing(_) => "input_missing",
        AppError::InputTooLarge { .. } => "input_too_large",
        AppError::Computation(_) => "computation_error",
        AppError::Multipart(_) => "invalid_upload",
        AppError::InternalError(_) => "internal_error",
    }
}

// Implement conversions from common error types
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart(err)
    }
}
