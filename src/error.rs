use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Message shown to the user for any bad numeric field.
pub const INVALID_NUMBERS_MESSAGE: &str = "Inputs have to be positive numbers!";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unknown workout type: {0}")]
    UnknownType(String),
    #[error("Invalid coordinates: [{lat}, {lng}]")]
    InvalidCoords { lat: f64, lng: f64 },
    #[error("Missing field: {0}")]
    Missing(&'static str),
    #[error("Field {field} is not a number: {raw:?}")]
    NotANumber { field: &'static str, raw: String },
    #[error("Field {0} must be a finite number")]
    NotFinite(&'static str),
    #[error("Field {0} must be positive")]
    NotPositive(&'static str),
}

impl ValidationError {
    /// The blocking message rendered back to the user.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::UnknownType(_) | ValidationError::InvalidCoords { .. } => {
                self.to_string()
            }
            ValidationError::Missing(_)
            | ValidationError::NotANumber { .. }
            | ValidationError::NotFinite(_)
            | ValidationError::NotPositive(_) => INVALID_NUMBERS_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Workout JSON encoding or decoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Workout not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": err.user_message(),
                    "detail": err.to_string(),
                }),
            ),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() })),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            AppError::Store(_) | AppError::Internal(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
