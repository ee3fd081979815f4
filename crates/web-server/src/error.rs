use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid filter: {0}")]
    Validation(#[from] core_types::CoreError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(err) => {
                tracing::debug!(error = %err, "Rejected request filters.");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Serialization(err) => {
                tracing::error!(error = ?err, "Serialization error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal serialization error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
