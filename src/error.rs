use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::Unauthorized => (
                StatusCode::FORBIDDEN,
                Json(ApiErrorBody {
                    error: "Unauthorized".to_string(),
                }),
            )
                .into_response(),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(ApiErrorBody {
                    error: format!("{what} not found"),
                }),
            )
                .into_response(),
            // The login form treats this as a normal outcome, not an HTTP failure.
            AppError::InvalidCredentials => (
                StatusCode::OK,
                Json(LoginFailure {
                    success: false,
                    message: "Invalid credentials".to_string(),
                }),
            )
                .into_response(),
            AppError::DatabaseError(_)
            | AppError::ConfigError(_)
            | AppError::SerializationError(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiErrorBody {
                        error: "An internal server error occurred.".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Flat JSON error body: `{"error": "..."}`.
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Serialize)]
pub struct LoginFailure {
    pub success: bool,
    pub message: String,
}
