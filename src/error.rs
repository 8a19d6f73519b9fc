use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Malformed query: {0}")]
    BadQuery(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation { field, message } => {
                tracing::warn!(field, %message, "rejected query parameter");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "error": "validation", "field": field, "message": message })),
                )
                    .into_response()
            }
            AppError::BadQuery(message) => {
                tracing::warn!(%message, "malformed query string");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "bad_request", "message": message })),
                )
                    .into_response()
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal" })),
                )
                    .into_response()
            }
        }
    }
}
