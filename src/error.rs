// src/error.rs
use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Repository read/write failures (the "upstream" of every handler)
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Malformed or out-of-range input, rejected before it reaches the domain.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Stored counters that break the subject invariants.
    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),

    #[error("Unexpected internal error")]
    InternalServerError,
}

impl AppError {
    pub fn not_found(what: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} '{}'", what, id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DataInconsistency(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::SqlxError(_)
            | AppError::SqlxMigrateError(_)
            | AppError::ConfigError(_)
            | AppError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        // A body over `DefaultBodyLimit` surfaces here while streaming fields
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::Validation(err.body_text())
        }
    }
}

// How an AppError becomes an HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // Client errors carry their own message; server errors stay generic
        let message = if status.is_server_error() {
            tracing::error!("Error processed: {:?}", self);
            match self {
                AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                    "Failed to access data.".to_string()
                }
                AppError::ConfigError(_) => "Server configuration error.".to_string(),
                _ => "An unexpected error occurred.".to_string(),
            }
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

// Default Result type for the application
pub type AppResult<T = ()> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(AppError::not_found("Subject", "x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DataInconsistency("bad".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::PayloadTooLarge("big".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[tokio::test]
    async fn server_errors_do_not_leak_details() {
        let response =
            AppError::SqlxError(sqlx::Error::Protocol("secret table".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("secret table"));
        assert!(text.contains("Failed to access data."));
    }
}
