//! Custom error types for the web service

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Custom error type for the web service
#[derive(Error, Debug)]
pub enum AppError {
    /// Multipart body could not be read
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// Database error from the shared library
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// Media storage error
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Repository or other internal failure
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Multipart(e) => (e.status(), e.body_text()),
            _ => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

/// Type alias for handler results
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_errors_hide_details() {
        let response = AppError::Internal(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let response = AppError::from(io).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
