/// Error types for Media Service
///
/// Errors are converted to HTTP responses for API clients. Backend detail is
/// logged and never included in a response body.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

/// Result type for media-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Body shared by every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// The video catalog could not be read
    #[error("Error while getting videos")]
    CatalogUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::CatalogUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::CatalogUnavailable(detail) => {
                tracing::error!(detail = %detail, "Catalog query failed");
                self.to_string()
            }
            AppError::NotFound(_) => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}
