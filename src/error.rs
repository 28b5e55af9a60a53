//! Error types for Biblios server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Machine-readable error categories carried in every error response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    Validation,
    DataConsistency,
    Database,
    Unexpected,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Book with id {0} was not found")]
    BookNotFound(i64),

    #[error("User with id {0} was not found")]
    UserNotFound(i64),

    #[error("Book with this author and name already exists")]
    BookAlreadyExists,

    #[error("User with this username or email already exists")]
    UserAlreadyExists,

    #[error("Book is already issued to this user")]
    BookAlreadyIssued,

    #[error("Book is not issued to this user")]
    BookNotIssued,

    #[error("No available copies of this book left")]
    NoAvailableCopies,

    #[error("Book is currently issued and cannot be deleted")]
    BookIssued,

    #[error("User has issued books and cannot be deleted")]
    UserHasIssuedBooks,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Category reported to the caller for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BookNotFound(_) | AppError::UserNotFound(_) => ErrorKind::NotFound,
            AppError::BookAlreadyExists
            | AppError::UserAlreadyExists
            | AppError::BookAlreadyIssued
            | AppError::BookNotIssued
            | AppError::NoAvailableCopies
            | AppError::BookIssued
            | AppError::UserHasIssuedBooks => ErrorKind::DataConsistency,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Database(_) => ErrorKind::Database,
            AppError::Internal(_) => ErrorKind::Unexpected,
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::DataConsistency => StatusCode::CONFLICT,
            ErrorKind::Database | ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server faults stay opaque to the caller
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            kind: self.kind(),
            message,
            timestamp: Utc::now(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
