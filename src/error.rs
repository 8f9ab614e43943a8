use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::error;
use validator::ValidationError;

use crate::{dao::storage::StorageError, state::deck::UnknownCard};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Invalid input provided by the client.
    #[error("{0}")]
    InvalidInput(String),
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
    /// The deck holds no card to draw.
    #[error("Deck is empty")]
    EmptyDeck,
    /// A stored value could not be decoded.
    #[error("corrupt stored value: {0}")]
    Serialization(String),
    /// Operation exceeded its timeout limit.
    #[error("operation timed out")]
    Timeout,
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<UnknownCard> for ServiceError {
    fn from(err: UnknownCard) -> Self {
        ServiceError::Serialization(err.to_string())
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        let message = err
            .message
            .map(|message| message.into_owned())
            .unwrap_or_else(|| err.code.into_owned());
        ServiceError::InvalidInput(message)
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::EmptyDeck => AppError::Internal("Deck is empty".into()),
            ServiceError::Unavailable(source) => {
                error!(error = %source, cause = ?source, "store operation failed");
                AppError::Internal(source.to_string())
            }
            ServiceError::Serialization(message) => {
                error!(%message, "failed to decode stored value");
                AppError::Internal(format!("corrupt stored value: {message}"))
            }
            ServiceError::Timeout => {
                error!("store operation timed out");
                AppError::Internal("operation timed out".into())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
