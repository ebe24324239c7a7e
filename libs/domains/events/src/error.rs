//! Event domain error types

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Result type for event operations
pub type Result<T> = std::result::Result<T, EventError>;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("An event at ({latitude}, {longitude}) on {date} already exists")]
    AlreadyExists {
        latitude: f64,
        longitude: f64,
        date: DateTime<Utc>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Storage failure, surfaced unchanged
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<mongodb::bson::ser::Error> for EventError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::Serialization(format!("BSON serialization error: {}", err))
    }
}

impl From<mongodb::bson::de::Error> for EventError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Self::Serialization(format!("BSON deserialization error: {}", err))
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(_) => AppError::NotFound(err.to_string()),
            EventError::AlreadyExists { .. } => AppError::Conflict(err.to_string()),
            EventError::Validation(errors) => AppError::Validation(errors),
            EventError::Database(e) => AppError::InternalServerError(format!("Database error: {}", e)),
            EventError::Serialization(message) => AppError::InternalServerError(message),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
