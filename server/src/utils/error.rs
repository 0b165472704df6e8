use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::ValidationError;
use crate::services::EventError;
use crate::store::StoreError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Error {action}: {source}")]
    StorageError {
        action: &'static str,
        source: StoreError,
    },
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(e) => AppError::ValidationError(e),
            EventError::NoFieldsToUpdate => AppError::NoFieldsToUpdate,
            EventError::NotFound(id) => AppError::NotFound(id),
            EventError::Storage { action, source } => AppError::StorageError { action, source },
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NoFieldsToUpdate => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NoFieldsToUpdate => "NO_FIELDS_TO_UPDATE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::StorageError { .. } => "STORAGE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(e) => {
                warn!(field = e.field, constraint = %e.constraint, "Rejected payload");
            }
            AppError::NoFieldsToUpdate => warn!("Rejected update with no fields"),
            AppError::NotFound(id) => warn!(event_id = %id, "Event not found"),
            AppError::StorageError { action, source } => {
                error!(error = ?source, action = *action, "Storage error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        let (message, details) = match &self {
            AppError::ValidationError(e) => (
                self.to_string(),
                Some(json!({
                    "field": e.field,
                    "constraint": e.constraint.to_string(),
                })),
            ),
            AppError::NoFieldsToUpdate => (self.to_string(), None),
            AppError::NotFound(_) => ("Event not found".to_string(), None),
            // The store's message is kept for diagnostics; nothing else leaks.
            AppError::StorageError { .. } => (self.to_string(), None),
        };

        error_response(code, message, details, status)
    }
}
