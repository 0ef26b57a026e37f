//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how it is
//! rendered as a JSON error envelope: `{ "error": { "code", "message" } }`.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use foreverstory_core::{PortError, ValidationError, WorkflowError};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid input from the client.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The request clashes with existing state; carries the message shown to the user.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authenticated, but the resource belongs to someone else.
    #[error("Forbidden")]
    Forbidden,

    /// The transcription backend failed or is not configured.
    #[error("Transcription failed: {0}")]
    Transcription(String),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(e) => ApiError::Validation(e),
            WorkflowError::Port(e) => ApiError::Port(e),
            WorkflowError::Forbidden => ApiError::Forbidden,
            WorkflowError::Transcription(e) => ApiError::Transcription(e),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_code_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            ApiError::Unauthorized(_) | ApiError::Port(PortError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Nicht autorisiert".to_string(),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Keine Berechtigung für diese Ressource".to_string(),
            ),
            ApiError::Port(PortError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Die angeforderte Ressource wurde nicht gefunden.".to_string(),
            ),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "CONFLICT", message.clone()),
            ApiError::Port(PortError::Conflict(_)) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Diese Frage wurde bereits beantwortet oder übersprungen.".to_string(),
            ),
            ApiError::Transcription(_) => (
                StatusCode::BAD_GATEWAY,
                "TRANSCRIPTION_ERROR",
                "Die Transkription ist fehlgeschlagen. Bitte geben Sie Ihren Text manuell ein."
                    .to_string(),
            ),
            ApiError::Port(PortError::Unexpected(_))
            | ApiError::Config(_)
            | ApiError::Database(_)
            | ApiError::Io(_)
            | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Ein interner Fehler ist aufgetreten.".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_message();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        let body = ErrorEnvelope {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
