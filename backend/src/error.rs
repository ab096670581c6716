//! Error handling for the Cidery Management Platform
//!
//! Every error renders as `{ "error": { code, title, message, field? } }`.
//! Messages from the RPC API are passed through verbatim; the title comes
//! from the action that failed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    // Upstream RPC errors
    #[error("{procedure} failed: {message}")]
    Rpc { procedure: String, message: String },

    #[error("RPC API unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),

    /// Any of the above with the failing action's title
    #[error("{title}: {source}")]
    Titled {
        title: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Attach the user-facing title of the action that failed
    pub fn titled(self, title: &'static str) -> Self {
        match self {
            AppError::Titled { source, .. } => AppError::Titled { title, source },
            other => AppError::Titled {
                title,
                source: Box::new(other),
            },
        }
    }

    fn parts(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", "Validation error", message.clone())
                    .with_field(field.clone()),
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", "Validation error", msg.clone()),
            ),
            AppError::Conflict { resource, message } => (
                StatusCode::CONFLICT,
                ErrorDetail::new("CONFLICT", "Conflict", message.clone()).with_field(resource.clone()),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", "Not found", format!("{} not found", resource)),
            ),
            AppError::InvalidStateTransition(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("INVALID_STATE_TRANSITION", "Action not allowed", msg.clone()),
            ),
            AppError::Rpc { message, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("RPC_ERROR", "Request failed", message.clone()),
            ),
            AppError::UpstreamUnavailable(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new("UPSTREAM_UNAVAILABLE", "Service unavailable", msg.clone()),
            ),
            AppError::InvalidResponse(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new("INVALID_RESPONSE", "Request failed", msg.clone()),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", "Internal error", msg.clone()),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "INTERNAL_ERROR",
                    "Internal error",
                    "An internal server error occurred".to_string(),
                ),
            ),
            AppError::Titled { title, source } => {
                let (status, mut detail) = source.parts();
                detail.title = (*title).to_string();
                (status, detail)
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    /// Report the first failing field (alphabetically, so the response is
    /// stable). Nested list errors fall back to the full summary.
    fn from(errors: validator::ValidationErrors) -> Self {
        let first = errors
            .field_errors()
            .into_iter()
            .min_by_key(|(field, _)| *field)
            .and_then(|(field, list)| {
                list.first().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    (field, message)
                })
            });

        match first {
            Some(("__all__", message)) => AppError::ValidationError(message),
            Some((field, message)) => AppError::Validation {
                field: field.to_string(),
                message,
            },
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::InvalidResponse(e.to_string())
    }
}

impl From<shared::export::ExportError> for AppError {
    fn from(e: shared::export::ExportError) -> Self {
        AppError::Internal(format!("Export failed: {}", e))
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, title: &str, message: String) -> Self {
        Self {
            code: code.to_string(),
            title: title.to_string(),
            message,
            field: None,
        }
    }

    fn with_field(mut self, field: String) -> Self {
        self.field = Some(field);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.parts();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
