//! HTTP error response conversion
//!
//! **Handler pattern:** return `Result<impl IntoResponse, HttpAppError>`.
//! `AppError` values convert into `HttpAppError` and render consistently
//! (status from metadata, JSON body, logging at the variant's level).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mentora_core::{AppError, ErrorMetadata, LogLevel};
use mentora_storage::StorageError;
use serde::Serialize;

/// JSON error body: `error` is human-readable, `code` names the failed stage
/// so clients can tell upload, processing, and session-creation failures
/// apart.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse is external, AppError lives in mentora-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::Internal(err.to_string()))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    let detail = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %detail, code = code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %detail, code = code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %detail, code = code, "Request failed");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Hide the cause chain in production and for sensitive errors.
        let details = if is_production_env() || app_error.is_sensitive() {
            None
        } else {
            Some(app_error.detailed_message())
        };

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            details,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
        });

        (status, body).into_response()
    }
}
