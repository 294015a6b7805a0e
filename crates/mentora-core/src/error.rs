//! Error types module
//!
//! All request-scoped failures are unified under the `AppError` enum. Each
//! variant self-describes its HTTP presentation through the `ErrorMetadata`
//! trait so the API layer can render a consistent response body without
//! matching on variants itself.
//!
//! Underlying third-party failures are carried as `#[source]` causes rather
//! than flattened into strings, so the full chain survives to the log site.

use std::io;

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "SESSION_CREATION_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("No file or description provided")]
    NoInputProvided,

    #[error("Upload processing failed: {message}")]
    UploadProcessingFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Transcription failed: {message}")]
    TranscriptionFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Analysis failed: {message}")]
    AnalysisFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Conversation session creation failed: {message}")]
    SessionCreationFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Conversation API returned no session URL")]
    SessionUrlMissing,

    #[error("Record persistence failed: {message}")]
    RecordPersistenceFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata per variant: (http_status, error_code, recoverable, sensitive, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::Unauthenticated(_) => (401, "UNAUTHENTICATED", false, false, LogLevel::Debug),
        AppError::NoInputProvided => (422, "NO_INPUT_PROVIDED", false, false, LogLevel::Debug),
        AppError::UploadProcessingFailed { .. } => {
            (500, "UPLOAD_PROCESSING_FAILED", false, true, LogLevel::Error)
        }
        AppError::TranscriptionFailed { .. } => {
            (500, "TRANSCRIPTION_FAILED", true, true, LogLevel::Error)
        }
        AppError::AnalysisFailed { .. } => (500, "ANALYSIS_FAILED", true, true, LogLevel::Error),
        AppError::SessionCreationFailed { .. } => {
            (502, "SESSION_CREATION_FAILED", true, true, LogLevel::Error)
        }
        AppError::SessionUrlMissing => (502, "SESSION_URL_MISSING", true, true, LogLevel::Error),
        AppError::RecordPersistenceFailed { .. } => {
            (500, "RECORD_PERSISTENCE_FAILED", true, true, LogLevel::Error)
        }
        AppError::Database(_) => (500, "DATABASE_ERROR", true, true, LogLevel::Error),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, true, LogLevel::Error),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", false, true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            // Sensitive variants get a stage-level message; the cause chain
            // stays in logs and (outside production) in the details field.
            AppError::UploadProcessingFailed { .. } => {
                "Failed to process the uploaded document".to_string()
            }
            AppError::TranscriptionFailed { .. } => "Failed to transcribe the recording".to_string(),
            AppError::AnalysisFailed { .. } => "Failed to analyze the transcript".to_string(),
            AppError::SessionCreationFailed { .. } => {
                "Failed to create the conversation session".to_string()
            }
            AppError::RecordPersistenceFailed { .. } => "Failed to save the record".to_string(),
            AppError::Database(_) => "Database error".to_string(),
            AppError::Storage(_) => "Storage error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }
}

impl AppError {
    /// Full message including the cause chain, for logs and non-production details.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
