//! Persisted record models and the caller identity type.
//!
//! `UploadRecord` and `ConversationRecord` are append-only rows: created once
//! per successful operation, never updated or deleted by this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

const MAX_USER_ID_LEN: usize = 128;

/// Validated caller identity.
///
/// User ids are embedded in storage keys (`{user_id}/{uuid}.{ext}`), so the
/// character set is restricted to keep keys unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::Unauthenticated("empty user identity".to_string()));
        }
        if trimmed.len() > MAX_USER_ID_LEN {
            return Err(AppError::InvalidInput(format!(
                "user identity exceeds {} characters",
                MAX_USER_ID_LEN
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
        {
            return Err(AppError::InvalidInput(
                "user identity contains unsupported characters".to_string(),
            ));
        }
        Ok(UserId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row describing one upload event.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UploadRecord {
    pub id: Uuid,
    pub user_id: String,
    pub storage_key: String,
    pub storage_url: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an upload record.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub user_id: String,
    pub storage_key: String,
    pub storage_url: String,
    pub description: Option<String>,
}

/// Row describing one created conversation session.
///
/// `context` is byte-identical to the string sent to the conversation API in
/// the same request, for auditability.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub user_id: String,
    pub conversation_url: String,
    pub context: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a conversation record.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub user_id: String,
    pub conversation_url: String,
    pub context: String,
}

/// Result of the record-and-analyze flow. Transient, returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub transcription: String,
    pub analysis: String,
}
