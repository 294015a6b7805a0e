//! Record store: append-only upload and conversation rows in Postgres.
//!
//! Repositories are exposed behind the `UploadStore`/`ConversationStore`
//! traits so the orchestration layer can run against fakes in tests.

pub mod conversations;
pub mod uploads;

use async_trait::async_trait;
use mentora_core::models::{
    ConversationRecord, NewConversation, NewUpload, UploadRecord, UserId,
};
use mentora_core::AppError;

pub use conversations::PgConversationStore;
pub use uploads::PgUploadStore;

/// Append-only store for upload records.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Insert one row per successful upload. Rows are never mutated.
    async fn insert(&self, upload: NewUpload) -> Result<UploadRecord, AppError>;

    /// All uploads for a user, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<UploadRecord>, AppError>;
}

/// Append-only store for conversation records.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Insert one row per created session. Rows are never mutated.
    async fn insert(&self, conversation: NewConversation)
        -> Result<ConversationRecord, AppError>;

    /// All conversations for a user, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ConversationRecord>, AppError>;
}
