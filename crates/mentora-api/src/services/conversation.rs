//! Upload-to-conversation orchestration.
//!
//! Sequencing per request: validate inputs (no side effects on the failure
//! path), one blob write, one upload record, assemble the context, create
//! the avatar session, one conversation record. The persisted context is the
//! same string that was sent to the session API.

use std::sync::Arc;

use mentora_core::models::{NewConversation, NewUpload, UserId};
use mentora_core::AppError;
use mentora_db::{ConversationStore, UploadStore};
use mentora_processing::{ContextPipeline, UploadInput};
use mentora_providers::{ConversationClient, ProviderError};
use mentora_storage::Storage;

/// Outcome of a successful upload flow.
#[derive(Debug)]
pub struct StartedConversation {
    pub conversation_url: String,
    pub context: String,
    /// Present when an unsupported file type was accepted but not
    /// incorporated into the context.
    pub warning: Option<String>,
}

pub struct ConversationService {
    storage: Arc<dyn Storage>,
    uploads: Arc<dyn UploadStore>,
    conversations: Arc<dyn ConversationStore>,
    pipeline: ContextPipeline,
    client: Arc<dyn ConversationClient>,
    callback_url: Option<String>,
}

impl ConversationService {
    pub fn new(
        storage: Arc<dyn Storage>,
        uploads: Arc<dyn UploadStore>,
        conversations: Arc<dyn ConversationStore>,
        pipeline: ContextPipeline,
        client: Arc<dyn ConversationClient>,
        callback_url: Option<String>,
    ) -> Self {
        Self {
            storage,
            uploads,
            conversations,
            pipeline,
            client,
            callback_url,
        }
    }

    /// Run the full upload flow and return the joinable session URL.
    pub async fn start_from_upload(
        &self,
        user: &UserId,
        display_name: &str,
        input: UploadInput,
    ) -> Result<StartedConversation, AppError> {
        // Input check comes first: the failure path must not touch the blob
        // store, the record store, or the session client.
        if input.is_empty() {
            return Err(AppError::NoInputProvided);
        }

        let (storage_key, storage_url) = match &input.file {
            Some(file) => self
                .storage
                .upload(user, &file.filename, &file.content_type, file.data.clone())
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?,
            None => {
                let description = input.description.as_deref().unwrap_or_default();
                self.storage
                    .put_text(user, description)
                    .await
                    .map_err(|e| AppError::Storage(e.to_string()))?
            }
        };

        let description = input
            .description
            .clone()
            .filter(|d| !d.trim().is_empty());

        let upload = NewUpload {
            user_id: user.as_str().to_string(),
            storage_key: storage_key.clone(),
            storage_url,
            description,
        };
        if let Err(e) = self.uploads.insert(upload).await {
            // The blob is orphaned without its record; remove it best-effort.
            let storage = self.storage.clone();
            tokio::spawn(async move {
                if let Err(cleanup_err) = storage.delete(&storage_key).await {
                    tracing::debug!(
                        error = %cleanup_err,
                        storage_key = %storage_key,
                        "Failed to clean up blob after record insert error"
                    );
                }
            });
            return Err(AppError::RecordPersistenceFailed {
                message: "upload record insert failed".to_string(),
                source: anyhow::Error::new(e),
            });
        }

        let assembled = self.pipeline.assemble(display_name, input).await?;
        let warning = assembled.skipped.as_ref().map(|skipped| {
            format!(
                "Unsupported file type '{}' was not incorporated into the conversation context",
                skipped.content_type
            )
        });

        let context = assembled.document.render();
        let conversation_url = self.create_session(&context).await?;
        self.persist_conversation(user, &conversation_url, &context)
            .await?;

        Ok(StartedConversation {
            conversation_url,
            context,
            warning,
        })
    }

    /// Create a session from an already-assembled context string.
    pub async fn start_from_context(
        &self,
        user: &UserId,
        context: &str,
    ) -> Result<String, AppError> {
        let conversation_url = self.create_session(context).await?;
        self.persist_conversation(user, &conversation_url, context)
            .await?;
        Ok(conversation_url)
    }

    async fn create_session(&self, context: &str) -> Result<String, AppError> {
        match self
            .client
            .create_conversation(context, self.callback_url.as_deref())
            .await
        {
            Ok(url) => Ok(url),
            Err(ProviderError::MissingSessionUrl) => Err(AppError::SessionUrlMissing),
            Err(e) => Err(AppError::SessionCreationFailed {
                message: "avatar API call failed".to_string(),
                source: anyhow::Error::new(e),
            }),
        }
    }

    async fn persist_conversation(
        &self,
        user: &UserId,
        conversation_url: &str,
        context: &str,
    ) -> Result<(), AppError> {
        self.conversations
            .insert(NewConversation {
                user_id: user.as_str().to_string(),
                conversation_url: conversation_url.to_string(),
                context: context.to_string(),
            })
            .await
            .map_err(|e| AppError::RecordPersistenceFailed {
                message: "conversation record insert failed".to_string(),
                source: anyhow::Error::new(e),
            })?;
        Ok(())
    }
}
