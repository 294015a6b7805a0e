use async_trait::async_trait;
use mentora_core::models::{ConversationRecord, NewConversation, UserId};
use mentora_core::AppError;
use sqlx::{PgPool, Postgres};

/// Postgres-backed conversation record store.
#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl crate::ConversationStore for PgConversationStore {
    async fn insert(
        &self,
        conversation: NewConversation,
    ) -> Result<ConversationRecord, AppError> {
        let record: ConversationRecord = sqlx::query_as::<Postgres, ConversationRecord>(
            r#"
            INSERT INTO conversations (user_id, conversation_url, context)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, conversation_url, context, created_at
            "#,
        )
        .bind(&conversation.user_id)
        .bind(&conversation.conversation_url)
        .bind(&conversation.context)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            conversation_id = %record.id,
            user_id = %record.user_id,
            context_len = record.context.len(),
            "Conversation record created"
        );

        Ok(record)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConversationRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, ConversationRecord>(
            r#"
            SELECT id, user_id, conversation_url, context, created_at
            FROM conversations
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
