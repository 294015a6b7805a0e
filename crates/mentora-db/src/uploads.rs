use async_trait::async_trait;
use mentora_core::models::{NewUpload, UploadRecord, UserId};
use mentora_core::AppError;
use sqlx::{PgPool, Postgres};

/// Postgres-backed upload record store.
#[derive(Clone)]
pub struct PgUploadStore {
    pool: PgPool,
}

impl PgUploadStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl crate::UploadStore for PgUploadStore {
    async fn insert(&self, upload: NewUpload) -> Result<UploadRecord, AppError> {
        let record: UploadRecord = sqlx::query_as::<Postgres, UploadRecord>(
            r#"
            INSERT INTO uploads (user_id, storage_key, storage_url, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, storage_key, storage_url, description, created_at
            "#,
        )
        .bind(&upload.user_id)
        .bind(&upload.storage_key)
        .bind(&upload.storage_url)
        .bind(&upload.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            upload_id = %record.id,
            user_id = %record.user_id,
            storage_key = %record.storage_key,
            "Upload record created"
        );

        Ok(record)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<UploadRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, UploadRecord>(
            r#"
            SELECT id, user_id, storage_key, storage_url, description, created_at
            FROM uploads
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
