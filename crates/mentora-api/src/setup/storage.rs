//! Storage backend construction.

use std::sync::Arc;

use anyhow::{Context, Result};
use mentora_core::{Config, StorageBackend};
use mentora_storage::{LocalStorage, S3Storage, Storage};

pub async fn build_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            // Presence is checked by Config::validate at startup.
            let bucket = config
                .s3_bucket
                .clone()
                .context("S3_BUCKET missing for S3 backend")?;
            let region = config
                .s3_region
                .clone()
                .context("S3_REGION missing for S3 backend")?;

            let storage = S3Storage::new(bucket.clone(), region, config.s3_endpoint.clone())
                .context("Failed to build S3 storage")?;

            tracing::info!(bucket = %bucket, "Using S3 storage backend");
            Ok(Arc::new(storage))
        }
        StorageBackend::Local => {
            let path = config
                .local_storage_path
                .clone()
                .context("LOCAL_STORAGE_PATH missing for local backend")?;
            let base_url = config
                .local_storage_base_url
                .clone()
                .unwrap_or_else(|| format!("http://localhost:{}/media", config.server_port));

            let storage = LocalStorage::new(path.clone(), base_url)
                .await
                .context("Failed to build local storage")?;

            tracing::info!(path = %path, "Using local storage backend");
            Ok(Arc::new(storage))
        }
    }
}
