//! Per-user record listings.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use mentora_core::models::{ConversationRecord, UploadRecord};
use mentora_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

pub async fn list_uploads(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UploadRecord>>, HttpAppError> {
    let user = state
        .identity
        .resolve(&headers)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("no identity presented".to_string()))?;

    let uploads = state.uploads.list_for_user(&user).await?;
    Ok(Json(uploads))
}

pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ConversationRecord>>, HttpAppError> {
    let user = state
        .identity
        .resolve(&headers)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("no identity presented".to_string()))?;

    let conversations = state.conversations.list_for_user(&user).await?;
    Ok(Json(conversations))
}
