//! JSON endpoint: create an avatar conversation from an already-assembled
//! context string.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use mentora_core::AppError;
use serde::{Deserialize, Serialize};

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateConversationResponse {
    pub conversation_url: String,
}

pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateConversationRequest>,
) -> Result<Json<CreateConversationResponse>, HttpAppError> {
    let user = state
        .identity
        .resolve(&headers)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("no identity presented".to_string()))?;

    let context = request
        .context
        .filter(|c| !c.trim().is_empty())
        .ok_or(AppError::NoInputProvided)?;

    let conversation_url = state
        .conversation_service
        .start_from_context(&user, &context)
        .await?;

    Ok(Json(CreateConversationResponse { conversation_url }))
}
