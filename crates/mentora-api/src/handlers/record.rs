//! Recording endpoint: transcribe a short audio upload and return the
//! transcript plus the situational analysis.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use mentora_core::models::TranscriptionResult;
use mentora_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

pub async fn record(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResult>, HttpAppError> {
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("invalid file field: {}", e)))?;
            if data.len() > state.config.max_audio_size_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "{} bytes exceeds max {} bytes",
                    data.len(),
                    state.config.max_audio_size_bytes
                ))
                .into());
            }
            audio = Some(data.to_vec());
        }
    }

    let audio = audio.ok_or_else(|| AppError::InvalidInput("file field is required".to_string()))?;

    tracing::info!(audio_size = audio.len(), "Processing recording");

    let result = state.speech.analyze(audio).await?;
    Ok(Json(result))
}
