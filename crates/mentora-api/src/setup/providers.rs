//! Third-party provider client construction.

use std::sync::Arc;

use anyhow::{Context, Result};
use mentora_core::Config;
use mentora_providers::{
    AnthropicProvider, AssemblyAiTranscriber, AvatarApiClient, ConversationClient,
    SummaryProvider, Transcriber,
};

pub struct ProviderClients {
    pub summary: Arc<dyn SummaryProvider>,
    pub transcriber: Arc<dyn Transcriber>,
    pub conversation: Arc<dyn ConversationClient>,
}

pub fn build_providers(config: &Config) -> Result<ProviderClients> {
    let summary = AnthropicProvider::new(
        config.anthropic_base_url.clone(),
        config.anthropic_api_key.clone(),
        config.anthropic_model.clone(),
    )
    .context("Failed to build the summarization provider")?;

    let transcriber = AssemblyAiTranscriber::new(
        config.assemblyai_base_url.clone(),
        config.assemblyai_api_key.clone(),
    )
    .context("Failed to build the transcription client")?;

    let conversation = AvatarApiClient::new(
        config.avatar_base_url.clone(),
        config.avatar_api_key.clone(),
        config.avatar_replica_id.clone(),
        config.avatar_persona_id.clone(),
    )
    .context("Failed to build the avatar session client")?;

    Ok(ProviderClients {
        summary: Arc::new(summary),
        transcriber: Arc::new(transcriber),
        conversation: Arc::new(conversation),
    })
}
