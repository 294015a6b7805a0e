//! Speech-to-text via the AssemblyAI transcript API.
//!
//! Flow: upload the staged audio bytes, start a transcript job, then poll
//! until it completes or the attempt cap is reached.

use crate::ProviderError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;

const SERVICE: &str = "AssemblyAI";
const MAX_POLL_ATTEMPTS: u32 = 120;

/// Converts a staged audio resource into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `audio_path`.
    async fn transcribe(&self, audio_path: &Path) -> Result<String, ProviderError>;
}

/// AssemblyAI transcription client.
pub struct AssemblyAiTranscriber {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptResult {
    status: String,
    text: Option<String>,
    error: Option<String>,
}

impl AssemblyAiTranscriber {
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // long audio files
            .build()
            .context("Failed to create HTTP client for AssemblyAI")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn upload_audio(&self, audio_data: Vec<u8>) -> Result<String, ProviderError> {
        let response = self
            .http_client
            .post(format!("{}/upload", self.base_url))
            .header("authorization", &self.api_key)
            .body(audio_data)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Api {
                service: SERVICE,
                status: status.as_u16(),
                body: error_text,
            });
        }

        let upload: UploadResponse = response.json().await?;
        Ok(upload.upload_url)
    }

    async fn start_transcription(&self, upload_url: &str) -> Result<String, ProviderError> {
        let response = self
            .http_client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&json!({ "audio_url": upload_url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Api {
                service: SERVICE,
                status: status.as_u16(),
                body: error_text,
            });
        }

        let transcript: TranscriptResponse = response.json().await?;
        Ok(transcript.id)
    }

    async fn poll_transcription(&self, transcript_id: &str) -> Result<String, ProviderError> {
        let url = format!("{}/transcript/{}", self.base_url, transcript_id);
        let mut attempts: u32 = 0;

        loop {
            let response = self
                .http_client
                .get(&url)
                .header("authorization", &self.api_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(ProviderError::Api {
                    service: SERVICE,
                    status: status.as_u16(),
                    body: error_text,
                });
            }

            let transcript: TranscriptResult = response.json().await?;

            match transcript.status.as_str() {
                "completed" => {
                    let text = transcript.text.unwrap_or_default();
                    tracing::info!(
                        transcript_id = %transcript_id,
                        text_length = text.len(),
                        "Transcription completed"
                    );
                    return Ok(text);
                }
                "error" => {
                    return Err(ProviderError::JobFailed(
                        transcript.error.unwrap_or_else(|| "Unknown error".to_string()),
                    ));
                }
                _ => {
                    // "queued" or "processing"
                    attempts += 1;
                    if attempts >= MAX_POLL_ATTEMPTS {
                        return Err(ProviderError::PollTimeout(MAX_POLL_ATTEMPTS));
                    }
                    // Backoff: start with 1 second, cap at 5 seconds
                    let delay_secs = attempts.min(5) as u64;
                    sleep(Duration::from_secs(delay_secs)).await;
                }
            }
        }
    }
}

#[async_trait]
impl Transcriber for AssemblyAiTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, ProviderError> {
        let audio_data = tokio::fs::read(audio_path).await?;

        tracing::info!(
            audio_size = audio_data.len(),
            "Uploading audio for transcription"
        );

        let upload_url = self.upload_audio(audio_data).await?;
        let transcript_id = self.start_transcription(&upload_url).await?;

        tracing::info!(
            transcript_id = %transcript_id,
            "Transcription started, polling for completion"
        );

        self.poll_transcription(&transcript_id).await
    }
}
