//! LLM summarization and transcript analysis via the Anthropic Messages API.

use crate::ProviderError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "Anthropic API";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

const SUMMARIZE_PROMPT: &str = "Summarize the following document text in a short paragraph. \
Keep the concrete topics, facts, and terminology a tutor would need to discuss it with the \
author. Respond with the summary only.";

const ANALYSIS_PROMPT: &str = "You are an empathetic tutor reviewing a transcript of a student \
describing a study session. Write a short prose summary covering: the topic they are working \
on, how far along they seem, where they are struggling, and how confident they sound. Be \
specific and supportive.";

/// Provider for text synthesis: document summarization and transcript analysis.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Reduce a piece of document text into a short synopsis.
    async fn summarize(&self, text: &str) -> Result<String, ProviderError>;

    /// Produce the situational analysis of a study-session transcript.
    async fn analyze_study_session(&self, transcript: &str) -> Result<String, ProviderError>;
}

/// Anthropic Messages API client.
pub struct AnthropicProvider {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

// Messages API request/response structures
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text { text: String },
}

impl AnthropicProvider {
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client for Anthropic")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    async fn complete(&self, prompt: &str, input: &str) -> Result<String, ProviderError> {
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![MessageParam {
                role: "user",
                content: format!("{}\n\n{}", prompt, input),
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                body = %error_text,
                model = %self.model,
                "Anthropic request failed"
            );
            return Err(ProviderError::Api {
                service: SERVICE,
                status: status.as_u16(),
                body: error_text,
            });
        }

        let parsed: MessagesResponse = response.json().await?;

        let text = parsed
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlockResponse::Text { text } => text,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse(SERVICE));
        }

        Ok(text)
    }
}

#[async_trait]
impl SummaryProvider for AnthropicProvider {
    async fn summarize(&self, text: &str) -> Result<String, ProviderError> {
        self.complete(SUMMARIZE_PROMPT, text).await
    }

    async fn analyze_study_session(&self, transcript: &str) -> Result<String, ProviderError> {
        self.complete(ANALYSIS_PROMPT, transcript).await
    }
}
