//! Conversation session client for the avatar video API.

use crate::ProviderError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "Avatar API";
const DEFAULT_CONVERSATION_NAME: &str = "User Conversation";

/// Creates remote avatar conversations seeded with a context string.
#[async_trait]
pub trait ConversationClient: Send + Sync {
    /// Request a new conversation and return its joinable session URL.
    async fn create_conversation(
        &self,
        context: &str,
        callback_url: Option<&str>,
    ) -> Result<String, ProviderError>;
}

/// HTTP client for the avatar conversation API.
pub struct AvatarApiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    replica_id: String,
    persona_id: String,
}

#[derive(Debug, Serialize)]
struct ConversationProperties {
    enable_recording: bool,
    language: &'static str,
}

#[derive(Debug, Serialize)]
struct CreateConversationRequest<'a> {
    replica_id: &'a str,
    persona_id: &'a str,
    conversation_name: &'a str,
    conversational_context: &'a str,
    properties: ConversationProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreateConversationResponse {
    conversation_url: Option<String>,
}

impl AvatarApiClient {
    pub fn new(
        base_url: String,
        api_key: String,
        replica_id: String,
        persona_id: String,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client for the avatar API")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            replica_id,
            persona_id,
        })
    }
}

#[async_trait]
impl ConversationClient for AvatarApiClient {
    async fn create_conversation(
        &self,
        context: &str,
        callback_url: Option<&str>,
    ) -> Result<String, ProviderError> {
        let body = CreateConversationRequest {
            replica_id: &self.replica_id,
            persona_id: &self.persona_id,
            conversation_name: DEFAULT_CONVERSATION_NAME,
            conversational_context: context,
            properties: ConversationProperties {
                enable_recording: false,
                language: "english",
            },
            callback_url,
        };

        let response = self
            .http_client
            .post(format!("{}/conversations", self.base_url))
            .header("x-api-key", &self.api_key)
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
                "Avatar conversation creation failed"
            );
            return Err(ProviderError::Api {
                service: SERVICE,
                status: status.as_u16(),
                body: error_text,
            });
        }

        let parsed: CreateConversationResponse = response.json().await?;

        match parsed.conversation_url {
            Some(url) if !url.is_empty() => {
                tracing::info!(conversation_url = %url, "Avatar conversation created");
                Ok(url)
            }
            _ => {
                tracing::error!("Avatar API returned success without a conversation URL");
                Err(ProviderError::MissingSessionUrl)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base_url: String) -> AvatarApiClient {
        AvatarApiClient::new(
            base_url,
            "test-key".to_string(),
            "r-1".to_string(),
            "p-1".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_conversation_returns_session_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/conversations")
            .match_header("x-api-key", "test-key")
            .with_status(200)
            .with_body(
                json!({
                    "conversation_id": "c-123",
                    "conversation_url": "https://avatar.example/c-123"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let url = client(server.url())
            .create_conversation("User Name: Alice\n", None)
            .await
            .unwrap();

        assert_eq!(url, "https://avatar.example/c-123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_success_without_url_is_missing_session_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/conversations")
            .with_status(200)
            .with_body(json!({ "conversation_id": "c-123" }).to_string())
            .create_async()
            .await;

        let result = client(server.url())
            .create_conversation("context", None)
            .await;

        assert!(matches!(result, Err(ProviderError::MissingSessionUrl)));
    }

    #[tokio::test]
    async fn test_upstream_error_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/conversations")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let result = client(server.url())
            .create_conversation("context", None)
            .await;

        match result {
            Err(ProviderError::Api { status, body, .. }) => {
                assert_eq!(status, 500);
                assert!(body.contains("upstream exploded"));
            }
            other => panic!("Expected Api error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_callback_url_is_forwarded_when_present() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/conversations")
            .match_body(mockito::Matcher::PartialJson(json!({
                "callback_url": "https://example.com/webhook",
                "conversational_context": "ctx"
            })))
            .with_status(200)
            .with_body(json!({ "conversation_url": "https://avatar.example/c-9" }).to_string())
            .create_async()
            .await;

        client(server.url())
            .create_conversation("ctx", Some("https://example.com/webhook"))
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
