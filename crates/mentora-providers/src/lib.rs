//! Third-party API clients.
//!
//! Every external capability (avatar sessions, LLM summarization,
//! speech-to-text) is reached through a narrow trait so the orchestration
//! layer and tests can substitute fakes. The real implementations are thin
//! reqwest clients with explicit timeouts and configurable base URLs.

pub mod avatar;
pub mod summary;
pub mod transcription;

use thiserror::Error;

pub use avatar::{AvatarApiClient, ConversationClient};
pub use summary::{AnthropicProvider, SummaryProvider};
pub use transcription::{AssemblyAiTranscriber, Transcriber};

/// Errors from third-party provider calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{service} returned {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    /// A 2xx conversation-API response that carried no session URL. Kept
    /// distinct from transport/API failures so callers never treat it as a
    /// silent `None`.
    #[error("Conversation API response contained no session URL")]
    MissingSessionUrl,

    #[error("Transcription job failed: {0}")]
    JobFailed(String),

    #[error("Transcription polling timed out after {0} attempts")]
    PollTimeout(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
