//! Request orchestration services.

pub mod conversation;

pub use conversation::{ConversationService, StartedConversation};
