//! Domain models

pub mod context;
pub mod records;

pub use context::ContextDocument;
pub use records::{
    ConversationRecord, NewConversation, NewUpload, TranscriptionResult, UploadRecord, UserId,
};
