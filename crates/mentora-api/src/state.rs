//! Application state.
//!
//! Every collaborator is an explicitly constructed instance injected at
//! startup (see `setup`), never an ambient global, so tests can wire the
//! same state from fakes.

use std::sync::Arc;

use mentora_core::Config;
use mentora_db::{ConversationStore, UploadStore};
use mentora_processing::SpeechAnalyzer;

use crate::auth::IdentityResolver;
use crate::services::ConversationService;

pub struct AppState {
    pub config: Config,
    pub identity: Arc<dyn IdentityResolver>,
    pub uploads: Arc<dyn UploadStore>,
    pub conversations: Arc<dyn ConversationStore>,
    pub conversation_service: ConversationService,
    pub speech: SpeechAnalyzer,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
