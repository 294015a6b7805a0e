//! Application setup: construct every dependency once at startup and wire
//! the router.

pub mod database;
pub mod providers;
pub mod routes;
pub mod server;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use mentora_core::models::UserId;
use mentora_core::Config;
use mentora_db::{PgConversationStore, PgUploadStore};
use mentora_processing::{ContextPipeline, PdfExtractor, SpeechAnalyzer, Summarizer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::{HeaderIdentityResolver, IdentityResolver, StaticIdentityResolver};
use crate::services::ConversationService;
use crate::state::AppState;

/// Initialize tracing with an env-filter.
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mentora=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the full application: pool, storage, providers, state, and router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let pool = database::connect_and_migrate(&config).await?;
    let storage = storage::build_storage(&config).await?;
    let clients = providers::build_providers(&config)?;

    let uploads = Arc::new(PgUploadStore::new(pool.clone()));
    let conversations = Arc::new(PgConversationStore::new(pool));

    let summarizer = Summarizer::new(clients.summary.clone(), config.summarizer.clone());
    let pipeline = ContextPipeline::new(
        Arc::new(PdfExtractor::new()),
        summarizer,
        config.context_include_raw_content,
    );

    let conversation_service = ConversationService::new(
        storage,
        uploads.clone(),
        conversations.clone(),
        pipeline,
        clients.conversation,
        config.avatar_callback_url.clone(),
    );

    let speech = SpeechAnalyzer::new(clients.transcriber, clients.summary);

    let identity: Arc<dyn IdentityResolver> = match &config.demo_user_id {
        Some(demo_user) => {
            tracing::warn!(user_id = %demo_user, "DEMO_USER_ID set, all requests share one identity");
            Arc::new(StaticIdentityResolver::new(UserId::new(demo_user.clone())?))
        }
        None => Arc::new(HeaderIdentityResolver::new(config.identity_header.clone())),
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        identity,
        uploads,
        conversations,
        conversation_service,
        speech,
    });

    let router = routes::build_router(state.clone())?;
    Ok((state, router))
}
