//! Test helpers: build AppState and router from in-memory fakes.
//!
//! Run from the workspace root: `cargo test -p mentora-api`.

#![allow(dead_code)]

pub mod fakes;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use mentora_api::auth::HeaderIdentityResolver;
use mentora_api::services::ConversationService;
use mentora_api::setup::routes;
use mentora_api::state::AppState;
use mentora_core::{Config, StorageBackend, SummarizerSettings, SummarizerStrategy};
use mentora_processing::{ContextPipeline, SpeechAnalyzer, Summarizer};

use fakes::{
    FakeConversationClient, FakeConversationStore, FakeExtractor, FakeStorage,
    FakeSummaryProvider, FakeTranscriber, FakeUploadStore,
};

pub const TEST_USER: &str = "user123";
pub const IDENTITY_HEADER: &str = "x-user-id";

/// Knobs for a test application.
pub struct TestAppOptions {
    pub extractor_units: Vec<String>,
    pub extractor_fails: bool,
    pub session_url_missing: bool,
    pub upload_insert_fails: bool,
    pub transcriber_fails: bool,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            extractor_units: vec![
                "page one".to_string(),
                "page two".to_string(),
                "page three".to_string(),
            ],
            extractor_fails: false,
            session_url_missing: false,
            upload_insert_fails: false,
            transcriber_fails: false,
        }
    }
}

/// Test application: server plus handles on every fake for assertions.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<FakeStorage>,
    pub uploads: Arc<FakeUploadStore>,
    pub conversations: Arc<FakeConversationStore>,
    pub client: Arc<FakeConversationClient>,
    pub summary: Arc<FakeSummaryProvider>,
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions::default()).await
}

pub async fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let config = test_config();

    let storage = FakeStorage::new();
    let uploads = FakeUploadStore::new();
    let conversations = FakeConversationStore::new();
    let client = FakeConversationClient::new();
    let summary = FakeSummaryProvider::new();
    let transcriber = FakeTranscriber::new();

    uploads
        .fail_inserts
        .store(options.upload_insert_fails, Ordering::SeqCst);
    client
        .respond_without_url
        .store(options.session_url_missing, Ordering::SeqCst);
    transcriber
        .fail
        .store(options.transcriber_fails, Ordering::SeqCst);

    let summarizer = Summarizer::new(summary.clone(), config.summarizer.clone());
    let pipeline = ContextPipeline::new(
        Arc::new(FakeExtractor {
            units: options.extractor_units,
            fail: options.extractor_fails,
        }),
        summarizer,
        config.context_include_raw_content,
    );

    let conversation_service = ConversationService::new(
        storage.clone(),
        uploads.clone(),
        conversations.clone(),
        pipeline,
        client.clone(),
        None,
    );

    let speech = SpeechAnalyzer::new(transcriber, summary.clone());

    let state = Arc::new(AppState {
        config,
        identity: Arc::new(HeaderIdentityResolver::new(IDENTITY_HEADER)),
        uploads: uploads.clone(),
        conversations: conversations.clone(),
        conversation_service,
        speech,
    });

    let router = routes::build_router(state).expect("router must build");
    let server = TestServer::new(router).expect("test server must start");

    TestApp {
        server,
        storage,
        uploads,
        conversations,
        client,
        summary,
    }
}

fn test_config() -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        database_url: "postgresql://localhost/mentora_test".to_string(),
        db_max_connections: 2,
        db_timeout_seconds: 5,
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: Some("/tmp/mentora-test".to_string()),
        local_storage_base_url: None,
        avatar_api_key: "test-key".to_string(),
        avatar_replica_id: "r-1".to_string(),
        avatar_persona_id: "p-1".to_string(),
        avatar_base_url: "https://avatar.test".to_string(),
        avatar_callback_url: None,
        anthropic_api_key: "test-key".to_string(),
        anthropic_base_url: "https://anthropic.test".to_string(),
        anthropic_model: "test-model".to_string(),
        assemblyai_api_key: "test-key".to_string(),
        assemblyai_base_url: "https://assemblyai.test".to_string(),
        max_upload_size_bytes: 10 * 1024 * 1024,
        max_audio_size_bytes: 10 * 1024 * 1024,
        summarizer: SummarizerSettings {
            strategy: SummarizerStrategy::FanOut,
            max_concurrency: 2,
            unit_timeout: Duration::from_secs(5),
            batch_timeout: Duration::from_secs(10),
        },
        context_include_raw_content: false,
        identity_header: IDENTITY_HEADER.to_string(),
        demo_user_id: None,
    }
}
