//! In-memory test doubles for every external collaborator.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use mentora_core::models::{
    ConversationRecord, NewConversation, NewUpload, UploadRecord, UserId,
};
use mentora_core::AppError;
use mentora_db::{ConversationStore, UploadStore};
use mentora_processing::{DocumentError, DocumentExtractor, TextUnit};
use mentora_providers::{
    ConversationClient, ProviderError, SummaryProvider, Transcriber,
};
use mentora_storage::{keys, Storage, StorageError, StorageResult};
use uuid::Uuid;

/// In-memory blob store with call counters.
pub struct FakeStorage {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub write_calls: AtomicUsize,
}

impl FakeStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            objects: Mutex::new(HashMap::new()),
            write_calls: AtomicUsize::new(0),
        })
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn upload(
        &self,
        user_id: &UserId,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let key = keys::object_key(user_id, filename);
        self.objects.lock().unwrap().insert(key.clone(), data);
        let url = format!("https://storage.test/{}", key);
        Ok((key, url))
    }

    async fn put_text(&self, user_id: &UserId, text: &str) -> StorageResult<(String, String)> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let key = keys::text_key(user_id);
        self.objects
            .lock()
            .unwrap()
            .insert(key.clone(), text.as_bytes().to_vec());
        let url = format!("https://storage.test/{}", key);
        Ok((key, url))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(storage_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(storage_key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(storage_key))
    }
}

/// In-memory upload record store; can be told to fail inserts.
pub struct FakeUploadStore {
    pub rows: Mutex<Vec<UploadRecord>>,
    pub fail_inserts: AtomicBool,
}

impl FakeUploadStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(Vec::new()),
            fail_inserts: AtomicBool::new(false),
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UploadStore for FakeUploadStore {
    async fn insert(&self, upload: NewUpload) -> Result<UploadRecord, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected insert failure".to_string()));
        }
        let record = UploadRecord {
            id: Uuid::new_v4(),
            user_id: upload.user_id,
            storage_key: upload.storage_key,
            storage_url: upload.storage_url,
            description: upload.description,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<UploadRecord>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id.as_str())
            .cloned()
            .collect())
    }
}

/// In-memory conversation record store.
pub struct FakeConversationStore {
    pub rows: Mutex<Vec<ConversationRecord>>,
}

impl FakeConversationStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(Vec::new()),
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn last_context(&self) -> Option<String> {
        self.rows.lock().unwrap().last().map(|r| r.context.clone())
    }
}

#[async_trait]
impl ConversationStore for FakeConversationStore {
    async fn insert(
        &self,
        conversation: NewConversation,
    ) -> Result<ConversationRecord, AppError> {
        let record = ConversationRecord {
            id: Uuid::new_v4(),
            user_id: conversation.user_id,
            conversation_url: conversation.conversation_url,
            context: conversation.context,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConversationRecord>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id.as_str())
            .cloned()
            .collect())
    }
}

/// Captures every context it is called with; configurable response.
pub struct FakeConversationClient {
    pub contexts: Mutex<Vec<String>>,
    pub session_url: String,
    pub respond_without_url: AtomicBool,
}

impl FakeConversationClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            contexts: Mutex::new(Vec::new()),
            session_url: "https://avatar.test/session-1".to_string(),
            respond_without_url: AtomicBool::new(false),
        })
    }

    pub fn call_count(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }

    pub fn last_context(&self) -> Option<String> {
        self.contexts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ConversationClient for FakeConversationClient {
    async fn create_conversation(
        &self,
        context: &str,
        _callback_url: Option<&str>,
    ) -> Result<String, ProviderError> {
        self.contexts.lock().unwrap().push(context.to_string());
        if self.respond_without_url.load(Ordering::SeqCst) {
            return Err(ProviderError::MissingSessionUrl);
        }
        Ok(self.session_url.clone())
    }
}

/// Returns configured text units for any PDF bytes.
pub struct FakeExtractor {
    pub units: Vec<String>,
    pub fail: bool,
}

impl DocumentExtractor for FakeExtractor {
    fn extract_units(&self, _data: &[u8]) -> Result<Vec<TextUnit>, DocumentError> {
        if self.fail {
            return Err(DocumentError::Extraction("injected extraction failure".to_string()));
        }
        Ok(self
            .units
            .iter()
            .enumerate()
            .map(|(index, text)| TextUnit {
                index,
                text: text.clone(),
            })
            .collect())
    }
}

/// Echoes its inputs; summarize counts calls so fan-out width is observable.
pub struct FakeSummaryProvider {
    pub summarize_calls: AtomicUsize,
}

impl FakeSummaryProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            summarize_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SummaryProvider for FakeSummaryProvider {
    async fn summarize(&self, text: &str) -> Result<String, ProviderError> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("summary of: {}", text))
    }

    async fn analyze_study_session(&self, transcript: &str) -> Result<String, ProviderError> {
        Ok(format!("analysis of: {}", transcript))
    }
}

/// Fixed-transcript transcriber; can be told to fail.
pub struct FakeTranscriber {
    pub fail: AtomicBool,
}

impl FakeTranscriber {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, ProviderError> {
        assert!(audio_path.exists());
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::JobFailed("injected transcription failure".to_string()));
        }
        Ok("I reviewed derivatives today".to_string())
    }
}
