//! Recording analysis: transcribe an audio upload, then run the transcript
//! through the situational-analysis prompt.
//!
//! Incoming bytes are staged in a `NamedTempFile`, which is removed when it
//! drops — on success, on error, and on panic alike. The temp resource is
//! released before the analysis call; only the transcript travels further.

use std::io::Write;
use std::sync::Arc;

use mentora_core::models::TranscriptionResult;
use mentora_core::AppError;
use mentora_providers::{SummaryProvider, Transcriber};

pub struct SpeechAnalyzer {
    transcriber: Arc<dyn Transcriber>,
    provider: Arc<dyn SummaryProvider>,
}

impl SpeechAnalyzer {
    pub fn new(transcriber: Arc<dyn Transcriber>, provider: Arc<dyn SummaryProvider>) -> Self {
        Self {
            transcriber,
            provider,
        }
    }

    pub async fn analyze(&self, audio: Vec<u8>) -> Result<TranscriptionResult, AppError> {
        if audio.is_empty() {
            return Err(AppError::TranscriptionFailed {
                message: "audio recording is empty".to_string(),
                source: anyhow::anyhow!("zero-length audio body"),
            });
        }

        let temp = tokio::task::spawn_blocking(move || -> std::io::Result<tempfile::NamedTempFile> {
            let mut temp = tempfile::NamedTempFile::new()?;
            temp.write_all(&audio)?;
            temp.flush()?;
            Ok(temp)
        })
        .await
        .map_err(|e| AppError::Internal(format!("audio staging task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("failed to stage audio: {}", e)))?;

        let transcription = self
            .transcriber
            .transcribe(temp.path())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Transcription failed");
                AppError::TranscriptionFailed {
                    message: "speech-to-text call failed".to_string(),
                    source: anyhow::Error::new(e),
                }
            })?;
        drop(temp);

        tracing::info!(transcript_len = transcription.len(), "Audio transcribed");

        let analysis = self
            .provider
            .analyze_study_session(&transcription)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Transcript analysis failed");
                AppError::AnalysisFailed {
                    message: "language model call failed".to_string(),
                    source: anyhow::Error::new(e),
                }
            })?;

        Ok(TranscriptionResult {
            transcription,
            analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mentora_providers::ProviderError;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Records the staged path it was handed; optionally fails.
    struct FakeTranscriber {
        seen_path: Mutex<Option<PathBuf>>,
        fail: bool,
    }

    impl FakeTranscriber {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                seen_path: Mutex::new(None),
                fail,
            })
        }
    }

    #[async_trait]
    impl Transcriber for FakeTranscriber {
        async fn transcribe(&self, audio_path: &Path) -> Result<String, ProviderError> {
            assert!(audio_path.exists(), "staged audio must exist during transcription");
            *self.seen_path.lock().unwrap() = Some(audio_path.to_path_buf());
            if self.fail {
                return Err(ProviderError::JobFailed("bad audio".to_string()));
            }
            Ok("I reviewed derivatives today".to_string())
        }
    }

    struct FakeProvider {
        fail: bool,
    }

    #[async_trait]
    impl SummaryProvider for FakeProvider {
        async fn summarize(&self, _text: &str) -> Result<String, ProviderError> {
            unreachable!("not used by speech analysis")
        }

        async fn analyze_study_session(&self, transcript: &str) -> Result<String, ProviderError> {
            if self.fail {
                return Err(ProviderError::EmptyResponse("fake"));
            }
            Ok(format!("analysis of: {}", transcript))
        }
    }

    #[tokio::test]
    async fn test_analyze_returns_transcript_and_analysis() {
        let transcriber = FakeTranscriber::new(false);
        let analyzer = SpeechAnalyzer::new(transcriber.clone(), Arc::new(FakeProvider { fail: false }));

        let result = analyzer.analyze(b"audio-bytes".to_vec()).await.unwrap();

        assert_eq!(result.transcription, "I reviewed derivatives today");
        assert!(result.analysis.contains("derivatives"));

        // The staged temp resource is gone after the flow completes.
        let path = transcriber.seen_path.lock().unwrap().clone().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_empty_audio_is_classified_without_staging() {
        let transcriber = FakeTranscriber::new(false);
        let analyzer = SpeechAnalyzer::new(transcriber.clone(), Arc::new(FakeProvider { fail: false }));

        let result = analyzer.analyze(Vec::new()).await;

        assert!(matches!(
            result,
            Err(AppError::TranscriptionFailed { .. })
        ));
        assert!(transcriber.seen_path.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transcriber_failure_cleans_up_temp_file() {
        let transcriber = FakeTranscriber::new(true);
        let analyzer = SpeechAnalyzer::new(transcriber.clone(), Arc::new(FakeProvider { fail: false }));

        let result = analyzer.analyze(b"audio-bytes".to_vec()).await;

        assert!(matches!(
            result,
            Err(AppError::TranscriptionFailed { .. })
        ));
        let path = transcriber.seen_path.lock().unwrap().clone().unwrap();
        assert!(!path.exists(), "temp file must be removed on the error path");
    }

    #[tokio::test]
    async fn test_analysis_failure_is_classified() {
        let transcriber = FakeTranscriber::new(false);
        let analyzer = SpeechAnalyzer::new(transcriber, Arc::new(FakeProvider { fail: true }));

        let result = analyzer.analyze(b"audio-bytes".to_vec()).await;

        assert!(matches!(result, Err(AppError::AnalysisFailed { .. })));
    }
}
