//! Document summarization.
//!
//! Two interchangeable strategies, selected by configuration:
//!
//! - **Reduce**: one provider call over all units joined.
//! - **Fan-out**: one call per unit through a bounded worker pool, partial
//!   results joined in completion order. A unit that fails or times out is
//!   logged and omitted; the batch still succeeds unless every unit failed.
//!
//! Both strategies run under an overall batch deadline, and fan-out adds a
//! per-unit timeout — a stuck provider call can not hang the request.

use std::sync::Arc;
use std::time::Duration;

use mentora_core::{SummarizerSettings, SummarizerStrategy};
use mentora_providers::{ProviderError, SummaryProvider};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::document::TextUnit;

const UNIT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Summarization call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("All {0} text units failed to summarize")]
    AllUnitsFailed(usize),

    #[error("Summarization batch exceeded its {0:?} deadline")]
    BatchDeadline(Duration),
}

/// Reduces an ordered sequence of text units into one synopsis.
#[derive(Clone)]
pub struct Summarizer {
    provider: Arc<dyn SummaryProvider>,
    settings: SummarizerSettings,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn SummaryProvider>, settings: SummarizerSettings) -> Self {
        Self { provider, settings }
    }

    /// Produce one synopsis for `units`.
    ///
    /// An empty batch deterministically yields an empty synopsis without
    /// touching the provider.
    pub async fn synthesize(&self, units: &[TextUnit]) -> Result<String, SummarizeError> {
        if units.is_empty() {
            return Ok(String::new());
        }

        match self.settings.strategy {
            SummarizerStrategy::Reduce => self.reduce(units).await,
            SummarizerStrategy::FanOut => self.fan_out(units).await,
        }
    }

    async fn reduce(&self, units: &[TextUnit]) -> Result<String, SummarizeError> {
        let joined = units
            .iter()
            .map(|u| u.text.as_str())
            .collect::<Vec<_>>()
            .join(UNIT_SEPARATOR);

        match tokio::time::timeout(self.settings.batch_timeout, self.provider.summarize(&joined))
            .await
        {
            Ok(result) => Ok(result?),
            Err(_) => Err(SummarizeError::BatchDeadline(self.settings.batch_timeout)),
        }
    }

    async fn fan_out(&self, units: &[TextUnit]) -> Result<String, SummarizeError> {
        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrency));
        let unit_timeout = self.settings.unit_timeout;
        let mut join_set = JoinSet::new();

        for unit in units {
            let provider = self.provider.clone();
            let semaphore = semaphore.clone();
            let unit = unit.clone();

            join_set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (unit.index, Err(anyhow::anyhow!("worker pool closed")));
                    }
                };

                match tokio::time::timeout(unit_timeout, provider.summarize(&unit.text)).await {
                    Ok(Ok(summary)) => (unit.index, Ok(summary)),
                    Ok(Err(e)) => (unit.index, Err(anyhow::Error::new(e))),
                    Err(_) => (
                        unit.index,
                        Err(anyhow::anyhow!("unit timed out after {:?}", unit_timeout)),
                    ),
                }
            });
        }

        // Partial summaries are collected in completion order; the joined
        // result is an opaque LLM context, so unit order is not a contract.
        let mut partials: Vec<String> = Vec::with_capacity(units.len());
        let mut failed = 0usize;

        let deadline = tokio::time::sleep(self.settings.batch_timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => {
                    join_set.abort_all();
                    return Err(SummarizeError::BatchDeadline(self.settings.batch_timeout));
                }
                next = join_set.join_next() => {
                    match next {
                        None => break,
                        Some(Ok((index, Ok(summary)))) => {
                            tracing::debug!(unit = index, "Unit summarized");
                            partials.push(summary);
                        }
                        Some(Ok((index, Err(e)))) => {
                            // Documented partial-failure policy: the unit's
                            // contribution is omitted, the batch continues.
                            tracing::warn!(unit = index, error = %e, "Unit summarization failed, omitting from synopsis");
                            failed += 1;
                        }
                        Some(Err(join_err)) => {
                            tracing::warn!(error = %join_err, "Summarization task panicked, omitting from synopsis");
                            failed += 1;
                        }
                    }
                }
            }
        }

        if partials.is_empty() {
            return Err(SummarizeError::AllUnitsFailed(failed));
        }

        tracing::info!(
            units = units.len(),
            succeeded = partials.len(),
            failed,
            "Fan-out summarization complete"
        );

        Ok(partials.join(UNIT_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Test provider: echoes `summary of: {text}`; inputs containing "FAIL"
    /// error, inputs containing "SLOW" sleep for 5 seconds first.
    struct FakeProvider {
        calls: AtomicUsize,
        inputs: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                inputs: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SummaryProvider for FakeProvider {
        async fn summarize(&self, text: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inputs.lock().unwrap().push(text.to_string());
            if text.contains("SLOW") {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if text.contains("FAIL") {
                return Err(ProviderError::EmptyResponse("fake"));
            }
            Ok(format!("summary of: {}", text))
        }

        async fn analyze_study_session(&self, _transcript: &str) -> Result<String, ProviderError> {
            unreachable!("not used by the summarizer")
        }
    }

    fn units(texts: &[&str]) -> Vec<TextUnit> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| TextUnit {
                index,
                text: text.to_string(),
            })
            .collect()
    }

    fn settings(strategy: SummarizerStrategy) -> SummarizerSettings {
        SummarizerSettings {
            strategy,
            max_concurrency: 2,
            unit_timeout: Duration::from_millis(500),
            batch_timeout: Duration::from_secs(2),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_returns_empty_synopsis_without_provider_call() {
        let provider = FakeProvider::new();
        let summarizer = Summarizer::new(provider.clone(), settings(SummarizerStrategy::FanOut));

        let synopsis = summarizer.synthesize(&[]).await.unwrap();

        assert_eq!(synopsis, "");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fan_out_all_units_contribute() {
        let provider = FakeProvider::new();
        let summarizer = Summarizer::new(provider.clone(), settings(SummarizerStrategy::FanOut));

        let synopsis = summarizer
            .synthesize(&units(&["alpha", "beta", "gamma"]))
            .await
            .unwrap();

        assert!(!synopsis.is_empty());
        assert!(synopsis.contains("alpha"));
        assert!(synopsis.contains("beta"));
        assert!(synopsis.contains("gamma"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fan_out_single_failure_is_omitted_and_batch_succeeds() {
        let provider = FakeProvider::new();
        let summarizer = Summarizer::new(provider.clone(), settings(SummarizerStrategy::FanOut));

        let synopsis = summarizer
            .synthesize(&units(&["alpha", "FAIL beta", "gamma"]))
            .await
            .unwrap();

        let contributions: Vec<&str> = synopsis.split(UNIT_SEPARATOR).collect();
        assert_eq!(contributions.len(), 2);
        assert!(synopsis.contains("alpha"));
        assert!(synopsis.contains("gamma"));
        assert!(!synopsis.contains("beta"));
    }

    #[tokio::test]
    async fn test_fan_out_all_failures_is_an_error() {
        let provider = FakeProvider::new();
        let summarizer = Summarizer::new(provider, settings(SummarizerStrategy::FanOut));

        let result = summarizer.synthesize(&units(&["FAIL a", "FAIL b"])).await;

        assert!(matches!(result, Err(SummarizeError::AllUnitsFailed(2))));
    }

    #[tokio::test]
    async fn test_fan_out_stuck_unit_times_out_and_is_omitted() {
        let provider = FakeProvider::new();
        let summarizer = Summarizer::new(provider, settings(SummarizerStrategy::FanOut));

        let synopsis = summarizer
            .synthesize(&units(&["alpha", "SLOW beta"]))
            .await
            .unwrap();

        assert!(synopsis.contains("alpha"));
        assert!(!synopsis.contains("beta"));
    }

    #[tokio::test]
    async fn test_fan_out_batch_deadline_fails_the_batch() {
        let provider = FakeProvider::new();
        let mut cfg = settings(SummarizerStrategy::FanOut);
        cfg.unit_timeout = Duration::from_secs(30);
        cfg.batch_timeout = Duration::from_millis(100);
        let summarizer = Summarizer::new(provider, cfg);

        let result = summarizer.synthesize(&units(&["SLOW a", "SLOW b"])).await;

        assert!(matches!(result, Err(SummarizeError::BatchDeadline(_))));
    }

    #[tokio::test]
    async fn test_reduce_makes_one_call_with_all_units() {
        let provider = FakeProvider::new();
        let summarizer = Summarizer::new(provider.clone(), settings(SummarizerStrategy::Reduce));

        let synopsis = summarizer
            .synthesize(&units(&["alpha", "beta"]))
            .await
            .unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        let inputs = provider.inputs.lock().unwrap();
        assert!(inputs[0].contains("alpha"));
        assert!(inputs[0].contains("beta"));
        assert!(synopsis.starts_with("summary of:"));
    }

    #[tokio::test]
    async fn test_reduce_provider_failure_propagates() {
        let provider = FakeProvider::new();
        let summarizer = Summarizer::new(provider, settings(SummarizerStrategy::Reduce));

        let result = summarizer.synthesize(&units(&["FAIL"])).await;

        assert!(matches!(result, Err(SummarizeError::Provider(_))));
    }
}
