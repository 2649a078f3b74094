//! Observability wrapper for generation providers
//!
//! Emits a start event and a completion event per provider call carrying the
//! provider name, operation, outcome, error category and duration, and
//! records the call in [`ProviderMetrics`]. The wrapped provider's result is
//! passed through untouched.

use async_trait::async_trait;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::LlmError;
use crate::metrics::{NO_ERROR_CATEGORY, ProviderMetrics};
use crate::types::{GenerationProvider, ProviderOperation};
use docflow_utils::logging::duration_millis;
use docflow_utils::redaction::redact_error_message;
use docflow_utils::types::{DocumentInput, RewriteMode};

/// A wrapper around a `GenerationProvider` that logs and counts every call.
pub struct ObservedProvider {
    inner: Box<dyn GenerationProvider>,
    metrics: ProviderMetrics,
}

impl ObservedProvider {
    /// Wrap `inner`, recording into the process-wide registry.
    pub fn new(inner: Box<dyn GenerationProvider>) -> Self {
        Self::with_metrics(inner, ProviderMetrics::global().clone())
    }

    pub fn with_metrics(inner: Box<dyn GenerationProvider>, metrics: ProviderMetrics) -> Self {
        debug!(provider = inner.name(), "Creating ObservedProvider");
        Self { inner, metrics }
    }

    async fn observe<F>(&self, operation: ProviderOperation, call: F) -> Result<String, LlmError>
    where
        F: Future<Output = Result<String, LlmError>> + Send,
    {
        let provider = self.inner.name();
        info!(
            provider = provider,
            operation = operation.as_str(),
            "Provider call started"
        );

        let started = Instant::now();
        let result = call.await;
        let elapsed = started.elapsed();
        let duration_ms = duration_millis(elapsed);

        match &result {
            Ok(_) => info!(
                provider = provider,
                operation = operation.as_str(),
                status = "success",
                duration_ms = duration_ms,
                "Provider call completed"
            ),
            Err(err) => warn!(
                provider = provider,
                operation = operation.as_str(),
                status = "error",
                error_category = err.category(),
                http_status = err.status(),
                duration_ms = duration_ms,
                error = %redact_error_message(&err.to_string()),
                "Provider call failed"
            ),
        }

        let (status, error_category) = match &result {
            Ok(_) => ("success", NO_ERROR_CATEGORY),
            Err(err) => ("error", err.category()),
        };
        self.metrics
            .record(provider, operation.as_str(), status, error_category, elapsed);

        result
    }
}

#[async_trait]
impl GenerationProvider for ObservedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate_summary(
        &self,
        documents: &[DocumentInput],
        instructions: Option<&str>,
    ) -> Result<String, LlmError> {
        self.observe(
            ProviderOperation::Summarize,
            self.inner.generate_summary(documents, instructions),
        )
        .await
    }

    async fn rewrite_text(
        &self,
        text: &str,
        mode: Option<RewriteMode>,
        instructions: Option<&str>,
    ) -> Result<String, LlmError> {
        self.observe(
            ProviderOperation::Rewrite,
            self.inner.rewrite_text(text, mode, instructions),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline_provider::OfflineProvider;

    struct FailingProvider;

    #[async_trait]
    impl GenerationProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate_summary(
            &self,
            _documents: &[DocumentInput],
            _instructions: Option<&str>,
        ) -> Result<String, LlmError> {
            Err(LlmError::Transport("connection refused".to_string()))
        }

        async fn rewrite_text(
            &self,
            _text: &str,
            _mode: Option<RewriteMode>,
            _instructions: Option<&str>,
        ) -> Result<String, LlmError> {
            Err(LlmError::HttpStatus {
                provider: "failing".to_string(),
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_passes_through_name_and_output() {
        let observed = ObservedProvider::new(Box::new(OfflineProvider::new()));
        assert_eq!(observed.name(), "offline");

        let out = observed
            .rewrite_text("hello", Some(RewriteMode::Professional), None)
            .await
            .unwrap();
        assert_eq!(out, "Professional rewrite: hello");
    }

    #[tokio::test]
    async fn test_passes_through_errors_unchanged() {
        let observed = ObservedProvider::new(Box::new(FailingProvider));

        let err = observed.generate_summary(&[], None).await.unwrap_err();
        assert_eq!(err, LlmError::Transport("connection refused".to_string()));

        let err = observed.rewrite_text("x", None, None).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_records_success_metrics() {
        let metrics = ProviderMetrics::default();
        let observed =
            ObservedProvider::with_metrics(Box::new(OfflineProvider::new()), metrics.clone());

        observed.rewrite_text("a", None, None).await.unwrap();
        observed.rewrite_text("b", None, None).await.unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.len(), 1);
        let (key, stats) = &snapshot[0];
        assert_eq!(key.provider, "offline");
        assert_eq!(key.operation, "rewrite");
        assert_eq!(key.status, "success");
        assert_eq!(key.error_category, "none");
        assert_eq!(stats.count, 2);
    }

    #[tokio::test]
    async fn test_records_error_category() {
        let metrics = ProviderMetrics::default();
        let observed = ObservedProvider::with_metrics(Box::new(FailingProvider), metrics.clone());

        let _ = observed.generate_summary(&[], None).await;
        let _ = observed.rewrite_text("x", None, None).await;

        let categories: Vec<(String, String, String)> = metrics
            .snapshot()
            .into_iter()
            .map(|(key, _)| (key.operation, key.status, key.error_category))
            .collect();
        assert_eq!(
            categories,
            vec![
                ("rewrite".to_string(), "error".to_string(), "server".to_string()),
                ("summarize".to_string(), "error".to_string(), "transport".to_string()),
            ]
        );
        assert_eq!(metrics.total_calls(), 2);
    }
}
