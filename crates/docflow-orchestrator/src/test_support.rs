use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use docflow_llm::{GenerationProvider, LlmError};
use docflow_utils::types::{DocumentInput, RewriteMode};

/// Provider stub that counts calls and returns a canned outcome.
pub(crate) struct RecordingProvider {
    outcome: Result<String, LlmError>,
    calls: AtomicUsize,
}

impl RecordingProvider {
    pub(crate) fn succeeding(output: &str) -> Self {
        Self {
            outcome: Ok(output.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(error: LlmError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

#[async_trait]
impl GenerationProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate_summary(
        &self,
        _documents: &[DocumentInput],
        _instructions: Option<&str>,
    ) -> Result<String, LlmError> {
        self.respond()
    }

    async fn rewrite_text(
        &self,
        _text: &str,
        _mode: Option<RewriteMode>,
        _instructions: Option<&str>,
    ) -> Result<String, LlmError> {
        self.respond()
    }
}
