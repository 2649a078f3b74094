//! Executor
//!
//! Runs one plan step against the generation provider. One attempt, no
//! retry; provider errors come back unchanged inside `TaskError::Upstream`.

use std::sync::Arc;
use tracing::debug;

use crate::context::AgentContext;
use docflow_llm::GenerationProvider;
use docflow_utils::error::TaskError;
use docflow_utils::types::{PlanStep, TaskKind, has_text};

pub struct Executor {
    provider: Arc<dyn GenerationProvider>,
}

impl Executor {
    #[must_use]
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self { provider }
    }

    /// Execute `step` and return the generated text.
    ///
    /// # Errors
    ///
    /// - `TaskError::InvalidInput` if a rewrite step has no text; the
    ///   provider is not called
    /// - `TaskError::Upstream` if the provider fails
    pub async fn execute(
        &self,
        step: &PlanStep,
        ctx: &AgentContext<'_>,
    ) -> Result<String, TaskError> {
        debug!(
            request_id = ctx.request_id,
            step = %step.id,
            action = %step.action,
            "Executing step"
        );

        let output = match step.action {
            TaskKind::Summarize => {
                self.provider
                    .generate_summary(ctx.documents, ctx.instructions)
                    .await?
            }
            TaskKind::Rewrite => {
                let text = ctx
                    .text
                    .filter(|text| has_text(Some(*text)))
                    .ok_or_else(|| {
                        TaskError::InvalidInput("text is required for rewrite".to_string())
                    })?;
                self.provider
                    .rewrite_text(text, ctx.mode, ctx.instructions)
                    .await?
            }
        };

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Planner;
    use crate::test_support::RecordingProvider;
    use docflow_llm::{LlmError, OfflineProvider};
    use docflow_utils::types::{DocumentInput, RewriteMode, TaskRequest};

    async fn run_single(
        provider: Arc<dyn GenerationProvider>,
        request: &TaskRequest,
    ) -> Result<String, TaskError> {
        let ctx = AgentContext::new("req", request);
        let plan = Planner::new().plan(&ctx);
        Executor::new(provider).execute(&plan[0], &ctx).await
    }

    #[tokio::test]
    async fn test_summarize_calls_provider() {
        let request = TaskRequest::summarize(vec![DocumentInput::new("1", "T", "hello world")]);
        let out = run_single(Arc::new(OfflineProvider::new()), &request)
            .await
            .unwrap();
        assert_eq!(out, "T: hello world");
    }

    #[tokio::test]
    async fn test_missing_text_fails_before_provider_call() {
        let recorder = Arc::new(RecordingProvider::succeeding("unused"));
        let mut request = TaskRequest::rewrite("x", Some(RewriteMode::Shorter));

        request.text = None;
        let err = run_single(recorder.clone(), &request).await.unwrap_err();
        assert!(matches!(err, TaskError::InvalidInput(_)));

        request.text = Some("   ".to_string());
        let err = run_single(recorder.clone(), &request).await.unwrap_err();
        assert!(matches!(err, TaskError::InvalidInput(_)));

        assert_eq!(recorder.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_is_wrapped_unchanged() {
        let failure = LlmError::HttpStatus {
            provider: "stub".to_string(),
            status: 500,
            message: "boom".to_string(),
        };
        let recorder = Arc::new(RecordingProvider::failing(failure.clone()));
        let request = TaskRequest::rewrite("hello", None);

        let err = run_single(recorder.clone(), &request).await.unwrap_err();
        assert_eq!(err, TaskError::Upstream(failure));
        assert_eq!(recorder.calls(), 1);
    }
}
