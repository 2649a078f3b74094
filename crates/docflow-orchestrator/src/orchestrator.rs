//! Orchestrator
//!
//! Composes planner, executor and the optional critic for one request and
//! assembles the response envelope. Errors from any step end the run and are
//! returned as-is; there is no retry and no partial result.

use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::context::AgentContext;
use crate::critic::Critic;
use crate::executor::Executor;
use crate::planner::Planner;
use docflow_llm::GenerationProvider;
use docflow_utils::error::TaskError;
use docflow_utils::logging::{duration_millis, log_run_complete, log_run_error, request_span};
use docflow_utils::types::{ResponseMetadata, TaskRequest, TaskResponse};

pub struct Orchestrator {
    provider: Arc<dyn GenerationProvider>,
    planner: Planner,
    executor: Executor,
    critic: Critic,
}

impl Orchestrator {
    #[must_use]
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            executor: Executor::new(Arc::clone(&provider)),
            provider,
            planner: Planner::new(),
            critic: Critic::new(),
        }
    }

    /// Name of the provider results are attributed to.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run `request` end to end.
    ///
    /// # Errors
    ///
    /// - `TaskError::InvalidInput` if a rewrite has no text
    /// - `TaskError::Upstream` if the provider fails
    pub async fn run(
        &self,
        request_id: &str,
        request: &TaskRequest,
    ) -> Result<TaskResponse, TaskError> {
        let span = request_span(request_id, request.task.as_str());
        self.run_inner(request_id, request).instrument(span).await
    }

    async fn run_inner(
        &self,
        request_id: &str,
        request: &TaskRequest,
    ) -> Result<TaskResponse, TaskError> {
        let started = Instant::now();
        let ctx = AgentContext::new(request_id, request);
        let plan = self.planner.plan(&ctx);

        let mut result = String::new();
        for step in &plan {
            match self.executor.execute(step, &ctx).await {
                Ok(output) => result = output,
                Err(err) => {
                    log_run_error(request_id, err.code(), &err.to_string(), started.elapsed());
                    return Err(err);
                }
            }
        }

        if ctx.enable_critic {
            result = self.critic.review(&result);
        }

        let elapsed = started.elapsed();
        log_run_complete(
            request_id,
            self.provider.name(),
            plan.len(),
            ctx.enable_critic,
            elapsed,
        );

        Ok(TaskResponse {
            result,
            plan,
            metadata: ResponseMetadata {
                provider: self.provider.name().to_string(),
                execution_time_ms: duration_millis(elapsed),
                request_id: request_id.to_string(),
                critic_enabled: ctx.enable_critic,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critic::CRITIC_ADVISORY;
    use crate::test_support::RecordingProvider;
    use docflow_llm::{LlmError, OfflineProvider};
    use docflow_utils::types::{DocumentInput, InputRef, RewriteMode, TaskKind};

    fn offline() -> Orchestrator {
        Orchestrator::new(Arc::new(OfflineProvider::new()))
    }

    #[tokio::test]
    async fn test_summarize_without_critic() {
        let request = TaskRequest::summarize(vec![DocumentInput::new("1", "T", "hello world")])
            .with_critic(false);
        let response = offline().run("req-a", &request).await.unwrap();

        assert_eq!(response.result, "T: hello world");
        assert_eq!(response.plan.len(), 1);
        assert_eq!(response.plan[0].action, TaskKind::Summarize);
        assert_eq!(response.plan[0].input_ref, InputRef::Documents);
        assert_eq!(response.metadata.provider, "offline");
        assert_eq!(response.metadata.request_id, "req-a");
        assert!(!response.metadata.critic_enabled);
    }

    #[tokio::test]
    async fn test_rewrite_shorter_with_critic() {
        let request =
            TaskRequest::rewrite("short", Some(RewriteMode::Shorter)).with_critic(true);
        let response = offline().run("req-b", &request).await.unwrap();

        assert_eq!(response.result, format!("sho{CRITIC_ADVISORY}"));
        assert!(response.metadata.critic_enabled);
    }

    #[tokio::test]
    async fn test_critic_absent_flag_means_disabled() {
        let mut request = TaskRequest::rewrite("short", Some(RewriteMode::Shorter));
        request.enable_critic = None;
        let response = offline().run("r", &request).await.unwrap();

        assert_eq!(response.result, "sho");
        assert!(!response.metadata.critic_enabled);
    }

    #[tokio::test]
    async fn test_invalid_input_skips_provider() {
        let recorder = Arc::new(RecordingProvider::succeeding("unused"));
        let orchestrator = Orchestrator::new(recorder.clone());
        let mut request = TaskRequest::rewrite("x", None);
        request.text = None;

        let err = orchestrator.run("req-c", &request).await.unwrap_err();
        assert!(matches!(err, TaskError::InvalidInput(_)));
        assert_eq!(recorder.calls(), 0);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates_and_skips_critic() {
        let failure = LlmError::EmptyResponse("nothing".to_string());
        let recorder = Arc::new(RecordingProvider::failing(failure.clone()));
        let orchestrator = Orchestrator::new(recorder.clone());
        let request = TaskRequest::rewrite("hello", None).with_critic(true);

        let err = orchestrator.run("r", &request).await.unwrap_err();
        assert_eq!(err, TaskError::Upstream(failure));
        assert_eq!(recorder.calls(), 1);
    }

    #[tokio::test]
    async fn test_metadata_names_injected_provider() {
        let orchestrator = Orchestrator::new(Arc::new(RecordingProvider::succeeding(
            "a long enough generated result",
        )));
        let request = TaskRequest::rewrite("hello", None).with_critic(true);
        let response = orchestrator.run("r", &request).await.unwrap();

        assert_eq!(orchestrator.provider_name(), "recording");
        assert_eq!(response.metadata.provider, "recording");
        assert_eq!(response.result, "a long enough generated result");
    }
}
