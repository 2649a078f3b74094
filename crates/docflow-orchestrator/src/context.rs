use docflow_utils::types::{DocumentInput, RewriteMode, TaskKind, TaskRequest};

/// Read-only view of one request, shared by the planner, executor and critic.
///
/// Borrows from the [`TaskRequest`]; nothing is copied and nothing outlives
/// the run.
#[derive(Debug, Clone, Copy)]
pub struct AgentContext<'a> {
    pub request_id: &'a str,
    pub task: TaskKind,
    pub documents: &'a [DocumentInput],
    pub text: Option<&'a str>,
    pub mode: Option<RewriteMode>,
    pub instructions: Option<&'a str>,
    pub enable_critic: bool,
}

impl<'a> AgentContext<'a> {
    #[must_use]
    pub fn new(request_id: &'a str, request: &'a TaskRequest) -> Self {
        Self {
            request_id,
            task: request.task,
            documents: &request.documents,
            text: request.text.as_deref(),
            mode: request.mode,
            instructions: request.instructions.as_deref(),
            enable_critic: request.critic_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_borrows_request_fields() {
        let request = TaskRequest::rewrite("hello", Some(RewriteMode::Simplify))
            .with_instructions("plain")
            .with_critic(true);
        let ctx = AgentContext::new("req-1", &request);

        assert_eq!(ctx.request_id, "req-1");
        assert_eq!(ctx.task, TaskKind::Rewrite);
        assert_eq!(ctx.text, Some("hello"));
        assert_eq!(ctx.mode, Some(RewriteMode::Simplify));
        assert_eq!(ctx.instructions, Some("plain"));
        assert!(ctx.enable_critic);
        assert!(ctx.documents.is_empty());
    }
}
