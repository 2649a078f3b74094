//! Planner
//!
//! Turns a context into an ordered list of steps. Today every plan has a
//! single executor step; the orchestrator consumes the list left to right so
//! longer plans need no change there.

use tracing::debug;

use crate::context::AgentContext;
use docflow_utils::types::{AgentRole, InputRef, PlanStep, TaskKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct Planner;

impl Planner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the plan for `ctx`. Pure: the same task always yields the same
    /// step ids.
    #[must_use]
    pub fn plan(&self, ctx: &AgentContext<'_>) -> Vec<PlanStep> {
        let input_ref = match ctx.task {
            TaskKind::Summarize => InputRef::Documents,
            TaskKind::Rewrite => InputRef::Text,
        };

        let steps = vec![PlanStep {
            id: step_id(ctx.task, 1),
            role: AgentRole::Executor,
            action: ctx.task,
            input_ref,
        }];

        debug!(
            request_id = ctx.request_id,
            steps = steps.len(),
            "Plan built"
        );
        steps
    }
}

fn step_id(task: TaskKind, ordinal: usize) -> String {
    format!("{task}-step-{ordinal}")
}
