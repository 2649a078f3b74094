//! Request orchestration for docflow
//!
//! A run goes Planner → Executor (per step) → optional Critic. Each run
//! builds its own [`AgentContext`] borrowed from the request; the only
//! shared state is the provider handed to [`Orchestrator::new`].

mod context;
mod critic;
mod executor;
mod orchestrator;
mod planner;

#[cfg(test)]
mod test_support;

pub use context::AgentContext;
pub use critic::{CRITIC_ADVISORY, CRITIC_MIN_CHARS, Critic};
pub use executor::Executor;
pub use orchestrator::Orchestrator;
pub use planner::Planner;
