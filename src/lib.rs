//! docflow - document summarize/rewrite orchestration
//!
//! A request (summarize a set of documents, or rewrite a span of text) is
//! routed through a fixed plan: the Planner emits steps, the Executor runs
//! each one against a pluggable text-generation provider, and an optional
//! Critic annotates results that look too thin. The response carries the
//! result, the plan, and provenance metadata.
//!
//! docflow can be used in two ways:
//! - **CLI**: `docflow summarize`, `docflow rewrite`, `docflow run`
//! - **Library**: build a provider and drive an [`Orchestrator`] directly
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! docflow --provider offline summarize --title T --content "hello world"
//! docflow rewrite --text "short" --mode shorter --critic
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust
//! use std::sync::Arc;
//! use docflow::{OfflineProvider, Orchestrator, RewriteMode, TaskRequest};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let orchestrator = Orchestrator::new(Arc::new(OfflineProvider::new()));
//! let request = TaskRequest::rewrite("short", Some(RewriteMode::Shorter));
//! let response = orchestrator.run("req-1", &request).await.unwrap();
//! assert_eq!(response.result, "sho");
//! # });
//! ```
//!
//! # Stable Public API
//!
//! - [`TaskRequest`], [`TaskResponse`] and the types they are built from
//! - [`Orchestrator`] and the [`GenerationProvider`] trait
//! - [`Config`] and [`ConfigBuilder`] with [`from_config_with_fallback`]
//! - [`DocflowError`], [`TaskError`], [`LlmError`] and [`ExitCode`]

pub mod cli;

// ============================================================================
// Request and response model
// ============================================================================

pub use docflow_utils::types::{
    AgentRole, DocumentInput, InputRef, PlanStep, RequestValidationError, ResponseMetadata,
    RewriteMode, TaskKind, TaskRequest, TaskResponse,
};

// ============================================================================
// Pipeline
// ============================================================================

pub use docflow_orchestrator::{AgentContext, Critic, Executor, Orchestrator, Planner};

/// Text-generation capability the Executor calls through.
///
/// Implement this trait to plug in another backend; the built-in
/// implementations are [`OfflineProvider`], [`OpenAiProvider`] and
/// [`GeminiProvider`].
pub use docflow_llm::GenerationProvider;

pub use docflow_llm::{
    GeminiProvider, GenerationParams, ObservedProvider, OfflineProvider, OpenAiProvider,
    ProviderCapabilities, ProviderFallbackInfo, from_config, from_config_with_fallback,
};

/// Per-call provider counters and latency histograms.
pub use docflow_llm::{CallStats, ProviderCallKey, ProviderMetrics};

// ============================================================================
// Configuration
// ============================================================================

/// Resolved configuration.
///
/// Use [`Config::discover()`] for CLI-like behavior (file, environment and
/// flags) or [`Config::builder()`] for programmatic configuration.
pub use docflow_config::Config;

pub use docflow_config::{CliArgs, ConfigBuilder, ConfigSource};

// ============================================================================
// Errors and exit codes
// ============================================================================

pub use docflow_utils::error::{
    ConfigError, DocflowError, ErrorBody, ErrorEnvelope, LlmError, TaskError, UserFriendlyError,
};

/// Exit codes matching the documented exit code table.
pub use docflow_utils::exit_codes::ExitCode;
