use serde::{Deserialize, Serialize};

/// The high-level operation a caller asks for.
///
/// # Example
///
/// ```rust
/// use docflow_utils::types::TaskKind;
///
/// assert_eq!(TaskKind::Summarize.as_str(), "summarize");
/// let json = serde_json::to_string(&TaskKind::Rewrite).unwrap();
/// assert_eq!(json, r#""rewrite""#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Condense a set of documents.
    Summarize,
    /// Transform a single span of text.
    Rewrite,
}

impl TaskKind {
    /// Returns the wire representation of the task.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Rewrite => "rewrite",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrite style applied by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
    /// Replace stock phrasing with plainer words.
    Simplify,
    /// Elevate the tone.
    Professional,
    /// Reduce the length to a fixed fraction of the input.
    Shorter,
}

impl RewriteMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Simplify => "simplify",
            Self::Professional => "professional",
            Self::Shorter => "shorter",
        }
    }
}

impl std::fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RewriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simplify" => Ok(Self::Simplify),
            "professional" => Ok(Self::Professional),
            "shorter" => Ok(Self::Shorter),
            other => Err(format!(
                "unknown rewrite mode '{other}' (expected simplify, professional, or shorter)"
            )),
        }
    }
}

/// Role of the agent that carries out a plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Planner,
    Executor,
    Critic,
}

/// Which part of the request a step reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputRef {
    Documents,
    Text,
}

/// A document submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Unique within a single request.
    pub id: String,
    pub title: String,
    pub content: String,
}

impl DocumentInput {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A summarize or rewrite request as received at the boundary.
///
/// `rewrite` requires non-empty `text`; `summarize` requires at least one
/// document. The orchestrator does not enforce either rule itself: the
/// executor rejects a rewrite without text, and boundary layers call
/// [`TaskRequest::validate`] before running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub task: TaskKind,
    #[serde(default)]
    pub documents: Vec<DocumentInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<RewriteMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_critic: Option<bool>,
}

impl TaskRequest {
    /// Create a summarize request over the given documents.
    #[must_use]
    pub fn summarize(documents: Vec<DocumentInput>) -> Self {
        Self {
            task: TaskKind::Summarize,
            documents,
            text: None,
            mode: None,
            instructions: None,
            enable_critic: None,
        }
    }

    /// Create a rewrite request for a span of text.
    #[must_use]
    pub fn rewrite(text: impl Into<String>, mode: Option<RewriteMode>) -> Self {
        Self {
            task: TaskKind::Rewrite,
            documents: Vec::new(),
            text: Some(text.into()),
            mode,
            instructions: None,
            enable_critic: None,
        }
    }

    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    #[must_use]
    pub fn with_critic(mut self, enabled: bool) -> Self {
        self.enable_critic = Some(enabled);
        self
    }

    /// Whether the critic pass was explicitly requested.
    #[must_use]
    pub fn critic_enabled(&self) -> bool {
        self.enable_critic.unwrap_or(false)
    }

    /// Check the task-shape invariants.
    ///
    /// # Errors
    ///
    /// Returns `missing_documents` for a summarize request without documents
    /// and `missing_text` for a rewrite request whose text is absent or blank.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        match self.task {
            TaskKind::Summarize if self.documents.is_empty() => Err(RequestValidationError::new(
                "missing_documents",
                "at least one document is required for summarize",
            )),
            TaskKind::Rewrite if !has_text(self.text.as_deref()) => Err(
                RequestValidationError::new("missing_text", "text is required for rewrite"),
            ),
            _ => Ok(()),
        }
    }
}

/// True when `text` is present and not blank.
#[must_use]
pub fn has_text(text: Option<&str>) -> bool {
    text.is_some_and(|t| !t.trim().is_empty())
}

/// Boundary-level validation failure with a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RequestValidationError {
    pub code: String,
    pub message: String,
}

impl RequestValidationError {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// One atomic action in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    /// Derived from the task and the step ordinal, e.g. `summarize-step-1`.
    pub id: String,
    pub role: AgentRole,
    pub action: TaskKind,
    pub input_ref: InputRef,
}

/// Provenance attached to every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub provider: String,
    pub execution_time_ms: u64,
    pub request_id: String,
    pub critic_enabled: bool,
}

/// Terminal artifact of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub result: String,
    pub plan: Vec<PlanStep>,
    pub metadata: ResponseMetadata,
}

/// Source of a configuration value.
///
/// Used for source attribution in `docflow config` output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value read from an environment variable.
    Env,
    /// Value loaded from configuration file.
    Config,
    /// Value provided programmatically (e.g., `Config::builder()`).
    Programmatic,
    /// Built-in default value (lowest precedence).
    Default,
}

impl ConfigSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Env => "env",
            Self::Config => "config",
            Self::Programmatic => "programmatic",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
