//! Error taxonomy for docflow
//!
//! A run can fail in exactly two ways: the request has the wrong shape for
//! its task ([`TaskError::InvalidInput`]) or the generation backend failed
//! ([`TaskError::Upstream`]). Configuration problems are reported before any
//! run starts and never surface from the orchestrator.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::exit_codes::ExitCode;
use crate::types::RequestValidationError;

/// Failures raised by a generation provider.
///
/// Every runtime variant belongs to the upstream class of errors; the
/// `Misconfiguration` and `Unsupported` variants only occur while a provider
/// is being constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Transport-level failure (DNS, connect, TLS, broken connection)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured client timeout
    #[error("Timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// The backend answered with a non-success status
    #[error("{provider} request failed with status {status}: {message}")]
    HttpStatus {
        provider: String,
        status: u16,
        message: String,
    },

    /// The backend answered 2xx but the payload could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The backend answered 2xx with no usable text
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// Configuration error
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// Unsupported provider
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl LlmError {
    /// Backend status code, when the failure carried one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Coarse category used in structured logs.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Timeout { .. } => "timeout",
            Self::HttpStatus { status, .. } => match status {
                401 | 403 => "auth",
                429 => "rate_limit",
                500..=599 => "server",
                _ => "client",
            },
            Self::MalformedResponse(_) => "malformed",
            Self::EmptyResponse(_) => "empty",
            Self::Misconfiguration(_) | Self::Unsupported(_) => "config",
        }
    }
}

/// Errors a single orchestration run can return.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskError {
    /// Task-shape violation detected before any provider call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generation backend failure
    #[error("Upstream error: {0}")]
    Upstream(#[from] LlmError),
}

impl TaskError {
    /// Stable machine-readable code for boundary layers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Upstream(_) => "upstream_error",
        }
    }

    /// True when the caller, not the backend, is at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error type for the docflow library and CLI
#[derive(Error, Debug)]
pub enum DocflowError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("Invalid request: {0}")]
    Validation(#[from] RequestValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider setup failed: {0}")]
    Provider(LlmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocflowError {
    /// Map this error to the process exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Task(TaskError::InvalidInput(_)) | Self::Validation(_) | Self::Json(_) => {
                ExitCode::INVALID_INPUT
            }
            Self::Task(TaskError::Upstream(_)) => ExitCode::UPSTREAM_FAILURE,
            Self::Config(_) | Self::Provider(_) => ExitCode::CLI_ARGS,
            Self::Io(_) => ExitCode::INTERNAL,
        }
    }

    /// Stable machine-readable code for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Task(err) => err.code().to_string(),
            Self::Validation(err) => err.code.clone(),
            Self::Config(_) | Self::Provider(_) => "configuration_error".to_string(),
            Self::Json(_) => "invalid_payload".to_string(),
            Self::Io(_) => "internal_error".to_string(),
        }
    }
}

/// Trait for providing user-friendly error reporting with suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;
}

impl UserFriendlyError for LlmError {
    fn user_message(&self) -> String {
        match self {
            Self::Transport(msg) => format!("Could not reach the generation backend: {msg}"),
            Self::Timeout { duration } => {
                format!("The generation backend did not answer within {duration:?}")
            }
            Self::HttpStatus {
                provider, status, ..
            } => format!("{provider} rejected the request with status {status}"),
            Self::MalformedResponse(msg) => {
                format!("The generation backend returned an unreadable payload: {msg}")
            }
            Self::EmptyResponse(msg) => {
                format!("The generation backend returned no text: {msg}")
            }
            Self::Misconfiguration(msg) => format!("Provider configuration error: {msg}"),
            Self::Unsupported(msg) => format!("Provider not supported: {msg}"),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self.category() {
            "auth" => vec![
                "Check that the API key environment variable holds a valid key".to_string(),
            ],
            "rate_limit" => vec!["Wait a moment and try again".to_string()],
            "transport" | "timeout" => vec![
                "Check network connectivity and the configured base_url".to_string(),
                "Increase [llm.openai] timeout_ms if the backend is slow".to_string(),
            ],
            "config" => vec![
                "Run `docflow config` to inspect the effective configuration".to_string(),
                "Use --provider offline to run without a remote backend".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

impl UserFriendlyError for TaskError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => format!("The request is incomplete: {msg}"),
            Self::Upstream(err) => err.user_message(),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput(_) => vec![
                "rewrite needs --text; summarize needs at least one document".to_string(),
            ],
            Self::Upstream(err) => err.suggestions(),
        }
    }
}

/// Machine-readable error body printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Envelope wrapping [`ErrorBody`] as `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                request_id,
            },
        }
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error.code, self.error.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> LlmError {
        LlmError::HttpStatus {
            provider: "openai".to_string(),
            status,
            message: String::new(),
        }
    }

    #[test]
    fn test_http_status_categories() {
        assert_eq!(status(401).category(), "auth");
        assert_eq!(status(403).category(), "auth");
        assert_eq!(status(429).category(), "rate_limit");
        assert_eq!(status(503).category(), "server");
        assert_eq!(status(404).category(), "client");
        assert_eq!(status(502).status(), Some(502));
        assert_eq!(LlmError::Transport("x".into()).status(), None);
    }

    #[test]
    fn test_task_error_codes() {
        assert_eq!(TaskError::InvalidInput("x".into()).code(), "invalid_input");
        let upstream: TaskError = status(500).into();
        assert_eq!(upstream.code(), "upstream_error");
        assert!(!upstream.is_client_error());
    }

    #[test]
    fn test_exit_code_mapping() {
        let invalid = DocflowError::Task(TaskError::InvalidInput("x".into()));
        assert_eq!(invalid.to_exit_code(), ExitCode::INVALID_INPUT);

        let upstream = DocflowError::Task(TaskError::Upstream(status(500)));
        assert_eq!(upstream.to_exit_code(), ExitCode::UPSTREAM_FAILURE);

        let config = DocflowError::Config(ConfigError::InvalidFile("bad".into()));
        assert_eq!(config.to_exit_code(), ExitCode::CLI_ARGS);
        assert_eq!(config.code(), "configuration_error");
    }

    #[test]
    fn test_validation_error_keeps_its_code() {
        let err = DocflowError::Validation(RequestValidationError::new("missing_text", "m"));
        assert_eq!(err.code(), "missing_text");
        assert_eq!(err.to_exit_code(), ExitCode::INVALID_INPUT);
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = ErrorEnvelope::new("invalid_input", "text required", Some("r1".into()));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["error"]["code"], "invalid_input");
        assert_eq!(value["error"]["requestId"], "r1");

        let anonymous = ErrorEnvelope::new("internal_error", "boom", None);
        let value = serde_json::to_value(&anonymous).unwrap();
        assert!(value["error"].get("requestId").is_none());
    }

    #[test]
    fn test_auth_failures_suggest_checking_key() {
        let suggestions = status(401).suggestions();
        assert!(suggestions.iter().any(|s| s.contains("API key")));
    }
}
