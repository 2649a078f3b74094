//! Logging and observability infrastructure for docflow
//!
//! All output from this module goes to stderr so that stdout stays reserved
//! for JSON responses.

use std::time::Duration;
use tracing::{Level, error, info, span};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::redaction::redact_error_message;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

const DEFAULT_DIRECTIVES: &str =
    "docflow=info,docflow_utils=info,docflow_orchestrator=info,docflow_llm=info,warn";
const VERBOSE_DIRECTIVES: &str =
    "docflow=debug,docflow_utils=debug,docflow_orchestrator=debug,docflow_llm=debug,warn";

/// Build the default filter: `RUST_LOG` wins, otherwise docflow crates log
/// at info (debug when verbose) and everything else at warn.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new(VERBOSE_DIRECTIVES)
            } else {
                EnvFilter::try_new(DEFAULT_DIRECTIVES)
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize the tracing subscriber.
///
/// # Errors
///
/// Fails if a global subscriber has already been installed.
pub fn init_tracing(
    verbose: bool,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = tracing_subscriber::registry().with(env_filter(verbose));

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true),
            )
            .try_init()?,
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbose)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .try_init()?,
    }

    Ok(())
}

/// Span wrapping one orchestration run.
#[must_use]
pub fn request_span(request_id: &str, task: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "orchestrate",
        request_id = %request_id,
        task = %task,
    )
}

/// Log a completed run.
pub fn log_run_complete(
    request_id: &str,
    provider: &str,
    steps: usize,
    critic_enabled: bool,
    duration: Duration,
) {
    info!(
        request_id = %request_id,
        provider = %provider,
        steps = steps,
        critic_enabled = critic_enabled,
        duration_ms = duration_millis(duration),
        "Orchestration completed"
    );
}

/// Log a failed run; the error text is redacted first.
pub fn log_run_error(request_id: &str, error_code: &str, error: &str, duration: Duration) {
    let sanitized = redact_error_message(error);
    error!(
        request_id = %request_id,
        error_code = %error_code,
        duration_ms = duration_millis(duration),
        error = %sanitized,
        "Orchestration failed"
    );
}

/// Saturating conversion of a duration to whole milliseconds.
#[must_use]
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
