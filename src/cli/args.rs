//! CLI argument definitions
//!
//! This module defines the command-line interface structure using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docflow_utils::logging::LogFormat;
use docflow_utils::types::RewriteMode;

/// docflow - summarize and rewrite documents through a pluggable provider
#[derive(Debug, Parser)]
#[command(name = "docflow")]
#[command(about = "Summarize or rewrite text through a planner, executor and critic pipeline")]
#[command(long_about = r#"
docflow routes a summarize or rewrite request through a single-step plan,
invokes the configured text-generation provider, optionally appends a critic
note, and prints the result with its plan and provenance as JSON.

EXAMPLES:
  # Summarize one document with the offline provider
  docflow --provider offline summarize --title Notes --content "hello world"

  # Rewrite text in the shorter style with critic review
  docflow rewrite --text "We utilize many tools" --mode shorter --critic

  # Run a JSON request from a file or stdin
  docflow run --request request.json
  echo '{"task":"rewrite","text":"hi"}' | docflow run

  # Print provider call metrics (Prometheus text) on stderr afterwards
  docflow --metrics rewrite --text "hello" --mode shorter

  # Show which provider is active and the effective configuration
  docflow capabilities
  docflow config

CONFIGURATION:
  Precedence: CLI flags > environment > config file > defaults
  The config file is discovered by searching upward for .docflow/config.toml
  Environment: LLM_PROVIDER, OPENAI_MODEL, OPENAI_BASE_URL, GEMINI_MODEL,
  GEMINI_BASE_URL, LLM_TIMEOUT_MS, DOCFLOW_CONFIG, and the API key variables
  named by api_key_env in [llm.openai] and [llm.gemini]. Gemini also reads
  GOOGLE_API_KEY when GEMINI_API_KEY is unset.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Generation provider: offline, openai or gemini
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Model used by the selected remote provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format on stderr
    #[arg(long, global = true, default_value = "text", value_parser = parse_log_format)]
    pub log_format: LogFormat,

    /// Print provider call metrics on stderr after the command
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize a single document
    Summarize {
        /// Document body
        #[arg(long)]
        content: Option<String>,

        /// Document title
        #[arg(long, default_value = "Document")]
        title: String,

        /// Document identifier
        #[arg(long, default_value = "1")]
        id: String,

        #[command(flatten)]
        options: TaskOptions,
    },

    /// Rewrite a span of text
    Rewrite {
        /// Text to rewrite
        #[arg(long)]
        text: Option<String>,

        /// Rewrite style
        #[arg(long, value_parser = parse_rewrite_mode)]
        mode: Option<RewriteMode>,

        #[command(flatten)]
        options: TaskOptions,
    },

    /// Run a JSON task request
    Run {
        /// Path to the request file, or `-` for stdin
        #[arg(long, default_value = "-")]
        request: String,

        /// Correlation id (generated when absent)
        #[arg(long)]
        request_id: Option<String>,
    },

    /// Show requested and active provider
    Capabilities,

    /// Show the effective configuration and where each value came from
    Config,
}

/// Options shared by `summarize` and `rewrite`.
#[derive(Debug, Clone, clap::Args)]
pub struct TaskOptions {
    /// Free-form guidance for the provider
    #[arg(long)]
    pub instructions: Option<String>,

    /// Run the critic over the result
    #[arg(long)]
    pub critic: bool,

    /// Correlation id (generated when absent)
    #[arg(long)]
    pub request_id: Option<String>,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse()
}

fn parse_rewrite_mode(value: &str) -> Result<RewriteMode, String> {
    value.parse()
}
