//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, initializes logging, resolves configuration,
//! dispatches to a command and owns ALL output: JSON results and error
//! envelopes on stdout, diagnostics and `--metrics` output on stderr.

use clap::Parser;
use serde::Serialize;
use uuid::Uuid;

use super::args::{Cli, Commands};
use super::commands;

use crate::{
    CliArgs, Config, DocflowError, ErrorEnvelope, ExitCode, ProviderMetrics, UserFriendlyError,
};
use docflow_utils::logging::init_tracing;
use docflow_utils::redaction::redact_error_message;

/// Main CLI execution function.
///
/// Returns `Err(ExitCode)` after the error has already been printed; main.rs
/// only maps it to the process exit status.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose, cli.log_format) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        provider: cli.provider.clone(),
        model: cli.model.clone(),
    };

    let config =
        Config::discover(&cli_args).map_err(|e| report(&DocflowError::from(e), None))?;

    let rt = tokio::runtime::Runtime::new().map_err(|e| {
        eprintln!("Failed to create async runtime: {e}");
        ExitCode::INTERNAL
    })?;

    let outcome = match cli.command {
        Commands::Summarize {
            content,
            title,
            id,
            options,
        } => {
            let request_id = request_id_or_new(options.request_id.clone());
            let request = commands::summarize_request(content, title, id, &options);
            let result = rt.block_on(commands::execute_task(&config, &request_id, &request));
            emit(result, Some(&request_id))
        }
        Commands::Rewrite {
            text,
            mode,
            options,
        } => {
            let request_id = request_id_or_new(options.request_id.clone());
            let request = commands::rewrite_request(text, mode, &options);
            let result = rt.block_on(commands::execute_task(&config, &request_id, &request));
            emit(result, Some(&request_id))
        }
        Commands::Run {
            request,
            request_id,
        } => {
            let request_id = request_id_or_new(request_id);
            let result = match commands::read_request(&request) {
                Ok(request) => rt.block_on(commands::execute_task(&config, &request_id, &request)),
                Err(e) => Err(e),
            };
            emit(result, Some(&request_id))
        }
        Commands::Capabilities => emit(commands::capabilities(&config), None),
        Commands::Config => emit(Ok(commands::effective_config_json(&config)), None),
    };

    if cli.metrics {
        eprint!("{}", ProviderMetrics::global().render_prometheus());
    }

    outcome
}

/// Use the supplied correlation id, or generate a UUID v4.
fn request_id_or_new(request_id: Option<String>) -> String {
    request_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn emit<T: Serialize>(
    result: Result<T, DocflowError>,
    request_id: Option<&str>,
) -> Result<(), ExitCode> {
    match result {
        Ok(value) => print_json(&value).map_err(|e| report(&e, request_id)),
        Err(e) => Err(report(&e, request_id)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), DocflowError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

/// Print the error envelope on stdout and guidance on stderr; return the
/// exit code for the failure.
fn report(error: &DocflowError, request_id: Option<&str>) -> ExitCode {
    let envelope = ErrorEnvelope::new(
        error.code(),
        redact_error_message(&error.to_string()),
        request_id.map(str::to_string),
    );
    match serde_json::to_string_pretty(&envelope) {
        Ok(rendered) => println!("{rendered}"),
        Err(_) => println!("{envelope}"),
    }

    let friendly: Option<(String, Vec<String>)> = match error {
        DocflowError::Task(task) => Some((task.user_message(), task.suggestions())),
        DocflowError::Provider(llm) => Some((llm.user_message(), llm.suggestions())),
        _ => None,
    };
    if let Some((message, suggestions)) = friendly {
        eprintln!("Error: {}", redact_error_message(&message));
        for suggestion in suggestions {
            eprintln!("  - {suggestion}");
        }
    }

    error.to_exit_code()
}
