//! Command implementations
//!
//! Each command returns a serializable value or a [`DocflowError`]; printing
//! and exit codes are handled by `run`.

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::{
    Config, DocflowError, DocumentInput, Orchestrator, ProviderCapabilities, RewriteMode,
    TaskRequest, TaskResponse,
};

use super::args::TaskOptions;

/// Build a summarize request from CLI flags. Missing content yields an
/// empty document list, which validation reports as `missing_documents`.
pub(crate) fn summarize_request(
    content: Option<String>,
    title: String,
    id: String,
    options: &TaskOptions,
) -> TaskRequest {
    let documents = content
        .map(|content| vec![DocumentInput::new(id, title, content)])
        .unwrap_or_default();
    apply_options(TaskRequest::summarize(documents), options)
}

pub(crate) fn rewrite_request(
    text: Option<String>,
    mode: Option<RewriteMode>,
    options: &TaskOptions,
) -> TaskRequest {
    let mut request = TaskRequest::rewrite(String::new(), mode);
    request.text = text;
    apply_options(request, options)
}

fn apply_options(request: TaskRequest, options: &TaskOptions) -> TaskRequest {
    let request = request.with_critic(options.critic);
    match options.instructions.as_deref() {
        Some(instructions) => request.with_instructions(instructions),
        None => request,
    }
}

/// Parse a JSON task request from a file, or from stdin when `source` is `-`.
///
/// # Errors
///
/// Returns `DocflowError::Io` if the source cannot be read and
/// `DocflowError::Json` if it is not a valid request.
pub(crate) fn read_request(source: &str) -> Result<TaskRequest, DocflowError> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(Path::new(source))?
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Validate `request`, construct the configured provider and run it.
///
/// # Errors
///
/// - `DocflowError::Validation` if the request has the wrong shape
/// - `DocflowError::Provider` if no provider can be constructed
/// - `DocflowError::Task` if the run fails
pub async fn execute_task(
    config: &Config,
    request_id: &str,
    request: &TaskRequest,
) -> Result<TaskResponse, DocflowError> {
    request.validate()?;

    let provider = crate::from_config(config).map_err(DocflowError::Provider)?;
    debug!(
        request_id = request_id,
        provider = provider.name(),
        "Running task"
    );

    let orchestrator = Orchestrator::new(provider);
    Ok(orchestrator.run(request_id, request).await?)
}

/// Report requested versus active provider.
///
/// # Errors
///
/// Returns `DocflowError::Provider` if neither the primary nor the fallback
/// provider can be constructed.
pub fn capabilities(config: &Config) -> Result<ProviderCapabilities, DocflowError> {
    let (provider, fallback) =
        crate::from_config_with_fallback(config).map_err(DocflowError::Provider)?;
    Ok(ProviderCapabilities::new(
        config.provider_name(),
        provider.as_ref(),
        fallback.as_ref(),
    ))
}

/// Effective configuration as JSON: `{ "configPath": ..., "values": { key: { value, source } } }`.
pub fn effective_config_json(config: &Config) -> Value {
    let values: Map<String, Value> = config
        .effective_config()
        .into_iter()
        .map(|(key, (value, source))| (key, json!({ "value": value, "source": source })))
        .collect();

    json!({
        "configPath": config.config_path.as_ref().map(|p| p.display().to_string()),
        "values": values,
    })
}
