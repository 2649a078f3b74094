//! Text-generation providers for docflow
//!
//! The orchestrator talks to a single [`GenerationProvider`] chosen once at
//! startup by [`from_config_with_fallback`]. Three providers exist: a
//! deterministic offline provider, an OpenAI-compatible remote provider and
//! a Google Gemini remote provider. Whichever is selected is wrapped in
//! [`ObservedProvider`] so every call is logged and counted the same way.

mod gemini_provider;
mod http_client;
mod metrics;
mod observed_provider;
mod offline_provider;
mod openai_provider;
mod prompts;
mod types;

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use docflow_config::{Config, ProviderKind};
use docflow_utils::redaction::redact_error_message;

pub use docflow_utils::error::LlmError;
pub use gemini_provider::{GEMINI_PROVIDER_NAME, GeminiProvider};
pub use metrics::{
    CallStats, DURATION_BUCKETS_SECONDS, NO_ERROR_CATEGORY, ProviderCallKey, ProviderMetrics,
};
pub use observed_provider::ObservedProvider;
pub use offline_provider::{
    INSTRUCTION_NOTE, OFFLINE_PROVIDER_NAME, OfflineProvider, PROFESSIONAL_PREFIX,
    SUMMARY_ELLIPSIS, SUMMARY_MAX_CHARS,
};
pub use openai_provider::{OPENAI_PROVIDER_NAME, OpenAiProvider};
pub use prompts::{rewrite_prompt, summary_prompt};
pub use types::{GenerationParams, GenerationProvider, ProviderOperation};

/// Records that the configured provider could not be built and another one
/// was used instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFallbackInfo {
    pub primary_provider: String,
    pub fallback_provider: String,
    /// Redacted construction error of the primary provider
    pub reason: String,
}

/// Runtime view of provider selection, printed by `docflow capabilities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCapabilities {
    pub requested_provider: String,
    pub active_provider: String,
    pub provider_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    /// Critic review is always available
    pub critic: bool,
}

impl ProviderCapabilities {
    #[must_use]
    pub fn new(
        requested_provider: impl Into<String>,
        provider: &dyn GenerationProvider,
        fallback: Option<&ProviderFallbackInfo>,
    ) -> Self {
        Self {
            requested_provider: requested_provider.into(),
            active_provider: provider.name().to_string(),
            provider_fallback: fallback.is_some(),
            fallback_reason: fallback.map(|info| info.reason.clone()),
            critic: true,
        }
    }
}

/// Build the unwrapped provider for `name`.
///
/// # Errors
///
/// - `LlmError::Unsupported` for unknown provider names
/// - `LlmError::Misconfiguration` when the provider cannot be constructed
fn construct_provider(
    name: &str,
    config: &Config,
) -> Result<Box<dyn GenerationProvider>, LlmError> {
    let kind = ProviderKind::parse(name).map_err(|_| {
        LlmError::Unsupported(format!(
            "Unknown provider '{name}'. Supported providers: offline, openai, gemini"
        ))
    })?;

    match kind {
        ProviderKind::Offline => Ok(Box::new(OfflineProvider::new())),
        ProviderKind::OpenAi => Ok(Box::new(OpenAiProvider::new_from_config(config)?)),
        ProviderKind::Gemini => Ok(Box::new(GeminiProvider::new_from_config(config)?)),
    }
}

fn observed(provider: Box<dyn GenerationProvider>) -> Arc<dyn GenerationProvider> {
    Arc::new(ObservedProvider::new(provider))
}

/// Construct the configured provider, falling back when the primary one
/// cannot be built.
///
/// Fallback only covers construction failures such as a missing credential.
/// Unknown provider names are reported as `LlmError::Unsupported` and runtime
/// failures are never handled here.
///
/// # Errors
///
/// Returns the primary provider's error if it cannot be built and no
/// fallback is configured, or the fallback cannot be built either.
pub fn from_config_with_fallback(
    config: &Config,
) -> Result<(Arc<dyn GenerationProvider>, Option<ProviderFallbackInfo>), LlmError> {
    let provider = config.provider_name();

    let primary_error = match construct_provider(provider, config) {
        Ok(primary) => {
            info!(provider = primary.name(), "Generation provider selected");
            return Ok((observed(primary), None));
        }
        Err(err @ LlmError::Unsupported(_)) => return Err(err),
        Err(err) => err,
    };

    let Some(fallback_provider) = config.fallback_provider_name() else {
        return Err(primary_error);
    };

    let reason = redact_error_message(&primary_error.to_string());
    warn!(
        primary_provider = provider,
        fallback_provider = fallback_provider,
        reason = %reason,
        "Primary provider could not be constructed, using fallback"
    );

    match construct_provider(fallback_provider, config) {
        Ok(fallback) => Ok((
            observed(fallback),
            Some(ProviderFallbackInfo {
                primary_provider: provider.to_string(),
                fallback_provider: fallback_provider.to_string(),
                reason,
            }),
        )),
        Err(fallback_error) => {
            warn!(
                fallback_provider = fallback_provider,
                error = %redact_error_message(&fallback_error.to_string()),
                "Fallback provider also failed"
            );
            Err(primary_error)
        }
    }
}

/// Construct the configured provider, discarding fallback information.
///
/// # Errors
///
/// See [`from_config_with_fallback`].
pub fn from_config(config: &Config) -> Result<Arc<dyn GenerationProvider>, LlmError> {
    let (provider, _fallback_info) = from_config_with_fallback(config)?;
    Ok(provider)
}
