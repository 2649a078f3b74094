//! Configuration management for docflow
//!
//! Configuration is resolved once at process start with precedence
//! CLI > environment > file > defaults, validated, and then handed to the
//! provider factory as an immutable value. Nothing downstream reads the
//! environment again.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use discovery::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_PATH_ENV};
pub use docflow_utils::error::ConfigError;
pub use docflow_utils::types::ConfigSource;
pub use model::*;

use std::time::Duration;

impl Config {
    /// Provider requested by configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the name is not a known provider.
    pub fn provider_kind(&self) -> Result<ProviderKind, ConfigError> {
        ProviderKind::parse(self.provider_name())
    }

    /// Raw provider name, defaulting to `offline`.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.llm.provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    /// Provider to fall back to when the primary cannot be constructed.
    ///
    /// `None` when fallback is disabled with `fallback_provider = "none"`.
    #[must_use]
    pub fn fallback_provider_name(&self) -> Option<&str> {
        match self
            .llm
            .fallback_provider
            .as_deref()
            .unwrap_or(DEFAULT_FALLBACK_PROVIDER)
        {
            FALLBACK_DISABLED => None,
            name => Some(name),
        }
    }

    /// Model for the OpenAI provider.
    #[must_use]
    pub fn openai_model(&self) -> &str {
        remote_str(self.llm.openai.as_ref(), |o| o.model.as_deref(), DEFAULT_OPENAI_MODEL)
    }

    /// Chat-completions endpoint for the OpenAI provider.
    #[must_use]
    pub fn openai_base_url(&self) -> &str {
        remote_str(
            self.llm.openai.as_ref(),
            |o| o.base_url.as_deref(),
            DEFAULT_OPENAI_BASE_URL,
        )
    }

    /// Environment variable the credential was (or would be) read from.
    #[must_use]
    pub fn openai_api_key_env(&self) -> &str {
        remote_str(
            self.llm.openai.as_ref(),
            |o| o.api_key_env.as_deref(),
            DEFAULT_OPENAI_API_KEY_ENV,
        )
    }

    /// Per-request timeout for the OpenAI provider.
    #[must_use]
    pub fn openai_timeout(&self) -> Duration {
        remote_timeout(self.llm.openai.as_ref())
    }

    #[must_use]
    pub fn openai_max_tokens(&self) -> u32 {
        remote_max_tokens(self.llm.openai.as_ref())
    }

    #[must_use]
    pub fn openai_temperature(&self) -> f32 {
        remote_temperature(self.llm.openai.as_ref())
    }

    /// Model for the Gemini provider.
    #[must_use]
    pub fn gemini_model(&self) -> &str {
        remote_str(self.llm.gemini.as_ref(), |g| g.model.as_deref(), DEFAULT_GEMINI_MODEL)
    }

    /// Base of the Gemini models endpoint; `/{model}:generateContent` is appended.
    #[must_use]
    pub fn gemini_base_url(&self) -> &str {
        remote_str(
            self.llm.gemini.as_ref(),
            |g| g.base_url.as_deref(),
            DEFAULT_GEMINI_BASE_URL,
        )
    }

    /// Environment variable the Gemini credential is read from.
    ///
    /// With the default variable, `GOOGLE_API_KEY` is consulted as well.
    #[must_use]
    pub fn gemini_api_key_env(&self) -> &str {
        remote_str(
            self.llm.gemini.as_ref(),
            |g| g.api_key_env.as_deref(),
            DEFAULT_GEMINI_API_KEY_ENV,
        )
    }

    #[must_use]
    pub fn gemini_timeout(&self) -> Duration {
        remote_timeout(self.llm.gemini.as_ref())
    }

    #[must_use]
    pub fn gemini_max_tokens(&self) -> u32 {
        remote_max_tokens(self.llm.gemini.as_ref())
    }

    #[must_use]
    pub fn gemini_temperature(&self) -> f32 {
        remote_temperature(self.llm.gemini.as_ref())
    }

    /// Create a minimal configuration for testing.
    ///
    /// Uses the offline provider with no credentials and no file source.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        Self {
            llm: LlmConfig::default(),
            credentials: Credentials::default(),
            source_attribution: std::collections::HashMap::new(),
            config_path: None,
        }
    }
}

fn remote_str<'a>(
    section: Option<&'a RemoteProviderConfig>,
    field: impl Fn(&'a RemoteProviderConfig) -> Option<&'a str>,
    default: &'a str,
) -> &'a str {
    section.and_then(field).unwrap_or(default)
}

fn remote_timeout(section: Option<&RemoteProviderConfig>) -> Duration {
    Duration::from_millis(section.and_then(|s| s.timeout_ms).unwrap_or(DEFAULT_TIMEOUT_MS))
}

fn remote_max_tokens(section: Option<&RemoteProviderConfig>) -> u32 {
    section.and_then(|s| s.max_tokens).unwrap_or(DEFAULT_MAX_TOKENS)
}

fn remote_temperature(section: Option<&RemoteProviderConfig>) -> f32 {
    section.and_then(|s| s.temperature).unwrap_or(DEFAULT_TEMPERATURE)
}
