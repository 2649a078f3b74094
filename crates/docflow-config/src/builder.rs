use std::collections::HashMap;
use std::time::Duration;

use super::discovery::{TRACKED_KEYS, apply_llm_layer};
use super::{Config, ConfigError, ConfigSource, Credentials, LlmConfig, OpenAiConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding docflow: nothing is read from the environment
    /// or from config files.
    ///
    /// # Example
    ///
    /// ```rust
    /// use docflow_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .provider("openai")
    ///     .openai_model("gpt-4o-mini")
    ///     .openai_api_key("sk-test")
    ///     .timeout(Duration::from_secs(5))
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.provider_name(), "openai");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration of docflow.
///
/// All values set via the builder are attributed to
/// `ConfigSource::Programmatic`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    llm: LlmConfig,
    credentials: Credentials,
}

impl ConfigBuilder {
    /// Create a new `ConfigBuilder` with no values set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider name: `offline`, `openai` or `gemini`.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.llm.provider = Some(provider.into());
        self
    }

    /// Fallback provider name, or `"none"` to disable fallback.
    #[must_use]
    pub fn fallback_provider(mut self, provider: impl Into<String>) -> Self {
        self.llm.fallback_provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn openai_model(mut self, model: impl Into<String>) -> Self {
        self.openai().model = Some(model.into());
        self
    }

    #[must_use]
    pub fn openai_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openai().base_url = Some(base_url.into());
        self
    }

    /// Name of the environment variable the key would normally come from.
    /// Informational only for builder-made configs.
    #[must_use]
    pub fn openai_api_key_env(mut self, env_var: impl Into<String>) -> Self {
        self.openai().api_key_env = Some(env_var.into());
        self
    }

    /// Supply the credential directly.
    #[must_use]
    pub fn openai_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.credentials.openai_api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.llm.gemini_mut().model = Some(model.into());
        self
    }

    /// Base of the models endpoint, e.g. a local stub server.
    #[must_use]
    pub fn gemini_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.llm.gemini_mut().base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn gemini_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.credentials.gemini_api_key = Some(api_key.into());
        self
    }

    /// Per-request timeout for every remote provider.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self.openai().timeout_ms = timeout_ms;
        self.llm.gemini_mut().timeout_ms = timeout_ms;
        self
    }

    /// Output token limit for every remote provider.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.openai().max_tokens = Some(max_tokens);
        self.llm.gemini_mut().max_tokens = Some(max_tokens);
        self
    }

    /// Sampling temperature for every remote provider.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.openai().temperature = Some(temperature);
        self.llm.gemini_mut().temperature = Some(temperature);
        self
    }

    fn openai(&mut self) -> &mut OpenAiConfig {
        self.llm.openai_mut()
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is out of range.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut source_attribution: HashMap<String, ConfigSource> = TRACKED_KEYS
            .iter()
            .map(|key| ((*key).to_string(), ConfigSource::Default))
            .collect();
        let mut llm = LlmConfig::default();
        apply_llm_layer(
            &mut llm,
            self.llm,
            ConfigSource::Programmatic,
            &mut source_attribution,
        );

        let config = Config {
            llm,
            credentials: self.credentials,
            source_attribution,
            config_path: None,
        };
        config.validate()?;
        Ok(config)
    }
}
