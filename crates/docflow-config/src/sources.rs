use std::collections::BTreeMap;

use super::{Config, ConfigSource};

fn source_label(source: Option<&ConfigSource>) -> String {
    source.copied().unwrap_or(ConfigSource::Default).to_string()
}

impl Config {
    /// Effective configuration as `key -> (value, source)`, sorted by key.
    ///
    /// Credentials are never included; `openai.api_key` and
    /// `gemini.api_key` only report whether one was resolved.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add_config = |key: &str, value: String| {
            let source = source_label(self.source_attribution.get(key));
            config.insert(key.to_string(), (value, source));
        };

        add_config("provider", self.provider_name().to_string());
        add_config(
            "fallback_provider",
            self.fallback_provider_name().unwrap_or("none").to_string(),
        );
        add_config("openai.api_key_env", self.openai_api_key_env().to_string());
        add_config("openai.base_url", self.openai_base_url().to_string());
        add_config("openai.model", self.openai_model().to_string());
        add_config(
            "openai.timeout_ms",
            self.openai_timeout().as_millis().to_string(),
        );
        add_config("openai.max_tokens", self.openai_max_tokens().to_string());
        add_config("openai.temperature", self.openai_temperature().to_string());
        add_config("gemini.api_key_env", self.gemini_api_key_env().to_string());
        add_config("gemini.base_url", self.gemini_base_url().to_string());
        add_config("gemini.model", self.gemini_model().to_string());
        add_config(
            "gemini.timeout_ms",
            self.gemini_timeout().as_millis().to_string(),
        );
        add_config("gemini.max_tokens", self.gemini_max_tokens().to_string());
        add_config("gemini.temperature", self.gemini_temperature().to_string());

        for (key, secret) in [
            ("openai.api_key", &self.credentials.openai_api_key),
            ("gemini.api_key", &self.credentials.gemini_api_key),
        ] {
            let state = if secret.is_some() { "set" } else { "unset" };
            config.insert(
                key.to_string(),
                (state.to_string(), ConfigSource::Env.to_string()),
            );
        }

        config
    }
}
