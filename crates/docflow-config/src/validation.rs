use super::{Config, ConfigError, FALLBACK_DISABLED, ProviderKind, RemoteProviderConfig};

/// Upper bound for the remote request timeout (10 minutes)
const MAX_TIMEOUT_MS: u64 = 600_000;

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.provider_kind()?;

        if let Some(fallback) = self.llm.fallback_provider.as_deref()
            && fallback != FALLBACK_DISABLED
        {
            ProviderKind::parse(fallback).map_err(|_| ConfigError::InvalidValue {
                key: "fallback_provider".to_string(),
                value: format!("unknown provider '{fallback}' (expected offline, openai, gemini or none)"),
            })?;
        }

        for (prefix, section) in self.llm.remote_sections() {
            if let Some(section) = section {
                validate_remote(prefix, section)?;
            }
        }

        Ok(())
    }
}

/// Check one `[llm.<prefix>]` section.
fn validate_remote(prefix: &str, section: &RemoteProviderConfig) -> Result<(), ConfigError> {
    let key = |field: &str| format!("{prefix}.{field}");

    if let Some(timeout_ms) = section.timeout_ms {
        if timeout_ms == 0 {
            return Err(invalid(&key("timeout_ms"), "must be greater than 0"));
        }
        if timeout_ms > MAX_TIMEOUT_MS {
            return Err(invalid(
                &key("timeout_ms"),
                "exceeds maximum limit of 600000 ms (10 minutes)",
            ));
        }
    }

    if section.max_tokens == Some(0) {
        return Err(invalid(&key("max_tokens"), "must be greater than 0"));
    }

    if let Some(temperature) = section.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        return Err(invalid(&key("temperature"), "must be between 0.0 and 2.0"));
    }

    if let Some(base_url) = section.base_url.as_deref()
        && !(base_url.starts_with("https://") || base_url.starts_with("http://"))
    {
        return Err(invalid(&key("base_url"), "must start with http:// or https://"));
    }

    if let Some(model) = section.model.as_deref()
        && model.trim().is_empty()
    {
        return Err(invalid(&key("model"), "must not be empty"));
    }

    Ok(())
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeminiConfig, OpenAiConfig};

    fn with_openai(openai: OpenAiConfig) -> Config {
        let mut config = Config::minimal_for_testing();
        config.llm.openai = Some(openai);
        config
    }

    fn rejected_key(config: &Config) -> String {
        match config.validate() {
            Err(ConfigError::InvalidValue { key, .. }) => key,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_config_is_valid() {
        assert!(Config::minimal_for_testing().validate().is_ok());
    }

    #[test]
    fn test_timeout_bounds() {
        let zero = with_openai(OpenAiConfig {
            timeout_ms: Some(0),
            ..OpenAiConfig::default()
        });
        assert_eq!(rejected_key(&zero), "openai.timeout_ms");

        let huge = with_openai(OpenAiConfig {
            timeout_ms: Some(MAX_TIMEOUT_MS + 1),
            ..OpenAiConfig::default()
        });
        assert_eq!(rejected_key(&huge), "openai.timeout_ms");
    }

    #[test]
    fn test_temperature_range() {
        let hot = with_openai(OpenAiConfig {
            temperature: Some(2.5),
            ..OpenAiConfig::default()
        });
        assert_eq!(rejected_key(&hot), "openai.temperature");
    }

    #[test]
    fn test_base_url_scheme() {
        let ftp = with_openai(OpenAiConfig {
            base_url: Some("ftp://example.com".to_string()),
            ..OpenAiConfig::default()
        });
        assert_eq!(rejected_key(&ftp), "openai.base_url");
    }

    #[test]
    fn test_unknown_fallback_provider() {
        let mut config = Config::minimal_for_testing();
        config.llm.fallback_provider = Some("anthropic".to_string());
        assert_eq!(rejected_key(&config), "fallback_provider");
    }

    #[test]
    fn test_gemini_is_a_valid_provider_and_fallback() {
        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("gemini".to_string());
        config.llm.fallback_provider = Some("gemini".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gemini_section_is_validated() {
        let mut config = Config::minimal_for_testing();
        config.llm.gemini = Some(GeminiConfig {
            max_tokens: Some(0),
            ..GeminiConfig::default()
        });
        assert_eq!(rejected_key(&config), "gemini.max_tokens");
    }
}
