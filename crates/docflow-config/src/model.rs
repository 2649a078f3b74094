use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use docflow_utils::error::ConfigError;
use docflow_utils::types::ConfigSource;

/// Provider used when nothing is configured
pub const DEFAULT_PROVIDER: &str = "offline";

/// Provider used when the primary cannot be constructed
pub const DEFAULT_FALLBACK_PROVIDER: &str = "offline";

/// Value of `fallback_provider` that disables fallback
pub const FALLBACK_DISABLED: &str = "none";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Read when the default Gemini key variable is unset
pub const GEMINI_API_KEY_ENV_ALIAS: &str = "GOOGLE_API_KEY";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Generation backends docflow can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Deterministic local provider, no network access
    Offline,
    /// OpenAI-compatible chat-completions API
    OpenAi,
    /// Google Gemini `generateContent` API
    Gemini,
}

impl ProviderKind {
    /// Parse a configured provider name. `mock` is accepted for `offline`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unknown names.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "offline" | "mock" => Ok(Self::Offline),
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(ConfigError::InvalidValue {
                key: "provider".to_string(),
                value: format!("unknown provider '{other}' (expected offline, openai or gemini)"),
            }),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for docflow.
///
/// # Configuration File Format
///
/// ```toml
/// [llm]
/// provider = "openai"
/// fallback_provider = "offline"
///
/// [llm.openai]
/// api_key_env = "OPENAI_API_KEY"
/// model = "gpt-4o-mini"
/// timeout_ms = 15000
///
/// [llm.gemini]
/// model = "gemini-2.5-flash"
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider configuration.
    pub llm: LlmConfig,
    /// Secrets resolved from the environment during discovery.
    pub credentials: Credentials,
    /// Source attribution for each setting (for `docflow config`).
    pub source_attribution: HashMap<String, ConfigSource>,
    /// Config file that was loaded, if any.
    pub config_path: Option<PathBuf>,
}

/// `[llm]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmConfig {
    /// `offline` (alias `mock`), `openai` or `gemini`
    pub provider: Option<String>,
    /// Provider to construct if `provider` fails; `"none"` disables fallback
    pub fallback_provider: Option<String>,
    pub openai: Option<OpenAiConfig>,
    pub gemini: Option<GeminiConfig>,
}

/// Settings shared by the remote provider sections.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RemoteProviderConfig {
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_ms: Option<u64>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// `[llm.openai]` section
pub type OpenAiConfig = RemoteProviderConfig;

/// `[llm.gemini]` section
pub type GeminiConfig = RemoteProviderConfig;

impl LlmConfig {
    pub(crate) fn openai_mut(&mut self) -> &mut OpenAiConfig {
        self.openai.get_or_insert_with(OpenAiConfig::default)
    }

    pub(crate) fn gemini_mut(&mut self) -> &mut GeminiConfig {
        self.gemini.get_or_insert_with(GeminiConfig::default)
    }

    /// Remote sections with their attribution prefixes.
    pub(crate) fn remote_sections(&self) -> [(&'static str, Option<&RemoteProviderConfig>); 2] {
        [("openai", self.openai.as_ref()), ("gemini", self.gemini.as_ref())]
    }
}

/// Secrets resolved once at startup. Never serialized; `Debug` hides values.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

fn redacted(secret: Option<&String>) -> Option<&'static str> {
    secret.map(|_| "[REDACTED]")
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &redacted(self.openai_api_key.as_ref()))
            .field("gemini_api_key", &redacted(self.gemini_api_key.as_ref()))
            .finish()
    }
}
