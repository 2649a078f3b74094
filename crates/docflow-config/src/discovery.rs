use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{
    CliArgs, Config, ConfigError, ConfigSource, Credentials, DEFAULT_GEMINI_API_KEY_ENV,
    GEMINI_API_KEY_ENV_ALIAS, LlmConfig, ProviderKind, RemoteProviderConfig,
};

/// Directory searched for upward from the working directory
pub const CONFIG_DIR_NAME: &str = ".docflow";

/// File name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "DOCFLOW_CONFIG";

const ENV_PROVIDER: &str = "LLM_PROVIDER";
const ENV_MODEL: &str = "OPENAI_MODEL";
const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
/// Applies to every remote provider
const ENV_TIMEOUT_MS: &str = "LLM_TIMEOUT_MS";

/// Keys tracked for source attribution
pub(crate) const TRACKED_KEYS: &[&str] = &[
    "provider",
    "fallback_provider",
    "openai.api_key_env",
    "openai.base_url",
    "openai.model",
    "openai.timeout_ms",
    "openai.max_tokens",
    "openai.temperature",
    "gemini.api_key_env",
    "gemini.base_url",
    "gemini.model",
    "gemini.timeout_ms",
    "gemini.max_tokens",
    "gemini.temperature",
];

/// TOML configuration file structure
#[derive(Debug, Deserialize, Serialize)]
struct TomlConfig {
    llm: Option<LlmConfig>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed, an
    /// environment override is malformed, or the result fails validation.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir()?;
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::discover_with(&start_dir, cli_args, &env)
    }

    /// Discover configuration from an explicit directory and environment map
    ///
    /// This is the variant used by tests to avoid process-global state.
    ///
    /// # Errors
    ///
    /// See [`Config::discover`].
    pub fn discover_with(
        start_dir: &Path,
        cli_args: &CliArgs,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut source_attribution: HashMap<String, ConfigSource> = TRACKED_KEYS
            .iter()
            .map(|key| ((*key).to_string(), ConfigSource::Default))
            .collect();
        let mut llm = LlmConfig::default();

        let config_path = match &cli_args.config_path {
            Some(explicit) => Some(explicit.clone()),
            None => match non_empty(env, CONFIG_PATH_ENV) {
                Some(from_env) => Some(PathBuf::from(from_env)),
                None => Self::discover_config_file_from(start_dir),
            },
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading config file");
            let file_config = Self::load_config_file(path)?;
            if let Some(file_llm) = file_config.llm {
                apply_llm_layer(&mut llm, file_llm, ConfigSource::Config, &mut source_attribution);
            }
        }

        apply_env(&mut llm, env, &mut source_attribution)?;

        if let Some(provider) = &cli_args.provider {
            llm.provider = Some(provider.clone());
            source_attribution.insert("provider".to_string(), ConfigSource::Cli);
        }
        if let Some(model) = &cli_args.model {
            // --model targets the selected remote provider
            let gemini_selected = llm
                .provider
                .as_deref()
                .is_some_and(|name| ProviderKind::parse(name).ok() == Some(ProviderKind::Gemini));
            let (section, key) = if gemini_selected {
                (llm.gemini_mut(), "gemini.model")
            } else {
                (llm.openai_mut(), "openai.model")
            };
            section.model = Some(model.clone());
            source_attribution.insert(key.to_string(), ConfigSource::Cli);
        }

        let mut config = Config {
            llm,
            credentials: Credentials::default(),
            source_attribution,
            config_path,
        };
        config.credentials.openai_api_key =
            non_empty(env, config.openai_api_key_env()).map(str::to_string);
        config.credentials.gemini_api_key = resolve_gemini_key(&config, env);

        config.validate()?;
        Ok(config)
    }

    /// Search upward from `start_dir` for `.docflow/config.toml`
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidFile(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))
    }
}

fn non_empty<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// The configured key variable, then `GOOGLE_API_KEY` when the default
/// variable is in use.
fn resolve_gemini_key(config: &Config, env: &HashMap<String, String>) -> Option<String> {
    let key_env = config.gemini_api_key_env();
    non_empty(env, key_env)
        .or_else(|| {
            (key_env == DEFAULT_GEMINI_API_KEY_ENV)
                .then(|| non_empty(env, GEMINI_API_KEY_ENV_ALIAS))
                .flatten()
        })
        .map(str::to_string)
}

/// Overlay every value set in `layer` onto `llm`, recording its source.
pub(crate) fn apply_llm_layer(
    llm: &mut LlmConfig,
    layer: LlmConfig,
    source: ConfigSource,
    attribution: &mut HashMap<String, ConfigSource>,
) {
    let mut set = |key: &str| {
        attribution.insert(key.to_string(), source);
    };

    if layer.provider.is_some() {
        llm.provider = layer.provider;
        set("provider");
    }
    if layer.fallback_provider.is_some() {
        llm.fallback_provider = layer.fallback_provider;
        set("fallback_provider");
    }
    if let Some(openai) = layer.openai {
        apply_remote_layer(llm.openai_mut(), openai, "openai", &mut set);
    }
    if let Some(gemini) = layer.gemini {
        apply_remote_layer(llm.gemini_mut(), gemini, "gemini", &mut set);
    }
}

fn apply_remote_layer(
    target: &mut RemoteProviderConfig,
    layer: RemoteProviderConfig,
    prefix: &str,
    set: &mut impl FnMut(&str),
) {
    let mut mark = |field: &str| set(&format!("{prefix}.{field}"));

    if layer.api_key_env.is_some() {
        target.api_key_env = layer.api_key_env;
        mark("api_key_env");
    }
    if layer.base_url.is_some() {
        target.base_url = layer.base_url;
        mark("base_url");
    }
    if layer.model.is_some() {
        target.model = layer.model;
        mark("model");
    }
    if layer.timeout_ms.is_some() {
        target.timeout_ms = layer.timeout_ms;
        mark("timeout_ms");
    }
    if layer.max_tokens.is_some() {
        target.max_tokens = layer.max_tokens;
        mark("max_tokens");
    }
    if layer.temperature.is_some() {
        target.temperature = layer.temperature;
        mark("temperature");
    }
}

fn apply_env(
    llm: &mut LlmConfig,
    env: &HashMap<String, String>,
    attribution: &mut HashMap<String, ConfigSource>,
) -> Result<(), ConfigError> {
    let mut layer = LlmConfig {
        provider: non_empty(env, ENV_PROVIDER).map(str::to_string),
        ..LlmConfig::default()
    };

    if let Some(model) = non_empty(env, ENV_MODEL) {
        layer.openai_mut().model = Some(model.to_string());
    }
    if let Some(base_url) = non_empty(env, ENV_BASE_URL) {
        layer.openai_mut().base_url = Some(base_url.to_string());
    }
    if let Some(model) = non_empty(env, ENV_GEMINI_MODEL) {
        layer.gemini_mut().model = Some(model.to_string());
    }
    if let Some(base_url) = non_empty(env, ENV_GEMINI_BASE_URL) {
        layer.gemini_mut().base_url = Some(base_url.to_string());
    }
    if let Some(raw) = non_empty(env, ENV_TIMEOUT_MS) {
        let parsed = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
            key: ENV_TIMEOUT_MS.to_string(),
            value: format!("'{raw}' is not a whole number of milliseconds"),
        })?;
        layer.openai_mut().timeout_ms = Some(parsed);
        layer.gemini_mut().timeout_ms = Some(parsed);
    }

    apply_llm_layer(llm, layer, ConfigSource::Env, attribution);
    Ok(())
}
