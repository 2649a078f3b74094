//! Configuration resolution against the real process environment
//!
//! These tests mutate environment variables and are serialised.

use serial_test::serial;
use std::env;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use docflow::{CliArgs, Config, ConfigError, ConfigSource, from_config_with_fallback};

const VARS: &[&str] = &[
    "LLM_PROVIDER",
    "OPENAI_API_KEY",
    "OPENAI_MODEL",
    "OPENAI_BASE_URL",
    "GEMINI_API_KEY",
    "GOOGLE_API_KEY",
    "GEMINI_MODEL",
    "GEMINI_BASE_URL",
    "LLM_TIMEOUT_MS",
    "DOCFLOW_CONFIG",
];

/// Clears the provider variables on creation and again on drop.
struct EnvGuard;

impl EnvGuard {
    fn new() -> Self {
        clear();
        Self
    }

    fn set(&self, key: &str, value: &str) {
        unsafe {
            env::set_var(key, value);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        clear();
    }
}

fn clear() {
    for var in VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

fn write_config(temp: &TempDir, body: &str) -> String {
    let path = temp.path().join("docflow.toml");
    fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
#[serial]
fn env_overrides_file_and_cli_overrides_env() {
    let guard = EnvGuard::new();
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "[llm]\nprovider = \"openai\"\n[llm.openai]\nmodel = \"from-file\"\ntimeout_ms = 1000\n",
    );
    guard.set("DOCFLOW_CONFIG", &path);
    guard.set("OPENAI_MODEL", "from-env");
    guard.set("LLM_TIMEOUT_MS", "2500");

    let cli_args = CliArgs {
        provider: Some("offline".to_string()),
        ..CliArgs::default()
    };
    let config = Config::discover(&cli_args).unwrap();

    assert_eq!(config.provider_name(), "offline");
    assert_eq!(config.source_attribution["provider"], ConfigSource::Cli);
    assert_eq!(config.openai_model(), "from-env");
    assert_eq!(config.source_attribution["openai.model"], ConfigSource::Env);
    assert_eq!(config.openai_timeout(), Duration::from_millis(2500));
    assert_eq!(
        config.config_path.as_deref().map(|p| p.to_string_lossy().into_owned()),
        Some(path)
    );
}

#[test]
#[serial]
fn provider_selected_from_env_with_credential() {
    let guard = EnvGuard::new();
    guard.set("LLM_PROVIDER", "openai");
    guard.set("OPENAI_API_KEY", "sk-env-key");

    let config = Config::discover(&CliArgs::default()).unwrap();
    let (provider, fallback) = from_config_with_fallback(&config).unwrap();

    assert_eq!(provider.name(), "openai");
    assert!(fallback.is_none());
}

#[test]
#[serial]
fn missing_credential_falls_back_to_offline() {
    let guard = EnvGuard::new();
    guard.set("LLM_PROVIDER", "openai");

    let config = Config::discover(&CliArgs::default()).unwrap();
    let (provider, fallback) = from_config_with_fallback(&config).unwrap();

    assert_eq!(provider.name(), "offline");
    assert_eq!(fallback.unwrap().primary_provider, "openai");
}

#[test]
#[serial]
fn gemini_selected_from_google_key_alias() {
    let guard = EnvGuard::new();
    guard.set("LLM_PROVIDER", "gemini");
    guard.set("GOOGLE_API_KEY", "AIza-alias");
    guard.set("GEMINI_MODEL", "gemini-2.5-pro");

    let config = Config::discover(&CliArgs::default()).unwrap();
    assert_eq!(config.credentials.gemini_api_key.as_deref(), Some("AIza-alias"));
    assert_eq!(config.gemini_model(), "gemini-2.5-pro");
    assert_eq!(config.source_attribution["gemini.model"], ConfigSource::Env);

    let (provider, fallback) = from_config_with_fallback(&config).unwrap();
    assert_eq!(provider.name(), "gemini");
    assert!(fallback.is_none());
}

#[test]
#[serial]
fn gemini_without_key_falls_back_to_offline() {
    let guard = EnvGuard::new();
    guard.set("LLM_PROVIDER", "gemini");
    guard.set("OPENAI_API_KEY", "sk-not-for-gemini");

    let config = Config::discover(&CliArgs::default()).unwrap();
    let (provider, fallback) = from_config_with_fallback(&config).unwrap();

    assert_eq!(provider.name(), "offline");
    assert_eq!(fallback.unwrap().primary_provider, "gemini");
}

#[test]
#[serial]
fn custom_key_env_is_honoured() {
    let guard = EnvGuard::new();
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "[llm]\nprovider = \"openai\"\n[llm.openai]\napi_key_env = \"DOCFLOW_TEST_KEY\"\n",
    );
    guard.set("DOCFLOW_CONFIG", &path);
    guard.set("DOCFLOW_TEST_KEY", "sk-custom");

    let config = Config::discover(&CliArgs::default()).unwrap();
    assert_eq!(config.credentials.openai_api_key.as_deref(), Some("sk-custom"));

    unsafe {
        env::remove_var("DOCFLOW_TEST_KEY");
    }
}

#[test]
#[serial]
fn invalid_file_is_reported() {
    let guard = EnvGuard::new();
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[llm\nprovider = ");
    guard.set("DOCFLOW_CONFIG", &path);

    let err = Config::discover(&CliArgs::default()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFile(_)));
}
