//! OpenAI-compatible chat-completions provider
//!
//! Builds a single user-message prompt per operation, sends it once, and
//! returns the trimmed text of the first choice.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::LlmError;
use crate::http_client::{HttpClient, RequestAuth};
use crate::prompts::{rewrite_prompt, summary_prompt};
use crate::types::{GenerationParams, GenerationProvider};
use docflow_config::Config;
use docflow_utils::types::{DocumentInput, RewriteMode};

/// Provider name reported in response metadata
pub const OPENAI_PROVIDER_NAME: &str = "openai";

#[derive(Clone)]
pub struct OpenAiProvider {
    client: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
    params: GenerationParams,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl OpenAiProvider {
    /// Create a provider talking to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        params: GenerationParams,
        timeout: std::time::Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: HttpClient::new(timeout)?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            params,
        })
    }

    /// Create a provider from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if no credential was resolved or
    /// the HTTP client cannot be constructed.
    pub fn new_from_config(config: &Config) -> Result<Self, LlmError> {
        let api_key = config
            .credentials
            .openai_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Misconfiguration(format!(
                    "OpenAI API key not found in environment variable '{}'. \
                     Set this variable or configure a different api_key_env in [llm.openai].",
                    config.openai_api_key_env()
                ))
            })?;

        Self::new(
            api_key,
            config.openai_base_url(),
            config.openai_model(),
            GenerationParams {
                max_tokens: config.openai_max_tokens(),
                temperature: config.openai_temperature(),
            },
            config.openai_timeout(),
        )
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: String) -> Result<String, LlmError> {
        debug!(
            provider = OPENAI_PROVIDER_NAME,
            model = %self.model,
            max_tokens = self.params.max_tokens,
            temperature = self.params.temperature,
            "Invoking chat completion"
        );

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
        };

        let body = self
            .client
            .post_json(
                &self.base_url,
                RequestAuth::Bearer(&self.api_key),
                &request,
                OPENAI_PROVIDER_NAME,
            )
            .await?;

        extract_content(&body)
    }
}

/// Pull the first choice's text out of a chat-completions payload.
pub(crate) fn extract_content(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        LlmError::MalformedResponse(format!("Failed to parse {OPENAI_PROVIDER_NAME} response: {e}"))
    })?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(LlmError::EmptyResponse(format!(
            "{OPENAI_PROVIDER_NAME} response had no content in choices[0]"
        )));
    }
    Ok(content)
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    fn name(&self) -> &str {
        OPENAI_PROVIDER_NAME
    }

    async fn generate_summary(
        &self,
        documents: &[DocumentInput],
        instructions: Option<&str>,
    ) -> Result<String, LlmError> {
        self.complete(summary_prompt(documents, instructions)).await
    }

    async fn rewrite_text(
        &self,
        text: &str,
        mode: Option<RewriteMode>,
        instructions: Option<&str>,
    ) -> Result<String, LlmError> {
        self.complete(rewrite_prompt(text, mode, instructions)).await
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_extract_content_trims_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  done \n"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "done");
    }

    #[test]
    fn test_extract_content_errors() {
        assert!(matches!(
            extract_content("not json"),
            Err(LlmError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_content(r#"{"choices":[]}"#),
            Err(LlmError::EmptyResponse(_))
        ));
        assert!(matches!(
            extract_content(r#"{"choices":[{"message":{"content":"   "}}]}"#),
            Err(LlmError::EmptyResponse(_))
        ));
        assert!(matches!(
            extract_content(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(LlmError::EmptyResponse(_))
        ));
    }

    #[test]
    fn test_new_from_config_requires_credential() {
        let config = Config::builder().provider("openai").build().unwrap();
        let err = OpenAiProvider::new_from_config(&config).unwrap_err();
        match err {
            LlmError::Misconfiguration(msg) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("expected Misconfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_new_from_config_reads_params() {
        let config = Config::builder()
            .provider("openai")
            .openai_api_key("sk-test")
            .openai_model("gpt-4o")
            .max_tokens(256)
            .temperature(0.7)
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap();
        let provider = OpenAiProvider::new_from_config(&config).unwrap();
        assert_eq!(provider.model(), "gpt-4o");
        assert_eq!(provider.params.max_tokens, 256);
        assert!((provider.params.temperature - 0.7).abs() < f32::EPSILON);
        assert!(!format!("{provider:?}").contains("sk-test"));
    }
}
