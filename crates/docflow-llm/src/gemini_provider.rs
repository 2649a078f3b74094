//! Google Gemini `generateContent` provider
//!
//! Same shape as the OpenAI provider: one user turn per operation, sent
//! once, with the text parts of the first candidate joined and trimmed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::LlmError;
use crate::http_client::{HttpClient, RequestAuth};
use crate::prompts::{rewrite_prompt, summary_prompt};
use crate::types::{GenerationParams, GenerationProvider};
use docflow_config::{Config, GEMINI_API_KEY_ENV_ALIAS};
use docflow_utils::types::{DocumentInput, RewriteMode};

/// Provider name reported in response metadata
pub const GEMINI_PROVIDER_NAME: &str = "gemini";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    client: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
    params: GenerationParams,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Create a provider whose model endpoints live under `base_url`.
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
            .gemini_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Misconfiguration(format!(
                    "Gemini API key not found in environment variable '{}' or '{GEMINI_API_KEY_ENV_ALIAS}'. \
                     Set one of them or configure a different api_key_env in [llm.gemini].",
                    config.gemini_api_key_env()
                ))
            })?;

        Self::new(
            api_key,
            config.gemini_base_url(),
            config.gemini_model(),
            GenerationParams {
                max_tokens: config.gemini_max_tokens(),
                temperature: config.gemini_temperature(),
            },
            config.gemini_timeout(),
        )
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// `{base_url}/{model}:generateContent`
    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn complete(&self, prompt: String) -> Result<String, LlmError> {
        debug!(
            provider = GEMINI_PROVIDER_NAME,
            model = %self.model,
            max_tokens = self.params.max_tokens,
            temperature = self.params.temperature,
            "Invoking generateContent"
        );

        let request = GenerateRequest::user_prompt(prompt, self.params);
        let body = self
            .client
            .post_json(
                &self.endpoint(),
                RequestAuth::Header {
                    name: API_KEY_HEADER,
                    key: &self.api_key,
                },
                &request,
                GEMINI_PROVIDER_NAME,
            )
            .await?;

        extract_text(&body)
    }
}

/// Join the text parts of the first candidate.
pub(crate) fn extract_text(body: &str) -> Result<String, LlmError> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        LlmError::MalformedResponse(format!("Failed to parse {GEMINI_PROVIDER_NAME} response: {e}"))
    })?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .map(|text| text.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LlmError::EmptyResponse(format!(
            "{GEMINI_PROVIDER_NAME} returned no text"
        )));
    }
    Ok(text)
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        GEMINI_PROVIDER_NAME
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
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn user_prompt(prompt: String, params: GenerationParams) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: params.max_tokens,
                temperature: params.temperature,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
