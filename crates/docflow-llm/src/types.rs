//! Core types for the generation provider abstraction

use async_trait::async_trait;
use std::sync::Arc;

use docflow_utils::error::LlmError;
use docflow_utils::types::{DocumentInput, RewriteMode};

/// Capability that turns documents or a text span into generated text.
///
/// The orchestrator only depends on this trait; which implementation backs
/// it is decided once by [`crate::from_config_with_fallback`].
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Stable identifier reported in response provenance.
    fn name(&self) -> &str;

    /// Produce a condensed representation of the documents.
    ///
    /// `instructions` is soft guidance; providers weave it into the prompt or
    /// append it to the output.
    ///
    /// # Errors
    ///
    /// Returns `LlmError` if the backend fails.
    async fn generate_summary(
        &self,
        documents: &[DocumentInput],
        instructions: Option<&str>,
    ) -> Result<String, LlmError>;

    /// Transform `text` according to `mode`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError` if the backend fails.
    async fn rewrite_text(
        &self,
        text: &str,
        mode: Option<RewriteMode>,
        instructions: Option<&str>,
    ) -> Result<String, LlmError>;
}

#[async_trait]
impl<P: GenerationProvider + ?Sized> GenerationProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate_summary(
        &self,
        documents: &[DocumentInput],
        instructions: Option<&str>,
    ) -> Result<String, LlmError> {
        (**self).generate_summary(documents, instructions).await
    }

    async fn rewrite_text(
        &self,
        text: &str,
        mode: Option<RewriteMode>,
        instructions: Option<&str>,
    ) -> Result<String, LlmError> {
        (**self).rewrite_text(text, mode, instructions).await
    }
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: docflow_config::DEFAULT_MAX_TOKENS,
            temperature: docflow_config::DEFAULT_TEMPERATURE,
        }
    }
}

/// Operation label used in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOperation {
    Summarize,
    Rewrite,
}

impl ProviderOperation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Rewrite => "rewrite",
        }
    }
}

/// Returns the instructions only when they carry text.
#[must_use]
pub(crate) fn effective_instructions(instructions: Option<&str>) -> Option<&str> {
    instructions.filter(|i| !i.is_empty())
}
