//! Deterministic offline provider
//!
//! Implements the summary and rewrite rules with local string manipulation
//! only. Identical inputs always produce identical outputs, which is what
//! makes the end-to-end tests and the CLI usable without network access.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::LlmError;
use crate::types::{GenerationProvider, effective_instructions};
use docflow_utils::redaction::truncate_chars;
use docflow_utils::types::{DocumentInput, RewriteMode};

/// Provider name reported in response metadata
pub const OFFLINE_PROVIDER_NAME: &str = "offline";

/// Summaries longer than this many characters are truncated
pub const SUMMARY_MAX_CHARS: usize = 240;

/// Marker appended to truncated summaries
pub const SUMMARY_ELLIPSIS: &str = "...";

/// Prefix applied in `professional` mode
pub const PROFESSIONAL_PREFIX: &str = "Professional rewrite: ";

/// Separator placed before echoed instructions
pub const INSTRUCTION_NOTE: &str = "\n\nInstruction note: ";

/// `shorter` keeps SHORTER_NUMERATOR / SHORTER_DENOMINATOR of the characters
const SHORTER_NUMERATOR: usize = 7;
const SHORTER_DENOMINATOR: usize = 10;

static UTILIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\butilize\b").expect("valid regex"));

/// Deterministic provider with no network dependency.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl OfflineProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Join documents as `title: content`, collapse whitespace, and cap the
    /// result at [`SUMMARY_MAX_CHARS`].
    #[must_use]
    pub fn summarize(documents: &[DocumentInput]) -> String {
        let joined = documents
            .iter()
            .map(|doc| format!("{}: {}", doc.title, doc.content))
            .collect::<Vec<_>>()
            .join(" ");
        let compact = joined.split_whitespace().collect::<Vec<_>>().join(" ");

        if compact.chars().count() > SUMMARY_MAX_CHARS {
            let keep = SUMMARY_MAX_CHARS - SUMMARY_ELLIPSIS.len();
            format!("{}{SUMMARY_ELLIPSIS}", truncate_chars(&compact, keep))
        } else {
            compact
        }
    }

    /// Apply `mode` to the trimmed text.
    #[must_use]
    pub fn rewrite(text: &str, mode: Option<RewriteMode>) -> String {
        let normalized = text.trim();
        match mode {
            Some(RewriteMode::Shorter) => truncate_chars(normalized, shorter_len(normalized))
                .to_string(),
            Some(RewriteMode::Simplify) => UTILIZE.replace_all(normalized, "use").into_owned(),
            Some(RewriteMode::Professional) => format!("{PROFESSIONAL_PREFIX}{normalized}"),
            None => normalized.to_string(),
        }
    }
}

/// Floor of 70% of the character count, never below one.
fn shorter_len(text: &str) -> usize {
    (text.chars().count() * SHORTER_NUMERATOR / SHORTER_DENOMINATOR).max(1)
}

fn with_instruction_note(body: String, instructions: Option<&str>) -> String {
    match effective_instructions(instructions) {
        Some(note) => format!("{body}{INSTRUCTION_NOTE}{note}"),
        None => body,
    }
}

#[async_trait]
impl GenerationProvider for OfflineProvider {
    fn name(&self) -> &str {
        OFFLINE_PROVIDER_NAME
    }

    async fn generate_summary(
        &self,
        documents: &[DocumentInput],
        instructions: Option<&str>,
    ) -> Result<String, LlmError> {
        Ok(with_instruction_note(
            Self::summarize(documents),
            instructions,
        ))
    }

    async fn rewrite_text(
        &self,
        text: &str,
        mode: Option<RewriteMode>,
        instructions: Option<&str>,
    ) -> Result<String, LlmError> {
        Ok(with_instruction_note(Self::rewrite(text, mode), instructions))
    }
}
