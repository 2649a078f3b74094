//! Prompts shared by the remote providers
//!
//! Each operation becomes a single user message. Instructions are optional
//! soft guidance; blank instructions read as `none`.

use std::fmt::Write as _;

use crate::types::effective_instructions;
use docflow_utils::types::{DocumentInput, RewriteMode};

/// Prompt for the summary operation.
#[must_use]
pub fn summary_prompt(documents: &[DocumentInput], instructions: Option<&str>) -> String {
    let mut prompt = String::from("Summarize the following documents for the end user.\n\n");
    for doc in documents {
        let _ = write!(prompt, "# {}\n{}\n\n", doc.title, doc.content);
    }
    let _ = write!(
        prompt,
        "Instructions: {}",
        effective_instructions(instructions).unwrap_or("none")
    );
    prompt
}

/// Prompt for the rewrite operation; an absent mode reads as `professional`.
#[must_use]
pub fn rewrite_prompt(text: &str, mode: Option<RewriteMode>, instructions: Option<&str>) -> String {
    let mode = mode.unwrap_or(RewriteMode::Professional);
    format!(
        "Rewrite the following text in mode '{mode}'.\nText:\n{text}\n\nInstructions: {}",
        effective_instructions(instructions).unwrap_or("none")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_lists_documents() {
        let docs = [
            DocumentInput::new("1", "Alpha", "first body"),
            DocumentInput::new("2", "Beta", "second body"),
        ];
        let prompt = summary_prompt(&docs, None);
        assert!(prompt.starts_with("Summarize the following documents for the end user."));
        assert!(prompt.contains("# Alpha\nfirst body"));
        assert!(prompt.contains("# Beta\nsecond body"));
        assert!(prompt.ends_with("Instructions: none"));
    }

    #[test]
    fn test_rewrite_prompt_defaults_to_professional() {
        let prompt = rewrite_prompt("hello", None, Some("keep it short"));
        assert!(prompt.starts_with("Rewrite the following text in mode 'professional'."));
        assert!(prompt.contains("Text:\nhello"));
        assert!(prompt.ends_with("Instructions: keep it short"));

        let prompt = rewrite_prompt("hello", Some(RewriteMode::Shorter), Some(""));
        assert!(prompt.contains("mode 'shorter'"));
        assert!(prompt.ends_with("Instructions: none"));
    }
}
