use tracing::debug;

/// Results shorter than this (after trimming) get an advisory note
pub const CRITIC_MIN_CHARS: usize = 20;

/// Appended to results that fall under [`CRITIC_MIN_CHARS`]
pub const CRITIC_ADVISORY: &str = "\n\n[Critic] Consider adding more detail.";

/// Post-hoc quality pass over the final result.
#[derive(Debug, Clone, Copy, Default)]
pub struct Critic;

impl Critic {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn review(&self, text: &str) -> String {
        if text.trim().chars().count() < CRITIC_MIN_CHARS {
            debug!("Critic flagged short result");
            format!("{text}{CRITIC_ADVISORY}")
        } else {
            text.to_string()
        }
    }
}
