use std::path::PathBuf;

/// Configuration overrides supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file (skips discovery)
    pub config_path: Option<PathBuf>,
    /// `--provider`
    pub provider: Option<String>,
    /// `--model`
    pub model: Option<String>,
}
