//! Command-line interface for docflow
//!
//! - `args`: clap argument definitions
//! - `run`: entry point, dispatch and output
//! - `commands`: command implementations

pub mod args;
mod commands;
mod run;

pub use args::{Cli, Commands, TaskOptions};
pub use commands::{capabilities, effective_config_json, execute_task};
pub use run::run;
