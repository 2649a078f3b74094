//! Exit code constants for the docflow CLI.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `INVALID_INPUT` | Request failed task-shape validation |
//! | 70 | `UPSTREAM_FAILURE` | Generation backend failed |

/// Exit codes matching the documented exit code table.
///
/// # Example
///
/// ```rust
/// use docflow_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::UPSTREAM_FAILURE, ExitCode::from_i32(70));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Invalid input - the request is missing a field its task requires
    pub const INVALID_INPUT: ExitCode = ExitCode(3);

    /// Upstream failure - the generation backend failed
    pub const UPSTREAM_FAILURE: ExitCode = ExitCode(70);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Codes above 255 are truncated by the OS anyway
        std::process::ExitCode::from(u8::try_from(code.0).unwrap_or(1))
    }
}
