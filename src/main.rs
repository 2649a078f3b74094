//! docflow CLI binary
//!
//! All logic is in the library; main.rs only invokes cli::run().

fn main() -> std::process::ExitCode {
    // cli::run() prints every result and error itself
    match docflow::cli::run() {
        Ok(()) => docflow::ExitCode::SUCCESS.into(),
        Err(code) => code.into(),
    }
}
