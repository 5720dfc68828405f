//! Core library entry for the `profile-finder` CLI.
//!
//! Resolves creator identities to Instagram profile URLs by running three
//! probes in priority order (source-page scan, web search, direct username
//! guess) and pacing a batch of identities with randomized delays.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod finder;
pub mod model;
pub mod ports;

pub use error::Error;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return err.print().map_err(|e| e.to_string());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_executes_normalize() {
        let result = run(["profile-finder", "normalize", "instagram.com/janedoe"]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["profile-finder", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_input() {
        let err = run(["profile-finder", "resolve", "/nonexistent/identities.json"]).unwrap_err();
        assert!(err.contains("/nonexistent/identities.json"));
    }
}
