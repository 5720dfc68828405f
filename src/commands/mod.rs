//! Command dispatch and handlers.

pub mod extract;
pub mod normalize;
pub mod resolve;

use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Command;
use crate::config::FinderConfig;
use crate::context::ServiceContext;
use crate::error::Error;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Resolve(args) => resolve::run(args),
        Command::Normalize { urls } => {
            normalize::run(urls);
            Ok(())
        }
        Command::Extract { file } => extract::run(file),
    }
}

/// Builds the context a resolution run talks through.
///
/// `replay` serves fetches from a cassette. Otherwise, when `FINDER_RECORD`
/// is set to a file path, live fetches are recorded to that cassette.
pub(crate) fn service_context(
    config: &FinderConfig,
    replay: Option<&Path>,
) -> Result<ServiceContext, Error> {
    if let Some(cassette) = replay {
        return ServiceContext::replaying(config, cassette);
    }
    match env::var("FINDER_RECORD") {
        Ok(path) if !path.trim().is_empty() => {
            ServiceContext::recording(config, &PathBuf::from(path))
        }
        _ => ServiceContext::live(config),
    }
}
