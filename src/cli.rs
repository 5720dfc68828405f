//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::FinderConfig;

/// Top-level CLI parser for `profile-finder`.
#[derive(Debug, Parser)]
#[command(
    name = "profile-finder",
    version,
    about = "Resolve creator identities to their Instagram profiles"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve every identity in a JSON file and write the ranked results.
    Resolve(ResolveArgs),
    /// Print the normalized form of each URL.
    Normalize {
        /// Raw links to normalize.
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Print every link extracted from an HTML file, tagged by heuristic.
    Extract {
        /// HTML file to scan.
        file: PathBuf,
    },
}

/// Arguments for `resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// JSON array of identities to resolve.
    pub input: PathBuf,
    /// Where to write the export JSON.
    #[arg(short, long, default_value = "profiles.json")]
    pub output: PathBuf,
    /// Base delay between identities, in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,
    /// Maximum username guesses per identity.
    #[arg(long)]
    pub max_attempts: Option<usize>,
    /// Seed for the delay jitter.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Search endpoint used by the web-search probe.
    #[arg(long)]
    pub search_url: Option<String>,
    /// Serve all fetches from a recorded cassette instead of the network.
    #[arg(long, value_name = "CASSETTE")]
    pub replay: Option<PathBuf>,
}

impl ResolveArgs {
    /// Overlays the flags that were given onto `config`.
    pub fn apply(&self, config: &mut FinderConfig) {
        if let Some(delay_ms) = self.delay_ms {
            config.base_delay_ms = delay_ms;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_probe_attempts = max_attempts;
        }
        if let Some(seed) = self.seed {
            config.jitter_seed = Some(seed);
        }
        if let Some(search_url) = &self.search_url {
            config.search_url.clone_from(search_url);
        }
    }
}
