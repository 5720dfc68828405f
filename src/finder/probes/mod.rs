//! Probe methods, one per [`ProbeMethod`].

pub mod direct_match;
pub mod source_page;
pub mod web_search;

use crate::config::FinderConfig;
use crate::error::ProbeError;
use crate::model::{Identity, ProbeMethod, ProbeOutcome};
use crate::ports::PageFetcher;

/// The three probes bound to a fetcher and run settings.
#[derive(Clone, Copy)]
pub struct Probes<'a> {
    fetcher: &'a dyn PageFetcher,
    config: &'a FinderConfig,
}

impl<'a> Probes<'a> {
    /// Binds the probes to a fetcher and configuration.
    #[must_use]
    pub fn new(fetcher: &'a dyn PageFetcher, config: &'a FinderConfig) -> Self {
        Self { fetcher, config }
    }

    /// Runs the probe for `method` against `identity`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProbeError`] when the probe aborts; misses are `Ok` with
    /// `found == false`.
    pub async fn run(
        &self,
        method: ProbeMethod,
        identity: &Identity,
    ) -> Result<ProbeOutcome, ProbeError> {
        match method {
            ProbeMethod::SourcePage => {
                Ok(source_page::probe(self.fetcher, identity.source_url()).await)
            }
            ProbeMethod::WebSearch => {
                web_search::probe(self.fetcher, &self.config.search_url, &identity.display_name)
                    .await
            }
            ProbeMethod::DirectMatch => Ok(direct_match::probe(
                self.fetcher,
                &identity.display_name,
                self.config.max_probe_attempts,
            )
            .await),
        }
    }
}
