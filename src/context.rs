//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::adapters::live::{LiveClock, LiveFetcher, SeededJitter};
use crate::adapters::recording::RecordingFetcher;
use crate::adapters::replaying::ReplayingFetcher;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::FinderConfig;
use crate::error::Error;
use crate::ports::{Clock, JitterSource, PageFetcher};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Fetcher for pages and existence checks.
    pub fetcher: Box<dyn PageFetcher>,
    /// Clock for timestamps and inter-identity waits.
    pub clock: Box<dyn Clock>,
    /// Source of delay jitter.
    pub jitter: Box<dyn JitterSource>,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context talking to the real web.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn live(config: &FinderConfig) -> Result<Self, Error> {
        Ok(Self {
            fetcher: Box::new(LiveFetcher::new(config.fetch.clone())?),
            clock: Box::new(LiveClock),
            jitter: Box::new(SeededJitter::new(config.jitter_seed)),
            recorder: None,
        })
    }

    /// Creates a live context whose fetches are captured to a cassette at `path`.
    ///
    /// The cassette is written by [`ServiceContext::finish`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn recording(config: &FinderConfig, path: &Path) -> Result<Self, Error> {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "profile-finder-session")));
        let live = LiveFetcher::new(config.fetch.clone())?;
        Ok(Self {
            fetcher: Box::new(RecordingFetcher::new(Box::new(live), Arc::clone(&recorder))),
            clock: Box::new(LiveClock),
            jitter: Box::new(SeededJitter::new(config.jitter_seed)),
            recorder: Some(recorder),
        })
    }

    /// Creates a context that serves fetches from a recorded cassette.
    ///
    /// Time and jitter stay live so batch pacing behaves as configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if the cassette cannot be read or parsed.
    pub fn replaying(config: &FinderConfig, path: &Path) -> Result<Self, Error> {
        let cassette = Cassette::load(path)?;
        Ok(Self {
            fetcher: Box::new(ReplayingFetcher::new(CassetteReplayer::new(&cassette))),
            clock: Box::new(LiveClock),
            jitter: Box::new(SeededJitter::new(config.jitter_seed)),
            recorder: None,
        })
    }

    /// Whether this context is capturing a cassette.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Releases the ports and writes the cassette if recording.
    ///
    /// Returns the written path, or `None` for non-recording contexts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the cassette cannot be written.
    pub fn finish(self) -> Result<Option<std::path::PathBuf>, Error> {
        let Self { fetcher, recorder, .. } = self;
        drop(fetcher);
        let Some(recorder) = recorder else {
            return Ok(None);
        };
        let recorder = Arc::try_unwrap(recorder)
            .map_err(|_| Error::Cassette("recorder still in use at finish".into()))?
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let interactions = recorder.len();
        let path = recorder.finish().map_err(|e| Error::io("writing cassette", e))?;
        info!(path = %path.display(), interactions, "cassette written");
        Ok(Some(path))
    }
}
