//! Priority-ordered probe execution as an explicit state machine.
//!
//! `Init -> Trying(SourcePage) -> Trying(WebSearch) -> Trying(DirectMatch) -> Exhausted`,
//! with any `Trying` state jumping to `Done` on the first probe that finds a
//! profile. The order lives in [`TRANSITIONS`]; [`WaterfallState::advance`]
//! is the only place the machine moves.

use tracing::{info, warn};

use super::probes::Probes;
use crate::model::{ActivityMetrics, Identity, ProbeMethod, ProbeOutcome, ResolutionResult};

/// Probe tried in each `Trying` state, and the probe tried after it misses.
pub const TRANSITIONS: [(ProbeMethod, Option<ProbeMethod>); 3] = [
    (ProbeMethod::SourcePage, Some(ProbeMethod::WebSearch)),
    (ProbeMethod::WebSearch, Some(ProbeMethod::DirectMatch)),
    (ProbeMethod::DirectMatch, None),
];

/// Where an identity's resolution currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaterfallState {
    /// Nothing tried yet.
    Init,
    /// The given probe is next to run.
    Trying(ProbeMethod),
    /// A probe found a profile.
    Done(ProbeOutcome),
    /// Every probe missed or failed.
    Exhausted,
}

impl WaterfallState {
    /// Moves the machine one step.
    ///
    /// `outcome` is what the probe of the current `Trying` state produced,
    /// or `None` when it failed. Terminal states stay put.
    #[must_use]
    pub fn advance(self, outcome: Option<ProbeOutcome>) -> Self {
        match self {
            Self::Init => Self::Trying(TRANSITIONS[0].0),
            Self::Trying(method) => match outcome {
                Some(outcome) if outcome.found => Self::Done(outcome),
                _ => next_on_miss(method).map_or(Self::Exhausted, Self::Trying),
            },
            terminal => terminal,
        }
    }

    /// Whether the machine has stopped.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Exhausted)
    }
}

fn next_on_miss(method: ProbeMethod) -> Option<ProbeMethod> {
    TRANSITIONS.iter().find(|(tried, _)| *tried == method).and_then(|(_, next)| *next)
}

/// Resolves identities by running the probes through the state machine.
pub struct WaterfallResolver<'a> {
    probes: Probes<'a>,
}

impl<'a> WaterfallResolver<'a> {
    /// Creates a resolver over the given probes.
    #[must_use]
    pub fn new(probes: Probes<'a>) -> Self {
        Self { probes }
    }

    /// Resolves one identity. Never fails: probe errors land in the attempts log.
    pub async fn resolve(&self, identity: &Identity) -> ResolutionResult {
        let mut attempts_log = Vec::new();
        let mut state = WaterfallState::Init;

        while !state.is_terminal() {
            let outcome = match &state {
                WaterfallState::Trying(method) => {
                    let method = *method;
                    match self.probes.run(method, identity).await {
                        Ok(outcome) => {
                            let verdict = if outcome.found { "found" } else { "not found" };
                            attempts_log.push(format!("{method}: {verdict}"));
                            Some(outcome)
                        }
                        Err(e) => {
                            warn!(%method, error = %e, "probe failed, continuing");
                            attempts_log.push(format!("{method}: failed ({e})"));
                            None
                        }
                    }
                }
                _ => None,
            };
            state = state.advance(outcome);
        }

        let outcome = match state {
            WaterfallState::Done(outcome) => Some(outcome),
            _ => None,
        };

        match &outcome {
            Some(found) => info!(
                display_name = %identity.display_name,
                method = %found.method,
                confidence = found.confidence,
                "identity resolved"
            ),
            None => info!(display_name = %identity.display_name, "no profile found"),
        }

        ResolutionResult {
            identity: identity.clone(),
            profile_url: outcome.as_ref().and_then(|o| o.profile_url.clone()),
            method: outcome.as_ref().map(|o| o.method),
            confidence: outcome.as_ref().map_or(0, |o| o.confidence),
            attempts_log,
            metrics: ActivityMetrics::default(),
        }
    }
}
