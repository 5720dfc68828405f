//! Records flowing through the resolution pipeline.
//!
//! Input identities arrive from an upstream ranking stage, probes produce
//! [`ProbeOutcome`]s, the waterfall folds them into a [`ResolutionResult`],
//! and the batch scheduler turns results into ranked [`ExportRecord`]s.

use serde::{Deserialize, Serialize};

/// A person named by display name and an optional source-platform profile URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Display name on the source platform.
    pub display_name: String,
    /// Profile page on the source platform, if known.
    #[serde(default)]
    pub source_profile_url: Option<String>,
}

impl Identity {
    /// Creates an identity from a display name and optional profile URL.
    pub fn new(display_name: impl Into<String>, source_profile_url: Option<&str>) -> Self {
        Self {
            display_name: display_name.into(),
            source_profile_url: source_profile_url.map(str::to_string),
        }
    }

    /// The source profile URL, treating an empty or blank value as absent.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.source_profile_url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

/// Activity metrics computed upstream; echoed through unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMetrics {
    /// Number of comments the person left.
    #[serde(default)]
    pub total_comments: u64,
    /// Likes received across those comments.
    #[serde(default)]
    pub total_likes: u64,
    /// Upstream activity ranking score.
    #[serde(default)]
    pub activity_score: f64,
}

/// One input record: an identity plus the metrics that ranked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Who to resolve.
    #[serde(flatten)]
    pub identity: Identity,
    /// Metrics to echo into the result.
    #[serde(flatten)]
    pub metrics: ActivityMetrics,
}

/// The probe methods, declared in waterfall priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbeMethod {
    /// Links the person published on their own source-platform page.
    SourcePage,
    /// Links surfaced by a public web search for the display name.
    WebSearch,
    /// A username guessed from the display name that exists on the target.
    DirectMatch,
}

impl ProbeMethod {
    /// Every method, highest priority first.
    pub const ALL: [Self; 3] = [Self::SourcePage, Self::WebSearch, Self::DirectMatch];

    /// Fixed confidence assigned to a match found by this method.
    #[must_use]
    pub const fn confidence(self) -> u8 {
        match self {
            Self::SourcePage => 95,
            Self::WebSearch => 70,
            Self::DirectMatch => 60,
        }
    }

    /// Short label used in the attempts log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SourcePage => "source page",
            Self::WebSearch => "web search",
            Self::DirectMatch => "direct match",
        }
    }

    /// Human-readable verification method for exported records.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SourcePage => "Source profile description",
            Self::WebSearch => "Web search (public)",
            Self::DirectMatch => "Direct username match",
        }
    }
}

impl std::fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What one probe invocation produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    /// Whether the probe resolved a profile.
    pub found: bool,
    /// The normalized profile URL when found.
    pub profile_url: Option<String>,
    /// The probe that produced this outcome.
    pub method: ProbeMethod,
    /// The method's fixed confidence when found, otherwise 0.
    pub confidence: u8,
}

impl ProbeOutcome {
    /// A successful outcome carrying the method's fixed confidence.
    #[must_use]
    pub fn found(method: ProbeMethod, profile_url: impl Into<String>) -> Self {
        Self {
            found: true,
            profile_url: Some(profile_url.into()),
            method,
            confidence: method.confidence(),
        }
    }

    /// A miss for the given method.
    #[must_use]
    pub fn not_found(method: ProbeMethod) -> Self {
        Self { found: false, profile_url: None, method, confidence: 0 }
    }
}

/// Final resolution for one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    /// The identity that was resolved.
    #[serde(flatten)]
    pub identity: Identity,
    /// Resolved target-platform profile, if any probe succeeded.
    pub profile_url: Option<String>,
    /// The probe that resolved the profile.
    pub method: Option<ProbeMethod>,
    /// Confidence of the winning probe, or 0 when exhausted.
    pub confidence: u8,
    /// One entry per probe attempted, in run order.
    pub attempts_log: Vec<String>,
    /// Metrics echoed from the input; attached by the batch scheduler.
    #[serde(flatten)]
    pub metrics: ActivityMetrics,
}

impl ResolutionResult {
    /// Whether a profile was resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.profile_url.is_some()
    }
}

/// One row handed to the export collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    /// 1-based position among resolved entries; absent when unresolved.
    pub rank: Option<u32>,
    /// Display name on the source platform.
    pub display_name: String,
    /// Source-platform profile URL, if known.
    pub source_profile_url: Option<String>,
    /// Resolved target-platform profile URL.
    pub resolved_profile_url: Option<String>,
    /// Verification method description.
    pub method: Option<String>,
    /// Confidence of the match (0 when unresolved).
    pub confidence: u8,
    /// Echoed comment count.
    pub total_comments: u64,
    /// Echoed like count.
    pub total_likes: u64,
    /// Echoed activity score.
    pub activity_score: f64,
}
