//! Canonicalization of raw candidate links into target-platform profile URLs.

use std::sync::LazyLock;

use regex::Regex;

/// Domain of the platform profiles are resolved on.
pub const TARGET_DOMAIN: &str = "instagram.com";

/// Path segments that are platform navigation, never a profile handle.
pub const EXCLUDED_SEGMENTS: &[&str] = &["p", "explore", "stories", "reels", "tv", "accounts"];

static RE_HANDLE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"instagram\.com/([A-Za-z0-9_.]+)").unwrap());

static RE_VALID_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]{1,30}$").unwrap());

/// A successfully normalized link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// A canonical profile URL with its handle.
    Profile {
        /// The presumed handle taken from the first path segment.
        handle: String,
        /// `https://www.instagram.com/<handle>/`.
        url: String,
    },
    /// A link whose handle could not be extracted, lightly cleaned.
    Unrecognized(String),
}

impl Normalized {
    /// The normalized URL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Profile { url, .. } | Self::Unrecognized(url) => url.as_str(),
        }
    }

    /// Whether the link points at a profile path.
    #[must_use]
    pub fn is_profile(&self) -> bool {
        matches!(self, Self::Profile { .. })
    }

    /// Consumes the value, returning the URL text.
    #[must_use]
    pub fn into_url(self) -> String {
        match self {
            Self::Profile { url, .. } | Self::Unrecognized(url) => url,
        }
    }
}

/// Builds the canonical profile URL for a handle.
#[must_use]
pub fn profile_url(handle: &str) -> String {
    format!("https://www.{TARGET_DOMAIN}/{handle}/")
}

/// Whether `handle` fits the platform's handle character class and length.
#[must_use]
pub fn is_valid_handle(handle: &str) -> bool {
    RE_VALID_HANDLE.is_match(handle)
}

/// Normalizes a raw candidate link.
///
/// Returns `None` when the first path segment is platform navigation
/// (`/p/`, `/explore/`, ...). A link with no extractable handle comes back
/// as [`Normalized::Unrecognized`] with a trailing slash; this never fails.
#[must_use]
pub fn normalize(raw: &str) -> Option<Normalized> {
    let trimmed = raw.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or(trimmed);

    let mut clean = if without_query.starts_with("http") {
        without_query.to_string()
    } else {
        format!("https://{without_query}")
    };
    clean = clean.replacen("://instagram.com", "://www.instagram.com", 1);

    // Trailing periods are sentence punctuation picked up from prose.
    let handle = RE_HANDLE_SEGMENT
        .captures(&clean)
        .map(|caps| caps[1].trim_end_matches('.').to_string())
        .filter(|handle| !handle.is_empty());
    if let Some(handle) = handle {
        if EXCLUDED_SEGMENTS.contains(&handle.as_str()) {
            return None;
        }
        let url = profile_url(&handle);
        return Some(Normalized::Profile { handle, url });
    }

    if !clean.ends_with('/') {
        clean.push('/');
    }
    Some(Normalized::Unrecognized(clean))
}
