//! Run configuration: defaults, environment overrides, and fetch settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Browser-like user agent sent with page fetches.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Search engine endpoint queried by the web-search probe.
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";

/// Headers and timeouts handed to the page fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchConfig {
    /// `User-Agent` header for every request.
    pub user_agent: String,
    /// `Accept-Language` header for page fetches.
    pub accept_language: String,
    /// `Accept` header for page fetches.
    pub accept: String,
    /// Timeout for page fetches, in milliseconds.
    pub page_timeout_ms: u64,
    /// Timeout for existence checks, in milliseconds.
    pub exists_timeout_ms: u64,
    /// Maximum redirects followed per request.
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            page_timeout_ms: 10_000,
            exists_timeout_ms: 5_000,
            max_redirects: 5,
        }
    }
}

impl FetchConfig {
    /// Timeout applied to page fetches.
    #[must_use]
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    /// Timeout applied to existence checks.
    #[must_use]
    pub fn exists_timeout(&self) -> Duration {
        Duration::from_millis(self.exists_timeout_ms)
    }
}

/// Settings for one resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinderConfig {
    /// Base delay between identities, in milliseconds.
    pub base_delay_ms: u64,
    /// Exclusive upper bound of the random jitter added to each delay.
    pub jitter_ceiling_ms: u64,
    /// Maximum username guesses checked by the direct-match probe.
    pub max_probe_attempts: usize,
    /// Search endpoint; the query is appended as `?q=`.
    pub search_url: String,
    /// Seed for the jitter source; random when absent.
    pub jitter_seed: Option<u64>,
    /// Fetcher headers and timeouts.
    pub fetch: FetchConfig,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 2_000,
            jitter_ceiling_ms: 1_000,
            max_probe_attempts: 3,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            jitter_seed: None,
            fetch: FetchConfig::default(),
        }
    }
}

impl FinderConfig {
    /// Defaults overlaid with `FINDER_*` variables from the process environment.
    ///
    /// Loads a `.env` file first when one is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a variable is set but does not parse.
    pub fn from_env() -> Result<Self, Error> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup("FINDER_DELAY_MS") {
            config.base_delay_ms = parse_var("FINDER_DELAY_MS", &value)?;
        }
        if let Some(value) = lookup("FINDER_MAX_PROBE_ATTEMPTS") {
            config.max_probe_attempts = parse_var("FINDER_MAX_PROBE_ATTEMPTS", &value)?;
        }
        if let Some(value) = lookup("FINDER_JITTER_SEED") {
            config.jitter_seed = Some(parse_var("FINDER_JITTER_SEED", &value)?);
        }
        if let Some(value) = lookup("FINDER_SEARCH_URL") {
            config.search_url = value;
        }
        if let Some(value) = lookup("FINDER_USER_AGENT") {
            config.fetch.user_agent = value;
        }
        Ok(config)
    }

    /// Base delay between identities.
    #[must_use]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| Error::Config(format!("{key}={value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = FinderConfig::default();
        assert_eq!(config.base_delay_ms, 2_000);
        assert_eq!(config.jitter_ceiling_ms, 1_000);
        assert_eq!(config.max_probe_attempts, 3);
        assert_eq!(config.fetch.page_timeout(), Duration::from_secs(10));
        assert_eq!(config.fetch.exists_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = FinderConfig::from_lookup(lookup(&[
            ("FINDER_DELAY_MS", "500"),
            ("FINDER_MAX_PROBE_ATTEMPTS", "2"),
            ("FINDER_JITTER_SEED", "42"),
            ("FINDER_SEARCH_URL", "http://localhost:9000/search"),
        ]))
        .unwrap();
        assert_eq!(config.base_delay(), Duration::from_millis(500));
        assert_eq!(config.max_probe_attempts, 2);
        assert_eq!(config.jitter_seed, Some(42));
        assert_eq!(config.search_url, "http://localhost:9000/search");
    }

    #[test]
    fn unparseable_value_is_config_error() {
        let err = FinderConfig::from_lookup(lookup(&[("FINDER_DELAY_MS", "soon")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("FINDER_DELAY_MS"));
    }
}
