//! Direct-username-guess existence check.

use tracing::{debug, info};

use crate::finder::normalize::profile_url;
use crate::model::{ProbeMethod, ProbeOutcome};
use crate::ports::PageFetcher;

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 30;

/// Username guesses for a display name: deduplicated, 3 to 30 characters,
/// at most `cap` of them.
#[must_use]
pub fn username_candidates(display_name: &str, cap: usize) -> Vec<String> {
    let lower = display_name.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    let variants = [lower.clone(), words.join("_"), words.join("."), words.concat()];

    let mut candidates: Vec<String> = Vec::new();
    for variant in variants {
        let username: String = variant
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.'))
            .collect();
        if (MIN_LEN..=MAX_LEN).contains(&username.len()) && !candidates.contains(&username) {
            candidates.push(username);
        }
    }
    candidates.truncate(cap);
    candidates
}

/// Checks guessed profile URLs and returns the first that answers 200.
///
/// Any other status, or a failed request, is a miss for that guess.
pub async fn probe(fetcher: &dyn PageFetcher, display_name: &str, cap: usize) -> ProbeOutcome {
    for username in username_candidates(display_name, cap) {
        let url = profile_url(&username);
        match fetcher.check_exists(&url).await {
            Ok(200) => {
                info!(url = %url, "guessed username exists");
                return ProbeOutcome::found(ProbeMethod::DirectMatch, url);
            }
            Ok(status) => debug!(url = %url, status, "guessed username not found"),
            Err(e) => debug!(url = %url, error = %e, "existence check failed"),
        }
    }

    ProbeOutcome::not_found(ProbeMethod::DirectMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::finder::testing::ScriptedFetcher;

    #[test]
    fn special_characters_are_stripped() {
        let candidates = username_candidates("Jane Doe!!", 3);
        assert_eq!(candidates, vec!["janedoe", "jane_doe", "jane.doe"]);
    }

    #[test]
    fn duplicates_collapse_before_capping() {
        assert_eq!(username_candidates("Madonna", 3), vec!["madonna"]);
        assert_eq!(username_candidates("Ann Lee Smith", 2), vec!["annleesmith", "ann_lee_smith"]);
    }

    #[test]
    fn length_bounds_apply() {
        assert!(username_candidates("Al", 3).is_empty());
        assert!(username_candidates(&"x".repeat(31), 3).is_empty());
        assert_eq!(username_candidates("Ål Bo", 3), vec!["lbo", "l_bo", "l.bo"]);
    }

    #[tokio::test]
    async fn first_200_wins() {
        let fetcher = ScriptedFetcher::new()
            .status("https://www.instagram.com/janedoe/", 404)
            .status_error(
                "https://www.instagram.com/jane_doe/",
                FetchError::Timeout { url: "https://www.instagram.com/jane_doe/".into() },
            )
            .status("https://www.instagram.com/jane.doe/", 200);

        let outcome = probe(&fetcher, "Jane Doe", 3).await;

        assert_eq!(
            outcome,
            ProbeOutcome::found(ProbeMethod::DirectMatch, "https://www.instagram.com/jane.doe/")
        );
        assert_eq!(outcome.confidence, 60);
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test]
    async fn server_errors_are_misses() {
        let fetcher = ScriptedFetcher::new().status("https://www.instagram.com/madonna/", 503);
        let outcome = probe(&fetcher, "Madonna", 3).await;
        assert_eq!(outcome, ProbeOutcome::not_found(ProbeMethod::DirectMatch));
    }
}
