//! Web-search scan: profile links surfaced by a public search engine.

use tracing::{debug, info};

use crate::error::ProbeError;
use crate::finder::extract::search_result_links;
use crate::finder::normalize::{normalize, TARGET_DOMAIN};
use crate::model::{ProbeMethod, ProbeOutcome};
use crate::ports::PageFetcher;

/// Query variants for a display name, most specific first.
#[must_use]
pub fn queries(display_name: &str) -> [String; 3] {
    let name = display_name.trim();
    let squashed: String = name.split_whitespace().collect();
    [
        format!("site:{TARGET_DOMAIN} \"{name}\""),
        format!("\"{name}\" instagram profile"),
        format!("{TARGET_DOMAIN}/{squashed}"),
    ]
}

/// Builds the results-page URL for a query.
#[must_use]
pub fn search_url(endpoint: &str, query: &str) -> String {
    format!("{endpoint}?q={}", urlencoding::encode(query))
}

/// Runs the queries in order and returns the first normalizable result link.
///
/// # Errors
///
/// A failed search fetch aborts the probe with [`ProbeError::Fetch`].
pub async fn probe(
    fetcher: &dyn PageFetcher,
    endpoint: &str,
    display_name: &str,
) -> Result<ProbeOutcome, ProbeError> {
    for query in queries(display_name) {
        let url = search_url(endpoint, &query);
        debug!(query = %query, "running web search");
        let page = fetcher.fetch_page(&url).await?;

        let profile = search_result_links(&page.body).iter().find_map(|link| normalize(link));
        if let Some(profile) = profile {
            info!(query = %query, profile = %profile.as_str(), "profile link found via web search");
            return Ok(ProbeOutcome::found(ProbeMethod::WebSearch, profile.into_url()));
        }
    }

    Ok(ProbeOutcome::not_found(ProbeMethod::WebSearch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::finder::testing::ScriptedFetcher;

    const ENDPOINT: &str = "https://search.example/search";

    #[test]
    fn builds_three_query_variants() {
        assert_eq!(
            queries(" Jane  Doe "),
            [
                "site:instagram.com \"Jane  Doe\"".to_string(),
                "\"Jane  Doe\" instagram profile".to_string(),
                "instagram.com/JaneDoe".to_string(),
            ]
        );
    }

    #[test]
    fn query_is_percent_encoded() {
        assert_eq!(
            search_url(ENDPOINT, "site:instagram.com \"Jane\""),
            "https://search.example/search?q=site%3Ainstagram.com%20%22Jane%22"
        );
    }

    #[tokio::test]
    async fn stops_at_first_query_with_results() {
        let queries = queries("Jane Doe");
        let fetcher = ScriptedFetcher::new()
            .page(&search_url(ENDPOINT, &queries[0]), "<p>no results</p>")
            .page(
                &search_url(ENDPOINT, &queries[1]),
                r#"<a href="/url?q=https://www.instagram.com/janedoe/&amp;sa=U">Jane</a>"#,
            );

        let outcome = probe(&fetcher, ENDPOINT, "Jane Doe").await.unwrap();

        assert_eq!(
            outcome,
            ProbeOutcome::found(ProbeMethod::WebSearch, "https://www.instagram.com/janedoe/")
        );
        assert_eq!(outcome.confidence, 70);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_aborts_probe() {
        let url = search_url(ENDPOINT, &queries("Jane")[0]);
        let fetcher = ScriptedFetcher::new()
            .page_error(&url, FetchError::Status { url: url.clone(), status: 429 });

        let err = probe(&fetcher, ENDPOINT, "Jane").await.unwrap_err();

        assert!(matches!(err, ProbeError::Fetch(FetchError::Status { status: 429, .. })));
        assert_eq!(fetcher.requests().len(), 1);
    }
}
