//! Source-page description scan: links the person published on their own page.

use tracing::{debug, info, warn};

use crate::finder::extract::extract_links;
use crate::finder::normalize::{normalize, Normalized};
use crate::model::{ProbeMethod, ProbeOutcome};
use crate::ports::PageFetcher;

/// Page variants tried for a source profile: the profile itself, then its
/// about and channels tabs.
#[must_use]
pub fn page_variants(source_url: &str) -> [String; 3] {
    let base = source_url.trim().trim_end_matches('/');
    [base.to_string(), format!("{base}/about"), format!("{base}/channels")]
}

/// Picks the best target link on a page: the first one that normalizes to a
/// profile, else the first one that normalizes at all.
#[must_use]
pub fn best_link(html: &str) -> Option<String> {
    let candidates: Vec<Normalized> =
        extract_links(html).iter().filter_map(|link| normalize(&link.url)).collect();

    let index = candidates.iter().position(Normalized::is_profile).unwrap_or(0);
    candidates.get(index).map(|link| link.as_str().to_string())
}

/// Scans the source page variants in order and returns the first link found.
///
/// A variant that fails to fetch is skipped; an absent source URL is a miss.
pub async fn probe(fetcher: &dyn PageFetcher, source_url: Option<&str>) -> ProbeOutcome {
    let Some(source_url) = source_url else {
        debug!("no source profile URL; skipping source page scan");
        return ProbeOutcome::not_found(ProbeMethod::SourcePage);
    };

    for variant in page_variants(source_url) {
        debug!(url = %variant, "fetching source page variant");
        let page = match fetcher.fetch_page(&variant).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %variant, error = %e, "source page variant failed, trying next");
                continue;
            }
        };

        if let Some(profile) = best_link(&page.body) {
            info!(url = %variant, profile = %profile, "profile link found on source page");
            return ProbeOutcome::found(ProbeMethod::SourcePage, profile);
        }
        debug!(url = %variant, "no profile link on source page variant");
    }

    ProbeOutcome::not_found(ProbeMethod::SourcePage)
}
