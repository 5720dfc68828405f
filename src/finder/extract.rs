//! Candidate link extraction from fetched markup.
//!
//! Each heuristic is a standalone function over a parsed document (or the
//! raw text) so it can be exercised on its own. [`extract_links`] runs all
//! five and unions the results; [`search_result_links`] is the narrower
//! pass used on search-engine result pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::debug;

use super::normalize::{is_valid_handle, profile_url, TARGET_DOMAIN};
use crate::error::ParseError;

static SEL_ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static SEL_JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
static SEL_META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[content]").unwrap());

static RE_PROFILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?instagram\.com/[A-Za-z0-9_.]+/?").unwrap()
});
static RE_DOMAIN_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)instagram\.com/[A-Za-z0-9_.]+").unwrap());
static RE_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_.]+)").unwrap());
static RE_REDIRECT_Q: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]q=([^&]+)").unwrap());
static RE_REDIRECT_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"url[?=]([^&]+)").unwrap());
static RE_SEARCH_WRAPPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\?q=(https?://[^&]+)").unwrap());

/// Anchor paths on the target domain that are never profiles.
const NON_PROFILE_PATHS: &[&str] =
    &["instagram.com/static/", "instagram.com/developer/", "instagram.com/about/"];

/// Which heuristic surfaced a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// `<a href>` pointing straight at the target domain.
    Anchor,
    /// `<a href>` wrapping the target URL in a redirect.
    Redirect,
    /// Target-domain URL found anywhere in the document text.
    TextScan,
    /// `@handle` mention introduced by the word "instagram".
    Mention,
    /// Target-domain path inside a JSON-LD block.
    StructuredData,
    /// Target-domain path inside a `<meta content>` attribute.
    Meta,
}

impl Heuristic {
    /// Short snake-case name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anchor => "anchor",
            Self::Redirect => "redirect",
            Self::TextScan => "text_scan",
            Self::Mention => "mention",
            Self::StructuredData => "structured_data",
            Self::Meta => "meta",
        }
    }
}

/// A raw link and the heuristic that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedLink {
    /// The link text as found (possibly decoded from a redirect).
    pub url: String,
    /// The heuristic that produced it.
    pub heuristic: Heuristic,
}

/// Links deduplicated by text, first finder wins.
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    links: Vec<ExtractedLink>,
    seen: HashSet<String>,
}

impl LinkSet {
    /// Adds a link unless the same text is already present.
    pub fn insert(&mut self, url: impl Into<String>, heuristic: Heuristic) -> bool {
        let url = url.into();
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.links.push(ExtractedLink { url, heuristic });
        true
    }

    /// Adds every link from `urls` under the same heuristic.
    pub fn extend<I>(&mut self, urls: I, heuristic: Heuristic)
    where
        I: IntoIterator<Item = String>,
    {
        for url in urls {
            self.insert(url, heuristic);
        }
    }

    /// Number of distinct links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether no link was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Whether the exact link text is present.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Iterates links in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ExtractedLink> {
        self.links.iter()
    }
}

/// Runs all five heuristics over a page and unions the results.
///
/// An empty set is a normal outcome, not an error.
#[must_use]
pub fn extract_links(html: &str) -> LinkSet {
    let document = Html::parse_document(html);
    let mut links = LinkSet::default();

    links.extend(anchor_links(&document), Heuristic::Anchor);
    links.extend(redirect_links(&document), Heuristic::Redirect);
    links.extend(text_links(html), Heuristic::TextScan);
    links.extend(mention_links(html), Heuristic::Mention);
    links.extend(structured_data_links(&document), Heuristic::StructuredData);
    links.extend(meta_links(&document), Heuristic::Meta);

    links
}

/// Heuristic 1: anchors whose href names the target domain, minus static,
/// developer, and about pages.
#[must_use]
pub fn anchor_links(document: &Html) -> Vec<String> {
    hrefs(document)
        .filter(|href| href.contains(TARGET_DOMAIN))
        .filter(|href| !NON_PROFILE_PATHS.iter().any(|path| href.contains(path)))
        .map(str::to_string)
        .collect()
}

/// Heuristic 2: anchors that wrap a target-domain URL in a redirect.
#[must_use]
pub fn redirect_links(document: &Html) -> Vec<String> {
    hrefs(document)
        .filter(|href| href.contains("/redirect") || href.contains("q="))
        .filter_map(unwrap_redirect)
        .filter(|url| url.contains(TARGET_DOMAIN))
        .collect()
}

/// Heuristic 3a: target-domain URLs anywhere in the document text.
#[must_use]
pub fn text_links(text: &str) -> Vec<String> {
    RE_PROFILE_URL.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Heuristic 3b: `@handle` mentions directly introduced by "instagram".
///
/// A mention counts only when the text contains `instagram`, optionally
/// followed by whitespace or colons, immediately before that exact handle.
/// Trailing periods are sentence punctuation, not part of the handle.
#[must_use]
pub fn mention_links(text: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut checked = HashSet::new();

    for caps in RE_MENTION.captures_iter(text) {
        let handle = caps[1].trim_end_matches('.');
        if !checked.insert(handle.to_string()) || !is_valid_handle(handle) {
            continue;
        }
        // No lookahead in `regex`: the handle must end at a non-handle
        // character, optionally after trailing periods.
        let context = format!(
            r"(?i)instagram[\s:]*@{}\.*(?:[^A-Za-z0-9_.]|$)",
            regex::escape(handle)
        );
        match Regex::new(&context) {
            Ok(re) if re.is_match(text) => links.push(profile_url(handle)),
            Ok(_) => {}
            Err(e) => debug!(handle, error = %e, "skipping mention with unbuildable context"),
        }
    }

    links
}

/// Heuristic 4: target-domain paths inside JSON-LD blocks.
///
/// Blocks that fail to parse are skipped.
#[must_use]
pub fn structured_data_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    for script in document.select(&SEL_JSON_LD) {
        let raw: String = script.text().collect();
        if raw.trim().is_empty() {
            continue;
        }
        match parse_structured_block(&raw) {
            Ok(value) => {
                let flattened = value.to_string();
                links.extend(RE_DOMAIN_PATH.find_iter(&flattened).map(|m| m.as_str().to_string()));
            }
            Err(e) => debug!(error = %e, "skipping structured data block"),
        }
    }

    links
}

/// Heuristic 5: target-domain paths inside `<meta content>` attributes.
#[must_use]
pub fn meta_links(document: &Html) -> Vec<String> {
    document
        .select(&SEL_META)
        .filter_map(|meta| meta.value().attr("content"))
        .filter(|content| content.contains(TARGET_DOMAIN))
        .flat_map(|content| {
            RE_DOMAIN_PATH.find_iter(content).map(|m| m.as_str().to_string()).collect::<Vec<_>>()
        })
        .collect()
}

/// Links on a search-engine results page, in page order.
///
/// Result links wrapped as `url?q=<target>` are unwrapped and decoded;
/// anchors pointing at the domain directly are kept unless they are explore
/// pages.
#[must_use]
pub fn search_result_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs(&document) {
        let link = if href.contains("url?q=") {
            RE_SEARCH_WRAPPED
                .captures(href)
                .map(|caps| caps[1].to_string())
                .filter(|wrapped| wrapped.contains(TARGET_DOMAIN))
                .map(|wrapped| decode(&wrapped))
        } else if href.contains(TARGET_DOMAIN) && !href.contains("/explore") {
            Some(href.to_string())
        } else {
            None
        };

        if let Some(link) = link {
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }

    links
}

/// Pulls the wrapped target out of a redirect href (`q=` or `url=` form).
#[must_use]
pub fn unwrap_redirect(href: &str) -> Option<String> {
    let caps = RE_REDIRECT_Q.captures(href).or_else(|| RE_REDIRECT_URL.captures(href))?;
    Some(decode(&caps[1]))
}

fn parse_structured_block(raw: &str) -> Result<serde_json::Value, ParseError> {
    Ok(serde_json::from_str(raw)?)
}

fn decode(encoded: &str) -> String {
    urlencoding::decode(encoded).map_or_else(|_| encoded.to_string(), |s| s.into_owned())
}

fn hrefs(document: &Html) -> impl Iterator<Item = &str> {
    document.select(&SEL_ANCHOR).filter_map(|a| a.value().attr("href"))
}
