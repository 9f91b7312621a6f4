//! Deduplication Module
//!
//! Exact-duplicate elimination for re-polled or syndicated copies of the
//! same article, decided by URL only:
//! - Canonical URL equality when both items carry one
//! - Cleaned URL equality (tracking parameters stripped)
//! - Hostname + path equality
//!
//! Topical grouping of different articles is the fingerprint path in
//! `engine`; nothing here compares text.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use crate::schemas::NewsItem;

/// Query parameters dropped before comparing URLs
const TRACKING_PARAMS: &[&str] = &[
    "utm_source", "utm_medium", "utm_campaign", "utm_term", "utm_content",
    "ref", "src",
];

static TRACKING_PARAM_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| TRACKING_PARAMS.iter().copied().collect());

/// Removes tracking parameters, keeping every other parameter in order.
pub fn strip_tracking_params(url_str: &str) -> Result<String, url::ParseError> {
    let url = Url::parse(url_str)?;
    Ok(strip_parsed(url).to_string())
}

fn strip_parsed(mut url: Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAM_SET.contains(key.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else if kept.len() != url.query_pairs().count() {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url
}

/// Hostname of a URL as parsed, if it has one
pub fn hostname(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Decides whether two items are the same underlying article.
///
/// Symmetric, and never fails: an unparseable URL means "different".
pub fn is_same_article(a: &NewsItem, b: &NewsItem) -> bool {
    if let (Some(ca), Some(cb)) = (a.canonical_url.as_deref(), b.canonical_url.as_deref()) {
        return ca == cb;
    }

    let (Ok(ua), Ok(ub)) = (Url::parse(&a.url), Url::parse(&b.url)) else {
        return false;
    };

    let (ca, cb) = (strip_parsed(ua), strip_parsed(ub));
    if ca.as_str() == cb.as_str() {
        return true;
    }

    ca.host_str() == cb.host_str() && ca.path() == cb.path()
}

/// Outcome of the exact-duplicate pass
#[derive(Debug, Clone)]
pub struct DedupOutcome {
    pub unique: Vec<NewsItem>,
    pub duplicates_removed: usize,
}

/// Drops exact duplicates, scanning accepted items in input order.
///
/// When two items match, the one with the longer body wins (ties keep the
/// earlier one) and takes over the earlier item's slot.
pub fn dedupe_items(items: &[NewsItem]) -> DedupOutcome {
    let mut unique: Vec<NewsItem> = Vec::with_capacity(items.len());
    let mut duplicates_removed = 0;

    for item in items {
        match unique.iter().position(|kept| is_same_article(kept, item)) {
            Some(idx) => {
                duplicates_removed += 1;
                if item.content_len() > unique[idx].content_len() {
                    debug!(url = %item.url, replaced = %unique[idx].url, "Duplicate with longer body replaces earlier copy");
                    unique[idx] = item.clone();
                } else {
                    debug!(url = %item.url, kept = %unique[idx].url, "Duplicate dropped");
                }
            }
            None => unique.push(item.clone()),
        }
    }

    DedupOutcome {
        unique,
        duplicates_removed,
    }
}
