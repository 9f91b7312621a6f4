//! Headline selection
//!
//! Picks the most neutral member title for a cluster and strips clickbait
//! from it. Used whenever no generated headline is available.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::schemas::NewsItem;

/// Hard cap on a neutral headline, ellipsis included
pub const MAX_HEADLINE_CHARS: usize = 85;

const ELLIPSIS: char = '…';

/// Editorial markers that prefix a headline ("Breaking: ...")
const EDITORIAL_MARKERS: &[&str] = &[
    "breaking news", "breaking", "exclusive", "just in", "developing",
    "update", "updated", "watch", "live", "revealed",
];

/// Sensational phrases removed outright (ASCII, matched case-insensitively)
const SENSATIONAL_PHRASES: &[&str] = &[
    "you won't believe",
    "you will not believe",
    "what happened next",
    "what happens next",
    "will shock you",
    "the internet is losing it",
    "here's why",
    "here is why",
    "jaw-dropping",
    "jaw dropping",
    "mind-blowing",
    "mind blowing",
    "must-see",
    "must see",
    "gone wrong",
    "shocking",
    "unbelievable",
    "insane",
];

/// Outlets whose headlines get a small neutrality bonus
const NEUTRAL_SOURCES: &[&str] = &[
    "reuters", "associated press", "ap", "ap news", "bbc", "bbc news", "npr",
    "pbs newshour", "the guardian", "financial times", "bloomberg", "al jazeera",
];

static NEUTRAL_SOURCE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NEUTRAL_SOURCES.iter().copied().collect());

const QUOTE_CHARS: &[char] = &['"', '\'', '“', '”', '‘', '’'];

const SCORED_PUNCTUATION: &[char] = &['!', '?', ':', ';'];

/// Length of the marker prefix at the start of `title`, separator included
fn marker_prefix_len(title: &str) -> Option<usize> {
    let lower = title.to_ascii_lowercase();
    for marker in EDITORIAL_MARKERS {
        let Some(rest) = lower.strip_prefix(marker) else {
            continue;
        };
        let trimmed = rest.trim_start();
        let sep = if trimmed.starts_with(':') || trimmed.starts_with('|') {
            1
        } else if trimmed.starts_with('-') || trimmed.starts_with('–') {
            trimmed.chars().next().map_or(0, char::len_utf8)
        } else {
            continue;
        };
        return Some(title.len() - trimmed.len() + sep);
    }
    None
}

pub fn has_editorial_marker(title: &str) -> bool {
    marker_prefix_len(title.trim_start()).is_some()
}

fn strip_markers(title: &str) -> String {
    let mut out = title.trim_start().to_string();
    while let Some(len) = marker_prefix_len(&out) {
        out = out[len..].trim_start().to_string();
    }
    out
}

fn strip_phrases(title: &str) -> String {
    let mut out = title.to_string();
    for phrase in SENSATIONAL_PHRASES {
        let mut from = 0;
        // ASCII lowercasing keeps byte offsets aligned with `out`
        while let Some(offset) = out.to_ascii_lowercase()[from..].find(phrase) {
            let start = from + offset;
            let end = start + phrase.len();
            let bounded = !out[..start].chars().next_back().is_some_and(char::is_alphanumeric)
                && !out[end..].chars().next().is_some_and(char::is_alphanumeric);
            if bounded {
                out.replace_range(start..end, " ");
                from = start + 1;
            } else {
                from = end;
            }
        }
    }
    out
}

/// Collapses runs of `!`/`?` to their first char and squeezes whitespace
fn collapse_punctuation(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev: Option<char> = None;
    for c in title.chars() {
        let repeated = matches!(c, '!' | '?') && matches!(prev, Some('!' | '?'));
        if !repeated {
            out.push(c);
        }
        prev = Some(c);
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_edges(title: &str) -> &str {
    title
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '–' | ',' | '|' | ';'))
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '–' | ',' | '|' | ';'))
}

fn truncate_at_word(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let head: String = title.chars().take(max_chars - 1).collect();
    let cut = match head.rfind(' ') {
        Some(pos) if pos > 0 => &head[..pos],
        _ => head.as_str(),
    };
    let cut = cut.trim_end_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation());
    format!("{}{}", cut, ELLIPSIS)
}

fn capitalize_first(title: &str) -> String {
    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strips clickbait from a headline and caps it at [`MAX_HEADLINE_CHARS`].
pub fn neutralize(title: &str) -> String {
    let stripped = strip_phrases(&strip_markers(title));
    let collapsed = collapse_punctuation(&stripped);
    let mut cleaned = trim_edges(&collapsed).to_string();
    if !cleaned.chars().any(char::is_alphanumeric) {
        // Title was nothing but clickbait; keep the original wording
        cleaned = collapse_punctuation(title);
    }
    capitalize_first(&truncate_at_word(&cleaned, MAX_HEADLINE_CHARS))
}

/// Neutrality score of one member title
pub fn headline_score(item: &NewsItem) -> u32 {
    let title = item.title.trim();
    let len = title.chars().count();
    let mut score = 0;

    if (20..=80).contains(&len) {
        score += 3;
    } else if len <= 100 {
        score += 1;
    }
    if !has_editorial_marker(title) {
        score += 2;
    }
    if title.chars().filter(|c| SCORED_PUNCTUATION.contains(c)).count() <= 1 {
        score += 2;
    }
    if NEUTRAL_SOURCE_SET.contains(item.source.trim().to_lowercase().as_str()) {
        score += 1;
    }
    if title.chars().filter(|c| QUOTE_CHARS.contains(c)).count() <= 2 {
        score += 1;
    }
    score
}

/// Best neutral headline among `items`; the first wins on equal scores.
pub fn select_best_headline(items: &[NewsItem]) -> String {
    match items {
        [] => String::new(),
        [only] => neutralize(&only.title),
        _ => {
            let mut best = &items[0];
            let mut best_score = headline_score(best);
            for item in &items[1..] {
                let score = headline_score(item);
                if score > best_score {
                    best = item;
                    best_score = score;
                }
            }
            neutralize(&best.title)
        }
    }
}
