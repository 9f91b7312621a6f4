//! Text normalization for fingerprinting
//!
//! Lowercases, turns punctuation into spaces, drops short tokens and common
//! English function words, then collapses whitespace.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Function words that carry no story signal
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by",
    "for", "from", "had", "has", "have", "he", "her", "his", "how", "in",
    "into", "is", "it", "its", "not", "of", "on", "or", "our", "she",
    "that", "the", "their", "they", "this", "to", "was", "were", "what", "when",
    "who", "will", "with", "you",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOPWORDS.iter().copied().collect());

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

/// Normalizes text for shingling. Total and deterministic; empty in, empty out.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > 2 && !is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}
