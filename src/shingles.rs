//! Character shingles
//!
//! Overlapping k-character windows over normalized text. Combining several
//! window sizes gives one fingerprint per item that tolerates both short and
//! long rewordings.

use std::collections::HashSet;

use crate::normalize::normalize;

/// Window sizes combined into an item fingerprint
pub const DEFAULT_SHINGLE_SIZES: &[usize] = &[3, 4, 5];

/// A fingerprint is a plain set of shingles
pub type Fingerprint = HashSet<String>;

/// Every contiguous `k`-char substring of `normalize(text)`.
///
/// Empty when the normalized text is shorter than `k` (or `k` is zero).
pub fn shingles(text: &str, k: usize) -> HashSet<String> {
    let normalized = normalize(text);
    shingles_of_normalized(&normalized, k)
}

fn shingles_of_normalized(normalized: &str, k: usize) -> HashSet<String> {
    if k == 0 {
        return HashSet::new();
    }
    let chars: Vec<char> = normalized.chars().collect();
    if chars.len() < k {
        return HashSet::new();
    }
    chars.windows(k).map(|w| w.iter().collect()).collect()
}

/// Union of the shingle sets for each size in `sizes`
pub fn fingerprint_with_sizes(text: &str, sizes: &[usize]) -> Fingerprint {
    let normalized = normalize(text);
    let mut out = HashSet::new();
    for &k in sizes {
        out.extend(shingles_of_normalized(&normalized, k));
    }
    out
}

/// Union of the 3-, 4- and 5-shingles of `text`
pub fn fingerprint(text: &str) -> Fingerprint {
    fingerprint_with_sizes(text, DEFAULT_SHINGLE_SIZES)
}
