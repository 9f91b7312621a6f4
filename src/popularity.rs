//! Popularity ranking for presentation
//!
//! Coverage dominates; high-signal keywords and recency adjust the order
//! among stories of similar reach.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::metrics::STAGE_RANK;
use crate::normalize::normalize;
use crate::schemas::{parse_timestamp, Cluster};
use crate::time_stage;

const COVERAGE_WEIGHT: f64 = 10.0;
const KEYWORD_WEIGHT: f64 = 2.0;
const KEYWORD_CAP: f64 = 10.0;

/// Words that mark a story as broadly significant (normalized form)
const HIGH_SIGNAL_KEYWORDS: &[&str] = &[
    "election", "elections", "war", "ceasefire", "earthquake", "hurricane",
    "flood", "floods", "wildfire", "pandemic", "outbreak", "attack",
    "killed", "resigns", "resignation", "verdict", "court", "sanctions",
    "inflation", "recession", "strike", "summit", "treaty", "budget",
    "climate", "crisis", "evacuated", "explosion",
];

static KEYWORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HIGH_SIGNAL_KEYWORDS.iter().copied().collect());

/// Recency bonus bands: (max age in hours, bonus)
const RECENCY_BANDS: &[(i64, f64)] = &[(6, 6.0), (24, 3.0), (48, 1.0)];

fn keyword_boost(cluster: &Cluster) -> f64 {
    let text = normalize(&format!("{} {}", cluster.title, cluster.neutral_headline));
    let hits = text
        .split_whitespace()
        .filter(|token| KEYWORD_SET.contains(token))
        .collect::<HashSet<_>>()
        .len();
    (hits as f64 * KEYWORD_WEIGHT).min(KEYWORD_CAP)
}

fn recency_boost(updated_at: &str, now: DateTime<Utc>) -> f64 {
    let Some(updated) = parse_timestamp(updated_at) else {
        return 0.0;
    };
    // Timestamps slightly in the future count as brand new
    let age_hours = (now - updated).num_hours().max(0);
    RECENCY_BANDS
        .iter()
        .find(|(max_hours, _)| age_hours < *max_hours)
        .map_or(0.0, |(_, bonus)| *bonus)
}

pub fn score_cluster(cluster: &Cluster, now: DateTime<Utc>) -> f64 {
    cluster.coverage as f64 * COVERAGE_WEIGHT
        + keyword_boost(cluster)
        + recency_boost(&cluster.updated_at, now)
}

/// Sets `popularity_score` on every cluster and sorts by it, highest first.
/// Equal scores keep their incoming order.
pub fn rank_clusters(clusters: &mut [Cluster], now: DateTime<Utc>) {
    time_stage!(STAGE_RANK, {
        for cluster in clusters.iter_mut() {
            cluster.popularity_score = Some(score_cluster(cluster, now));
        }
        clusters.sort_by(|a, b| {
            let (sa, sb) = (a.popularity_score.unwrap_or(0.0), b.popularity_score.unwrap_or(0.0));
            sb.total_cmp(&sa)
        });
    })
}
