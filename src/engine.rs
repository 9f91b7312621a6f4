//! Clustering Engine
//!
//! One stateless batch pass over a bounded item list:
//! 1. Exact-duplicate elimination by URL
//! 2. Shingle fingerprints from title + standfirst
//! 3. Pairwise Jaccard comparison, merging through a disjoint set
//! 4. Cluster assembly (member order, coverage, headline, image)
//! 5. Global sort by coverage, then recency

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dedup::{dedupe_items, hostname};
use crate::error::{ClusteringError, Result};
use crate::headline::select_best_headline;
use crate::metrics::{self, STAGE_ASSEMBLE, STAGE_COMPARE, STAGE_DEDUP, STAGE_FINGERPRINT};
use crate::schemas::{newest_first, Cluster, NewsItem};
use crate::shingles::{fingerprint_with_sizes, Fingerprint, DEFAULT_SHINGLE_SIZES};
use crate::similarity::jaccard;
use crate::time_stage;
use crate::union_find::DisjointSet;

/// Threshold used for cross-outlet topical grouping
pub const DEFAULT_THRESHOLD: f64 = 0.18;

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterParams {
    pub threshold: f64,
    pub shingle_sizes: Vec<usize>,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            shingle_sizes: DEFAULT_SHINGLE_SIZES.to_vec(),
        }
    }
}

impl ClusterParams {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.similarity_threshold,
            shingle_sizes: config.shingle_sizes.clone(),
        }
    }

    /// Rejects thresholds outside [0, 1]. The engine itself accepts anything.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ClusteringError::InvalidThreshold(self.threshold));
        }
        if self.threshold == 0.0 {
            warn!("Threshold 0 merges every item into a single cluster");
        }
        Ok(())
    }
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterStats {
    pub input_items: usize,
    pub unique_items: usize,
    pub duplicates_removed: usize,
    /// Pairs at or above the threshold
    pub merges: usize,
    pub clusters: usize,
}

#[derive(Debug, Clone)]
pub struct ClusterRun {
    pub clusters: Vec<Cluster>,
    pub stats: ClusterStats,
}

pub struct ClusterEngine {
    params: ClusterParams,
    /// Section name used for metric labels and log fields
    label: String,
}

impl ClusterEngine {
    pub fn new(params: ClusterParams) -> Self {
        Self {
            params,
            label: "all".to_string(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    pub fn run(&self, items: &[NewsItem]) -> ClusterRun {
        debug!(
            section = %self.label,
            items = items.len(),
            threshold = self.params.threshold,
            "Clustering started"
        );

        let outcome = time_stage!(STAGE_DEDUP, dedupe_items(items));
        let unique = outcome.unique;

        let fingerprints: Vec<Fingerprint> = time_stage!(STAGE_FINGERPRINT, {
            unique
                .iter()
                .map(|item| fingerprint_with_sizes(&item.fingerprint_text(), &self.params.shingle_sizes))
                .collect()
        });

        let mut forest = DisjointSet::with_capacity(unique.len());
        let merges = time_stage!(STAGE_COMPARE, {
            let mut merges = 0;
            for i in 0..unique.len() {
                forest.make_set(i);
                for j in (i + 1)..unique.len() {
                    if jaccard(&fingerprints[i], &fingerprints[j]) >= self.params.threshold {
                        forest.union(i, j);
                        merges += 1;
                    }
                }
            }
            merges
        });

        let clusters = time_stage!(STAGE_ASSEMBLE, {
            let mut clusters: Vec<Cluster> = forest
                .groups()
                .into_iter()
                .map(|(_, members)| {
                    assemble(members.into_iter().map(|i| unique[i].clone()).collect())
                })
                .collect();
            sort_clusters(&mut clusters);
            clusters
        });

        let stats = ClusterStats {
            input_items: items.len(),
            unique_items: unique.len(),
            duplicates_removed: outcome.duplicates_removed,
            merges,
            clusters: clusters.len(),
        };
        metrics::record_run(&self.label, &stats);

        if let Some(largest) = clusters.iter().map(Cluster::len).max() {
            debug!(
                section = %self.label,
                largest,
                singletons = clusters.iter().filter(|c| c.len() == 1).count(),
                "Cluster size distribution"
            );
        }
        info!(
            section = %self.label,
            input = stats.input_items,
            unique = stats.unique_items,
            duplicates = stats.duplicates_removed,
            clusters = stats.clusters,
            "Clustering complete"
        );

        ClusterRun { clusters, stats }
    }
}

/// Clusters `items` with the default shingle sizes.
pub fn cluster_items(items: &[NewsItem], threshold: f64) -> Vec<Cluster> {
    ClusterEngine::new(ClusterParams::with_threshold(threshold))
        .run(items)
        .clusters
}

/// Distinct hostnames among `items`.
///
/// An item whose URL has no parseable host counts under its source label.
pub fn coverage(items: &[NewsItem]) -> usize {
    items
        .iter()
        .map(|item| hostname(&item.url).unwrap_or_else(|| item.source.clone()))
        .collect::<HashSet<_>>()
        .len()
}

/// Builds one cluster from its members; the id is assigned after sorting.
fn assemble(mut members: Vec<NewsItem>) -> Cluster {
    members.sort_by(|a, b| newest_first(&a.published_at, &b.published_at));

    let featured_image = members
        .iter()
        .filter_map(|m| m.image_url.as_deref())
        .find(|url| !url.trim().is_empty())
        .map(str::to_string);

    Cluster {
        id: String::new(),
        coverage: coverage(&members),
        updated_at: members[0].published_at.clone(),
        title: members[0].title.clone(),
        neutral_headline: select_best_headline(&members),
        featured_image,
        items: members,
        popularity_score: None,
    }
}

/// Coverage descending, then most recently updated; ids follow the final order.
pub fn sort_clusters(clusters: &mut [Cluster]) {
    clusters.sort_by(|a, b| {
        b.coverage
            .cmp(&a.coverage)
            .then_with(|| newest_first(&a.updated_at, &b.updated_at))
    });
    for (i, cluster) in clusters.iter_mut().enumerate() {
        cluster.id = format!("cluster-{}", i);
    }
}
