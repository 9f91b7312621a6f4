//! News story clustering
//!
//! Deduplicates syndicated feed items, fingerprints them with character
//! shingles, groups them transitively through a disjoint set and ranks the
//! resulting clusters.
//!
//! The core (`normalize` through `engine`) is synchronous, pure and never
//! fails; `sections` wraps it for concurrent per-section batch runs.

pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod headline;
pub mod metrics;
pub mod normalize;
pub mod popularity;
pub mod schemas;
pub mod sections;
pub mod shingles;
pub mod similarity;
pub mod union_find;

pub use engine::{cluster_items, ClusterEngine, ClusterParams, ClusterRun, ClusterStats};
pub use error::{ClusteringError, Result};
pub use schemas::{Cluster, NewsItem};
