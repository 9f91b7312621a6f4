//! Prometheus Metrics for Clustering Stages
//!
//! Metrics include:
//! - items in / duplicates removed / clusters out per section
//! - union merges per section
//! - latency per stage (histogram)
//! - error counts

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec,
    HistogramOpts, HistogramVec, IntCounterVec, Encoder, TextEncoder,
};
use tracing::error;

use crate::engine::ClusterStats;

// ============================================
// METRIC DEFINITIONS
// ============================================

/// Stages of one clustering run
pub const STAGE_DEDUP: &str = "dedup";
pub const STAGE_FINGERPRINT: &str = "fingerprint";
pub const STAGE_COMPARE: &str = "compare";
pub const STAGE_ASSEMBLE: &str = "assemble";
pub const STAGE_RANK: &str = "rank";
pub const STAGE_SECTION: &str = "section";

static ITEMS_IN: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clustering_items_total",
        "Items handed to the clustering engine",
        &["section"]
    ).expect("Failed to create items_total metric")
});

static DUPLICATES_REMOVED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clustering_duplicates_removed_total",
        "Items dropped as exact duplicates",
        &["section"]
    ).expect("Failed to create duplicates_removed metric")
});

static CLUSTERS_OUT: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clustering_clusters_total",
        "Clusters produced",
        &["section"]
    ).expect("Failed to create clusters_total metric")
});

static MERGES: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clustering_merges_total",
        "Item pairs at or above the similarity threshold",
        &["section"]
    ).expect("Failed to create merges_total metric")
});

// Latency histogram (in seconds)
static STAGE_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![
        0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0,
    ];
    register_histogram_vec!(
        HistogramOpts::new(
            "clustering_stage_latency_seconds",
            "Latency of each clustering stage in seconds"
        ).buckets(buckets),
        &["stage"]
    ).expect("Failed to create stage_latency metric")
});

static ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clustering_errors_total",
        "Total number of errors by stage and type",
        &["stage", "error_type"]
    ).expect("Failed to create errors metric")
});

// ============================================
// METRICS API
// ============================================

/// Records the counters of one finished run
pub fn record_run(section: &str, stats: &ClusterStats) {
    ITEMS_IN.with_label_values(&[section]).inc_by(stats.input_items as u64);
    DUPLICATES_REMOVED
        .with_label_values(&[section])
        .inc_by(stats.duplicates_removed as u64);
    CLUSTERS_OUT.with_label_values(&[section]).inc_by(stats.clusters as u64);
    MERGES.with_label_values(&[section]).inc_by(stats.merges as u64);
}

/// Records stage latency
pub fn record_stage_latency(stage: &str, latency_secs: f64) {
    STAGE_LATENCY.with_label_values(&[stage]).observe(latency_secs);
}

/// Records an error
pub fn record_error(stage: &str, error_type: &str) {
    ERRORS.with_label_values(&[stage, error_type]).inc();
}

// ============================================
// METRICS COLLECTION
// ============================================

/// Collects all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

/// A timer for measuring stage latency
pub struct StageTimer {
    stage: &'static str,
    start: std::time::Instant,
}

impl StageTimer {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed().as_secs_f64();
        record_stage_latency(self.stage, elapsed);
    }
}

/// Macro for timing a stage
#[macro_export]
macro_rules! time_stage {
    ($stage:expr, $block:expr) => {{
        let _timer = $crate::metrics::StageTimer::new($stage);
        $block
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics() {
        let stats = ClusterStats {
            input_items: 5,
            unique_items: 4,
            duplicates_removed: 1,
            merges: 2,
            clusters: 2,
        };
        record_run("world", &stats);
        record_stage_latency(STAGE_COMPARE, 0.002);
        record_error(STAGE_SECTION, "missing_input");

        let metrics = gather_metrics();
        assert!(metrics.contains("clustering_items_total"));
        assert!(metrics.contains("clustering_duplicates_removed_total"));
        assert!(metrics.contains("clustering_stage_latency_seconds"));
        assert!(metrics.contains("clustering_errors_total"));
    }

    #[test]
    fn test_stage_timer() {
        let value = time_stage!(STAGE_RANK, {
            std::thread::sleep(std::time::Duration::from_millis(2));
            7
        });
        assert_eq!(value, 7);

        let metrics = gather_metrics();
        assert!(metrics.contains("stage=\"rank\""));
    }
}
