//! Section Runner
//!
//! Clusters each configured section independently: load `<section>.json`,
//! keep items inside the age window, cluster on a blocking task, rank, and
//! write one combined document keyed by section name.
//!
//! A section that fails to load is logged and skipped; the others still land.

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::engine::{ClusterEngine, ClusterParams, ClusterStats};
use crate::error::{ClusteringError, Result};
use crate::metrics::{self, StageTimer, STAGE_SECTION};
use crate::popularity::rank_clusters;
use crate::schemas::{Cluster, NewsItem, SectionClusters};

/// Parses a look-back window such as "48h", "30m", "2d" or "1h 30m"
pub fn parse_since(since_str: &str) -> Result<Duration> {
    let since_str = since_str.trim().to_lowercase();

    if since_str.is_empty() {
        return Err(ClusteringError::DurationError("empty duration string".to_string()));
    }

    // Try humantime first for complex formats
    if let Ok(std_duration) = humantime::parse_duration(&since_str) {
        return Duration::from_std(std_duration)
            .map_err(|e| ClusteringError::DurationError(e.to_string()));
    }

    // Parse simple formats like "1h", "30m", "2d"
    let unit_start = since_str.char_indices().last().map_or(0, |(i, _)| i);
    let (value_str, unit) = since_str.split_at(unit_start);
    let value: i64 = value_str
        .parse()
        .map_err(|_| ClusteringError::DurationError(since_str.clone()))?;

    let duration = match unit {
        "s" => Duration::try_seconds(value),
        "m" => Duration::try_minutes(value),
        "h" => Duration::try_hours(value),
        "d" => Duration::try_days(value),
        "w" => Duration::try_weeks(value),
        _ => return Err(ClusteringError::DurationError(format!("unknown duration unit: {}", unit))),
    };
    duration.ok_or_else(|| ClusteringError::DurationError(format!("duration out of range: {}", since_str)))
}

/// Keeps items published within `max_age` of `now`.
///
/// Items whose timestamp cannot be parsed are kept, and so is everything when
/// the window reaches past the representable range.
pub fn retain_recent(items: Vec<NewsItem>, now: DateTime<Utc>, max_age: Duration) -> Vec<NewsItem> {
    let Some(cutoff) = now.checked_sub_signed(max_age) else {
        return items;
    };
    items
        .into_iter()
        .filter(|item| item.published_time().map_or(true, |t| t >= cutoff))
        .collect()
}

/// Reads a JSON array of items
pub async fn read_items(path: &Path) -> Result<Vec<NewsItem>> {
    let data = fs::read(path).await?;
    let items: Vec<NewsItem> = serde_json::from_slice(&data)?;
    Ok(items)
}

/// Writes `value` as pretty JSON via a temp file and rename
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(value)?;

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(&json).await?;
    file.sync_all().await?;

    fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), bytes = json.len(), "Output written");
    Ok(())
}

/// Outcome of a multi-section run
#[derive(Debug, Clone, Default)]
pub struct SectionReport {
    pub succeeded: BTreeMap<String, ClusterStats>,
    /// Section name -> error message
    pub failed: BTreeMap<String, String>,
    pub output_path: PathBuf,
}

impl SectionReport {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

async fn cluster_section(
    config: &Config,
    section: String,
    now: DateTime<Utc>,
) -> (String, Result<(Vec<Cluster>, ClusterStats)>) {
    let _timer = StageTimer::new(STAGE_SECTION);
    let path = config.section_input_path(&section);

    let items = match read_items(&path).await {
        Ok(items) => items,
        Err(e) => {
            let err = ClusteringError::SectionInput {
                section: section.clone(),
                reason: format!("{}: {}", path.display(), e),
            };
            return (section, Err(err));
        }
    };

    let loaded = items.len();
    let items = retain_recent(items, now, config.max_item_age());
    debug!(section = %section, loaded, retained = items.len(), "Section items loaded");

    let engine = ClusterEngine::new(ClusterParams::from_config(config)).with_label(&section);
    let rank = config.rank_by_popularity;

    let joined = tokio::task::spawn_blocking(move || {
        let mut run = engine.run(&items);
        if rank {
            rank_clusters(&mut run.clusters, now);
        }
        run
    })
    .await;

    match joined {
        Ok(run) => (section, Ok((run.clusters, run.stats))),
        Err(e) => {
            let err = ClusteringError::SectionInput {
                section: section.clone(),
                reason: format!("clustering task failed: {}", e),
            };
            (section, Err(err))
        }
    }
}

/// Clusters every section concurrently and writes `config.output_path()`.
///
/// Fails only when the output cannot be written or when no section succeeds.
pub async fn run_sections(config: &Config, sections: &[String], now: DateTime<Utc>) -> Result<SectionReport> {
    info!(sections = sections.len(), input_dir = %config.input_dir.display(), "Running sections");

    let results = join_all(
        sections
            .iter()
            .map(|section| cluster_section(config, section.clone(), now)),
    )
    .await;

    let mut report = SectionReport {
        output_path: config.output_path(),
        ..Default::default()
    };
    let mut document = SectionClusters {
        generated_at: now.to_rfc3339(),
        sections: BTreeMap::new(),
    };

    for (section, result) in results {
        match result {
            Ok((clusters, stats)) => {
                report.succeeded.insert(section.clone(), stats);
                document.sections.insert(section, clusters);
            }
            Err(e) => {
                error!(section = %section, error = %e, "Section failed");
                metrics::record_error(STAGE_SECTION, "section_input");
                report.failed.insert(section, e.to_string());
            }
        }
    }

    if document.sections.is_empty() && !sections.is_empty() {
        return Err(ClusteringError::SectionInput {
            section: sections.join(","),
            reason: "no section could be clustered".to_string(),
        });
    }
    if !report.all_ok() {
        warn!(failed = report.failed.len(), "Some sections were skipped");
    }

    write_json(&report.output_path, &document).await?;
    info!(
        written = document.sections.len(),
        path = %report.output_path.display(),
        "Section clusters written"
    );
    Ok(report)
}
