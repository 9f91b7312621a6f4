//! Configuration for the clustering service

use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;
use validator::Validate;

use crate::error::{ClusteringError, Result};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    // Clustering
    #[serde(default = "default_similarity_threshold")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub similarity_threshold: f64,
    #[serde(default = "default_shingle_sizes")]
    #[validate(length(min = 1, max = 8))]
    pub shingle_sizes: Vec<usize>,

    // Section runner
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_max_item_age_hours")]
    #[validate(range(min = 1, max = 87600))]
    pub max_item_age_hours: u64,
    #[serde(default = "default_rank_by_popularity")]
    pub rank_by_popularity: bool,

    // Metrics are always recorded; this only gates `--print-metrics` output
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_similarity_threshold() -> f64 {
    0.18
}

fn default_shingle_sizes() -> Vec<usize> {
    crate::shingles::DEFAULT_SHINGLE_SIZES.to_vec()
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./data/items")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./data/clusters")
}

fn default_max_item_age_hours() -> u64 {
    48
}

fn default_rank_by_popularity() -> bool {
    true
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            shingle_sizes: default_shingle_sizes(),
            sections: Vec::new(),
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            max_item_age_hours: default_max_item_age_hours(),
            rank_by_popularity: default_rank_by_popularity(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        Self::from_environment(config::Environment::default())
    }

    /// Builds the config from an environment source (process env or a fixed map)
    pub fn from_environment(env: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(
                env.separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("shingle_sizes")
                    .with_list_parse_key("sections"),
            )
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.similarity_threshold.is_nan() {
            return Err(ClusteringError::InvalidThreshold(self.similarity_threshold));
        }
        Validate::validate(self)?;
        if self.shingle_sizes.contains(&0) {
            return Err(ClusteringError::InvalidConfigValue(
                "shingle sizes must be positive".to_string(),
            ));
        }
        if self.similarity_threshold == 0.0 {
            warn!("Similarity threshold is 0; every fingerprinted item will merge into one cluster");
        }
        Ok(())
    }

    /// Age window for section items; saturates at the largest representable span.
    pub fn max_item_age(&self) -> chrono::Duration {
        i64::try_from(self.max_item_age_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Path of the item file for one section
    pub fn section_input_path(&self, section: &str) -> PathBuf {
        self.input_dir.join(format!("{}.json", section))
    }

    /// Path of the combined cluster document
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join("clusters.json")
    }
}
