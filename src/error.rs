//! Error types for the clustering service
//!
//! The clustering core itself never fails; these errors only surface from
//! configuration, file loading and the section runner.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusteringError {
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid similarity threshold: {0} (expected a value in [0, 1])")]
    InvalidThreshold(f64),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Invalid data: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Section {section} could not be loaded: {reason}")]
    SectionInput {
        section: String,
        reason: String,
    },

    #[error("Invalid duration: {0}")]
    DurationError(String),
}

pub type Result<T> = std::result::Result<T, ClusteringError>;
