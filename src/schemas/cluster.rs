//! Cluster Schema
//!
//! Output of one clustering run: a group of items judged to report the
//! same underlying story.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use super::common::Timestamp;
use super::news_item::NewsItem;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cluster {
    /// Sequential id, only meaningful within one run
    pub id: String,
    /// Distinct member hostnames
    pub coverage: usize,
    pub updated_at: Timestamp,
    pub title: String,
    pub neutral_headline: String,
    /// Newest first
    pub items: Vec<NewsItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity_score: Option<f64>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Per-section output document written by the section runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionClusters {
    pub generated_at: Timestamp,
    pub sections: BTreeMap<String, Vec<Cluster>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_serialization() {
        let cluster = Cluster {
            id: "cluster-0".to_string(),
            coverage: 1,
            updated_at: "2024-01-15T10:00:00Z".to_string(),
            title: "Title".to_string(),
            neutral_headline: "Title".to_string(),
            items: vec![NewsItem::new(
                "BBC",
                "https://bbc.co.uk/a",
                "2024-01-15T10:00:00Z",
                "Title",
            )],
            featured_image: None,
            popularity_score: None,
        };

        let json = serde_json::to_string(&cluster).unwrap();
        assert!(json.contains("neutral_headline"));
        assert!(!json.contains("popularity_score"));

        let parsed: Cluster = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cluster);
    }
}
