//! NewsItem Schema
//!
//! A single normalized feed entry, as handed over by the ingest process.

use serde::{Deserialize, Serialize};
use super::common::{parse_timestamp, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsItem {
    /// Outlet label as configured in the feed list (e.g. "Reuters")
    pub source: String,
    pub url: String,
    pub published_at: Timestamp,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standfirst: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    /// Rank within the origin feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewsItem {
    pub fn new(source: &str, url: &str, published_at: &str, title: &str) -> Self {
        Self {
            source: source.to_string(),
            url: url.to_string(),
            published_at: published_at.to_string(),
            title: title.to_string(),
            standfirst: None,
            content: None,
            canonical_url: None,
            feed_position: None,
            image_url: None,
        }
    }

    pub fn with_standfirst(mut self, standfirst: &str) -> Self {
        self.standfirst = Some(standfirst.to_string());
        self
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn with_canonical_url(mut self, canonical_url: &str) -> Self {
        self.canonical_url = Some(canonical_url.to_string());
        self
    }

    pub fn with_image_url(mut self, image_url: &str) -> Self {
        self.image_url = Some(image_url.to_string());
        self
    }

    /// Length of the body in chars; zero when there is no body
    pub fn content_len(&self) -> usize {
        self.content.as_deref().map_or(0, |c| c.chars().count())
    }

    /// Text used for fingerprinting: title plus standfirst
    pub fn fingerprint_text(&self) -> String {
        format!("{} {}", self.title, self.standfirst.as_deref().unwrap_or(""))
    }

    pub fn published_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        parse_timestamp(&self.published_at)
    }
}
