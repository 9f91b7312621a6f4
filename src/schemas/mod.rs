//! Shared Schemas
//!
//! Input items and output clusters. Field names are snake_case to match the
//! JSON the ingest process writes and the frontend reads.

pub mod common;
pub mod news_item;
pub mod cluster;

pub use common::*;
pub use news_item::*;
pub use cluster::*;
