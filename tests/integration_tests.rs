//! Integration Tests for the clustering engine and section runner
//!
//! Run with: cargo test --test integration_tests

use std::collections::HashSet;

use news_clusters::config::Config;
use news_clusters::dedup::{dedupe_items, hostname, is_same_article};
use news_clusters::engine::{cluster_items, ClusterEngine, ClusterParams};
use news_clusters::normalize::normalize;
use news_clusters::schemas::{newest_first, parse_timestamp, Cluster, NewsItem, SectionClusters};
use news_clusters::sections::run_sections;

fn item(source: &str, url: &str, published_at: &str, title: &str) -> NewsItem {
    NewsItem::new(source, url, published_at, title)
}

/// A mixed batch: cross-outlet stories, same-host rewrites, duplicates, junk URLs
fn corpus() -> Vec<NewsItem> {
    vec![
        item("Reuters", "https://www.reuters.com/world/quake-1", "2024-09-10T08:00:00Z", "Strong earthquake strikes off coast of Chile")
            .with_standfirst("Tsunami warning issued for coastal towns"),
        item("BBC", "https://www.bbc.co.uk/news/quake", "2024-09-10T09:30:00Z", "Earthquake strikes off Chile coast, tsunami warning issued"),
        item("Guardian", "https://www.theguardian.com/world/chile-quake?utm_source=rss", "2024-09-10T07:45:00Z", "Chile earthquake: tsunami warning for coastal towns"),
        item("Guardian", "https://www.theguardian.com/world/chile-quake", "2024-09-10T07:45:00Z", "Chile earthquake: tsunami warning for coastal towns")
            .with_content("Full body of the Guardian piece with much more detail."),
        item("Verge", "https://www.theverge.com/apple/iphone", "2024-09-09T18:00:00Z", "Apple launches iPhone 16")
            .with_image_url("https://www.theverge.com/img/iphone.jpg"),
        item("Wired", "https://www.wired.com/story/iphone-16", "2024-09-09T19:00:00Z", "iPhone 16 launch"),
        item("Wired", "https://www.wired.com/story/iphone-16-review", "2024-09-09T20:00:00Z", "Apple iPhone 16 launch review"),
        item("Local", "https://localpaper.example/bakery", "2024-09-10T06:00:00Z", "Village bakery celebrates centenary"),
        item("Wire", "not-a-url", "2024-09-10T05:00:00Z", "Markets steady ahead of central bank decision"),
        item("Wire", "::also-broken::", "2024-09-10T04:00:00Z", "Markets steady ahead of central bank meeting"),
        item("Undated", "https://undated.example/x", "unknown", "Climate report warns of rising seas"),
    ]
}

fn assert_invariants(input: &[NewsItem], clusters: &[Cluster]) {
    let unique = dedupe_items(input).unique;

    // Partition: every deduplicated item appears exactly once
    let members: Vec<&NewsItem> = clusters.iter().flat_map(|c| c.items.iter()).collect();
    assert_eq!(members.len(), unique.len());
    for u in &unique {
        assert_eq!(members.iter().filter(|m| **m == u).count(), 1, "{:?}", u.url);
    }

    for cluster in clusters {
        assert!(!cluster.items.is_empty());
        assert!(cluster.coverage >= 1);

        let hosts: HashSet<String> = cluster
            .items
            .iter()
            .map(|i| hostname(&i.url).unwrap_or_else(|| i.source.clone()))
            .collect();
        assert_eq!(cluster.coverage, hosts.len());

        assert_eq!(cluster.updated_at, cluster.items[0].published_at);
        assert_eq!(cluster.title, cluster.items[0].title);
        for pair in cluster.items.windows(2) {
            assert_ne!(
                newest_first(&pair[0].published_at, &pair[1].published_at),
                std::cmp::Ordering::Greater
            );
        }
    }

    for pair in clusters.windows(2) {
        assert!(pair[0].coverage >= pair[1].coverage);
        if pair[0].coverage == pair[1].coverage {
            assert_ne!(
                newest_first(&pair[0].updated_at, &pair[1].updated_at),
                std::cmp::Ordering::Greater
            );
        }
    }

    let ids: HashSet<&str> = clusters.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), clusters.len());
}

#[test]
fn test_invariants_across_thresholds() {
    let input = corpus();
    for threshold in [0.0, 0.1, 0.18, 0.3, 0.5, 0.9, 1.0] {
        let clusters = cluster_items(&input, threshold);
        assert_invariants(&input, &clusters);
    }
}

#[test]
fn test_corpus_groups_stories() {
    let input = corpus();
    let run = ClusterEngine::new(ClusterParams::default()).run(&input);

    // The Guardian re-poll collapses into the copy with a body
    assert_eq!(run.stats.duplicates_removed, 1);
    let quake = &run.clusters[0];
    assert_eq!(quake.coverage, 3);
    assert!(quake
        .items
        .iter()
        .any(|i| i.content.as_deref().is_some_and(|c| c.starts_with("Full body"))));

    let iphone = run
        .clusters
        .iter()
        .find(|c| c.items.iter().any(|i| i.source == "Verge"))
        .unwrap();
    // Two Wired pages count as one host
    assert_eq!(iphone.items.len(), 3);
    assert_eq!(iphone.coverage, 2);
    assert_eq!(iphone.featured_image.as_deref(), Some("https://www.theverge.com/img/iphone.jpg"));

    // Broken URLs share a source label, so they count once
    let markets = run
        .clusters
        .iter()
        .find(|c| c.items.iter().any(|i| i.source == "Wire"))
        .unwrap();
    assert_eq!(markets.items.len(), 2);
    assert_eq!(markets.coverage, 1);
}

#[test]
fn test_scenario_identical_titles_two_outlets() {
    let items = vec![
        item("TechCrunch", "https://techcrunch.com/2024/09/09/iphone-16", "2024-09-09T18:00:00Z", "Apple Unveils iPhone 16"),
        item("NYTimes", "https://nytimes.com/2024/09/09/technology/iphone-16.html", "2024-09-09T18:05:00Z", "Apple Unveils iPhone 16"),
    ];
    let clusters = cluster_items(&items, 0.5);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].coverage, 2);
    assert_eq!(clusters[0].items[0].source, "NYTimes");
}

#[test]
fn test_scenario_same_hostname() {
    let items = vec![
        item("Example", "https://example.com/tech/iphone", "2024-09-09T18:00:00Z", "Apple Unveils iPhone 16")
            .with_canonical_url("https://example.com/c/1"),
        item("Example Mobile", "https://example.com/mobile/iphone", "2024-09-09T18:00:00Z", "Apple Unveils iPhone 16")
            .with_canonical_url("https://example.com/c/2"),
    ];
    let clusters = cluster_items(&items, 0.5);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].items.len(), 2);
    assert_eq!(clusters[0].coverage, 1);
}

#[test]
fn test_scenario_duplicate_url() {
    let a = item("BBC", "https://www.bbc.co.uk/news/world-1", "2024-09-09T18:00:00Z", "Ceasefire talks resume");
    let clusters = cluster_items(&[a.clone(), a.clone()], 0.18);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].items, vec![a]);
}

#[test]
fn test_scenario_related_and_unrelated() {
    let items = vec![
        item("Verge", "https://www.theverge.com/a", "2024-09-09T18:00:00Z", "iPhone 16 launch"),
        item("Wired", "https://www.wired.com/b", "2024-09-09T17:00:00Z", "Apple launches iPhone 16"),
        item("Guardian", "https://www.theguardian.com/c", "2024-09-09T19:00:00Z", "Climate report warns of rising seas"),
    ];
    let clusters = cluster_items(&items, 0.18);
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].coverage, 2);
    assert_eq!(clusters[1].coverage, 1);
    assert_eq!(clusters[1].items[0].source, "Guardian");
}

#[test]
fn test_scenario_empty_input() {
    assert!(cluster_items(&[], 0.18).is_empty());
}

#[test]
fn test_same_article_symmetry_over_corpus() {
    let input = corpus();
    for a in &input {
        for b in &input {
            assert_eq!(is_same_article(a, b), is_same_article(b, a));
        }
    }
}

#[test]
fn test_normalize_idempotent_over_corpus() {
    for i in corpus() {
        let once = normalize(&i.title);
        assert_eq!(normalize(&once), once);
    }
}

fn write_section(dir: &std::path::Path, name: &str, items: &[NewsItem]) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(format!("{}.json", name)), serde_json::to_vec(items).unwrap()).unwrap();
}

#[tokio::test]
async fn test_section_runner_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    let config = Config {
        input_dir: root.path().join("items"),
        output_dir: root.path().join("out"),
        ..Config::default()
    };

    let world = vec![
        item("Reuters", "https://www.reuters.com/a", "2024-09-10T10:00:00Z", "Ceasefire talks resume in Cairo"),
        item("BBC", "https://www.bbc.co.uk/b", "2024-09-10T11:00:00Z", "Ceasefire talks resume in Cairo"),
        item("Old", "https://old.example/c", "2024-09-01T11:00:00Z", "Ceasefire talks resume in Cairo"),
    ];
    let tech = vec![item("Verge", "https://www.theverge.com/a", "2024-09-10T09:00:00Z", "Apple launches iPhone 16")];
    write_section(&config.input_dir, "world", &world);
    write_section(&config.input_dir, "tech", &tech);

    let now = parse_timestamp("2024-09-10T12:00:00Z").unwrap();
    let sections = vec!["world".to_string(), "tech".to_string(), "missing".to_string()];
    let report = run_sections(&config, &sections, now).await.unwrap();

    assert_eq!(report.succeeded.len(), 2);
    assert!(report.failed.contains_key("missing"));
    // The week-old copy falls outside the 48h window
    assert_eq!(report.succeeded["world"].input_items, 2);

    let written: SectionClusters =
        serde_json::from_slice(&std::fs::read(config.output_path()).unwrap()).unwrap();
    assert_eq!(written.sections.len(), 2);
    let world_clusters = &written.sections["world"];
    assert_eq!(world_clusters.len(), 1);
    assert_eq!(world_clusters[0].coverage, 2);
    assert!(world_clusters[0].popularity_score.is_some());
    assert!(!written.sections.contains_key("missing"));
}

#[tokio::test]
async fn test_section_runner_all_missing() {
    let root = tempfile::tempdir().unwrap();
    let config = Config {
        input_dir: root.path().join("items"),
        output_dir: root.path().join("out"),
        ..Config::default()
    };
    let result = run_sections(&config, &["nothing".to_string()], chrono::Utc::now()).await;
    assert!(result.is_err());
    assert!(!config.output_path().exists());
}
