//! News Clusters CLI
//!
//! Batch clustering of normalized feed items:
//! - `cluster`: one item file (or stdin) to one cluster list
//! - `sections`: every configured section concurrently, one combined document
//! - `inspect`: duplicate and cluster counts without writing anything

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use news_clusters::config::Config;
use news_clusters::engine::{ClusterEngine, ClusterParams};
use news_clusters::metrics::gather_metrics;
use news_clusters::popularity::rank_clusters;
use news_clusters::schemas::NewsItem;
use news_clusters::sections::{parse_since, read_items, run_sections, write_json};

/// News Clusters - dedup, fingerprint and group syndicated news items
#[derive(Parser, Debug)]
#[command(name = "news-clusters")]
#[command(author = "NEURO Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Groups near-identical news items from many feeds into ranked story clusters")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, default_value = "false", global = true)]
    json_logs: bool,

    /// Print Prometheus metrics to stderr when done
    #[arg(long, default_value = "false", global = true)]
    print_metrics: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Cluster a single item file
    Cluster {
        /// JSON array of items, or "-" for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Similarity threshold (defaults to SIMILARITY_THRESHOLD)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Assign popularity scores and sort by them
        #[arg(short, long, default_value = "false")]
        rank: bool,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cluster every section under INPUT_DIR
    Sections {
        /// Comma-separated section names (defaults to SECTIONS)
        #[arg(short, long, value_delimiter = ',')]
        names: Vec<String>,

        /// Only keep items newer than this (e.g. "48h", "2d")
        #[arg(long)]
        since: Option<String>,
    },

    /// Show duplicate and cluster counts for an item file
    Inspect {
        /// JSON array of items, or "-" for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Similarity threshold (defaults to SIMILARITY_THRESHOLD)
        #[arg(short, long)]
        threshold: Option<f64>,
    },
}

/// Generates a new correlation ID for the run
fn generate_correlation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Sets up structured logging with tracing
fn setup_logging(log_level: &str, json_output: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    // stdout carries cluster JSON; logs go to stderr
    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli.log_level, cli.json_logs);

    let correlation_id = generate_correlation_id();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        correlation_id = %correlation_id,
        "Starting news clusters"
    );

    let mut config = Config::load()?;
    config.validate()?;

    info!(
        threshold = config.similarity_threshold,
        shingle_sizes = ?config.shingle_sizes,
        max_item_age_hours = config.max_item_age_hours,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Cluster { input, threshold, rank, output } => {
            cluster_once(&config, input, threshold, rank, output).await?;
        }

        Commands::Sections { names, since } => {
            if let Some(since) = since {
                let window = parse_since(&since)?;
                config.max_item_age_hours = (window.num_minutes().max(0) as u64).div_ceil(60).max(1);
            }
            let names = if names.is_empty() { config.sections.clone() } else { names };
            if names.is_empty() {
                anyhow::bail!("No sections given (pass --names or set SECTIONS)");
            }
            run_all_sections(&config, &names).await?;
        }

        Commands::Inspect { input, threshold } => {
            inspect(&config, input, threshold).await?;
        }
    }

    if cli.print_metrics && config.metrics_enabled {
        eprintln!("{}", gather_metrics());
    }

    Ok(())
}

async fn load_input(input: &Path) -> Result<Vec<NewsItem>> {
    if input.as_os_str() == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        return Ok(serde_json::from_slice(&buf)?);
    }
    Ok(read_items(input).await?)
}

fn params_for(config: &Config, threshold: Option<f64>) -> Result<ClusterParams> {
    let mut params = ClusterParams::from_config(config);
    if let Some(t) = threshold {
        params.threshold = t;
    }
    params.validate()?;
    Ok(params)
}

/// Clusters one file and writes the cluster list
async fn cluster_once(
    config: &Config,
    input: PathBuf,
    threshold: Option<f64>,
    rank: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let items = load_input(&input).await?;
    let params = params_for(config, threshold)?;

    info!(input = %input.display(), items = items.len(), threshold = params.threshold, "Clustering batch");

    let mut run = ClusterEngine::new(params).run(&items);
    if rank {
        rank_clusters(&mut run.clusters, chrono::Utc::now());
    }

    match output {
        Some(path) => {
            write_json(&path, &run.clusters).await?;
            info!(path = %path.display(), clusters = run.clusters.len(), "Clusters written");
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&run.clusters)?);
        }
    }
    Ok(())
}

async fn run_all_sections(config: &Config, names: &[String]) -> Result<()> {
    let report = run_sections(config, names, chrono::Utc::now()).await?;

    for (section, stats) in &report.succeeded {
        info!(
            section = %section,
            items = stats.input_items,
            clusters = stats.clusters,
            "Section done"
        );
    }
    for (section, reason) in &report.failed {
        warn!(section = %section, reason = %reason, "Section skipped");
    }
    Ok(())
}

/// Prints clustering counts for a batch
async fn inspect(config: &Config, input: PathBuf, threshold: Option<f64>) -> Result<()> {
    let items = load_input(&input).await?;
    let params = params_for(config, threshold)?;
    let threshold = params.threshold;
    let run = ClusterEngine::new(params).run(&items);
    let stats = &run.stats;

    println!("\nClustering Summary");
    println!("==================");
    println!("Input:      {}", input.display());
    println!("Threshold:  {}", threshold);
    println!("Items:      {}", stats.input_items);
    println!("Duplicates: {}", stats.duplicates_removed);
    println!("Unique:     {}", stats.unique_items);
    println!("Merges:     {}", stats.merges);
    println!("Clusters:   {}", stats.clusters);

    if !run.clusters.is_empty() {
        println!("\n{:<12} {:<9} {:<7} {}", "ID", "Coverage", "Items", "Headline");
        println!("{}", "-".repeat(85));
        for cluster in run.clusters.iter().take(20) {
            println!(
                "{:<12} {:<9} {:<7} {}",
                cluster.id,
                cluster.coverage,
                cluster.len(),
                cluster.neutral_headline
            );
        }
    }
    Ok(())
}
