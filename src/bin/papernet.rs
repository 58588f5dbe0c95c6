//! Papernet CLI: incremental research-paper knowledge graph.
//!
//! Usage:
//!   papernet run [--config path] [--store path] [--seeds path] [--dry-run] [-v]
//!   papernet stats [--config path] [--store path]

use clap::{Parser, Subcommand};
use papernet::{Aggregator, AggregatorConfig, GraphStore, JsonFileStore, NodeGroup, OpenStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "papernet",
    version,
    about = "Incremental knowledge graph of research papers, authors and topics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the YAML config (default: <data dir>/papernet/papernet.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one aggregation pass
    Run {
        /// Graph file, overriding the config
        #[arg(long)]
        store: Option<PathBuf>,
        /// Seed file, overriding the config
        #[arg(long)]
        seeds: Option<PathBuf>,
        /// Ingest but do not write the graph or notify
        #[arg(long)]
        dry_run: bool,
    },
    /// Print node and link counts of the persisted graph
    Stats {
        /// Graph file, overriding the config
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

/// Get the default config path (~/.local/share/papernet/papernet.yaml)
fn default_config_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("papernet").join("papernet.yaml")
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit config must load; the default location may be absent
fn load_config(explicit: Option<&Path>) -> Result<AggregatorConfig, String> {
    match explicit {
        Some(path) => AggregatorConfig::load(path).map_err(|e| e.to_string()),
        None => {
            let path = default_config_path();
            if path.exists() {
                AggregatorConfig::load(&path).map_err(|e| e.to_string())
            } else {
                tracing::info!(path = %path.display(), "no config file, using built-in arXiv defaults");
                Ok(AggregatorConfig::arxiv_default())
            }
        }
    }
}

async fn cmd_run(
    mut config: AggregatorConfig,
    store: Option<PathBuf>,
    seeds: Option<PathBuf>,
    dry_run: bool,
) -> i32 {
    if let Some(store) = store {
        config.store_path = store;
    }
    if let Some(seeds) = seeds {
        config.seed_path = Some(seeds);
    }

    let store = Arc::new(JsonFileStore::open(&config.store_path));
    let aggregator = match Aggregator::from_config(config, store) {
        Ok(aggregator) => aggregator.dry_run(dry_run),
        Err(e) => {
            eprintln!("Error: cannot set up providers: {}", e);
            return 1;
        }
    };

    match aggregator.run().await {
        Ok(report) => {
            if report.new_items.is_empty() {
                println!("No new papers.");
            } else if report.flushed {
                println!("{} new paper(s) added to the graph.", report.new_count());
            } else {
                println!("{} new paper(s) found (dry run, graph not written).", report.new_count());
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_stats(config: &AggregatorConfig, store: Option<PathBuf>) -> i32 {
    let store = JsonFileStore::open(store.unwrap_or_else(|| config.store_path.clone()));
    let graph = store.load();

    println!("{}", store.path().display());
    println!("{:<8}  {:>7}", "GROUP", "NODES");
    println!("{}", "-".repeat(17));
    for group in [NodeGroup::Paper, NodeGroup::Author, NodeGroup::Topic] {
        println!("{:<8}  {:>7}", group, graph.group_count(group));
    }
    println!("{}", "-".repeat(17));
    println!("{:<8}  {:>7}", "nodes", graph.node_count());
    println!("{:<8}  {:>7}", "links", graph.link_count());
    0
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Run {
            store,
            seeds,
            dry_run,
        } => cmd_run(config, store, seeds, dry_run).await,
        Commands::Stats { store } => cmd_stats(&config, store),
    };
    std::process::exit(code);
}
