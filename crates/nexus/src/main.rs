use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use extract::BackendKind;
use ingest::GraphStore;
use nexus::{AppConfig, Pipeline, logging, probe_runtimes};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Nexus: turn documents into a NODE/EDGE knowledge graph
#[derive(Parser, Debug)]
#[command(name = "nexus")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "NEXUS_CONFIG")]
    config: Option<PathBuf>,

    /// Extraction backend (hybrid, pattern or hosted)
    #[arg(short, long, global = true)]
    backend: Option<BackendKind>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Print command output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a graph from a .txt or .md file and overwrite the Graph Document
    Process {
        /// Uploaded document
        input: PathBuf,
        /// Graph Document to write (defaults to graph_path from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert a hierarchical mindmap rendering back to flat triples
    Mindmap {
        /// Mindmap file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
    /// List node names in the Graph Document
    Nodes {
        /// Graph Document to read (defaults to graph_path from config)
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },
    /// Check that the configured model runtimes answer
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.extract.backend = backend;
    }
    logging::init(&config.log_level, cli.json_logs)?;

    match cli.command {
        Command::Process { input, output } => {
            let store = GraphStore::new(output.unwrap_or(config.graph_path.clone()));
            let pipeline = Pipeline::from_config(&config.extract).await;
            let summary = pipeline.process_file(&input, &store).await?;
            if cli.json {
                println!("{}", serde_json::to_string(&summary)?);
            } else {
                println!("{summary}");
            }
        }
        Command::Mindmap { file } => {
            let text = match file {
                Some(path) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read mindmap: {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin()
                        .read_to_string(&mut buf)
                        .await
                        .context("Failed to read mindmap from stdin")?;
                    buf
                }
            };
            print!("{}", graph::reconstruct(&text)?);
        }
        Command::Nodes { graph } => {
            let store = GraphStore::new(graph.unwrap_or(config.graph_path.clone()));
            let nodes = store.nodes().await?;
            if cli.json {
                println!("{}", serde_json::to_string(&nodes)?);
            } else {
                for node in nodes {
                    println!("{node}");
                }
            }
        }
        Command::Probe => {
            let statuses = probe_runtimes(&config.extract).await;
            if statuses.is_empty() {
                println!("{} backend uses no model runtime", config.extract.backend);
            }
            for status in &statuses {
                println!("{status}");
            }
        }
    }

    Ok(())
}
