//! Hybrid CLI - Command-line interface for hybrid search over a JSON corpus.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use fusion_core::HybridConfig;
use fusion_mcp::{HybridMcpServer, SearchParams};
use fusion_retrieve::{HashEmbedder, MemoryDocument, MemoryIndex};

type DemoServer = HybridMcpServer<MemoryIndex<HashEmbedder>, MemoryIndex<HashEmbedder>>;

/// Hybrid search - fused vector + keyword retrieval
#[derive(Parser)]
#[command(name = "hybrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file path (default: discovered per-user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a JSON corpus with hybrid retrieval
    Search {
        /// Search query
        query: String,

        /// Path to the corpus file: a JSON array of
        /// {document_id, content, metadata?} objects
        #[arg(long)]
        corpus: PathBuf,

        /// Maximum number of results
        #[arg(short = 'k', long)]
        limit: Option<usize>,

        /// Weight for the vector path
        #[arg(long)]
        vector_weight: Option<f32>,

        /// Weight for the text path
        #[arg(long)]
        text_weight: Option<f32>,

        /// RRF damping constant
        #[arg(long)]
        rrf_k: Option<f32>,
    },

    /// List the exposed MCP tools
    Tools,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<&PathBuf>) -> Result<HybridConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(HybridConfig::load(path)?),
        None => Ok(HybridConfig::load_default()?),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Search {
            query,
            corpus,
            limit,
            vector_weight,
            text_weight,
            rrf_k,
        } => {
            let documents = load_corpus(&corpus)?;
            if documents.is_empty() {
                println!("Corpus is empty: {}", corpus.display());
                return Ok(());
            }

            let index = Arc::new(
                MemoryIndex::build(Arc::new(HashEmbedder::new()), documents).await?,
            );
            let server = HybridMcpServer::new(index.clone(), index)
                .with_defaults(config.fusion)
                .with_retrieval_config(config.retrieval);

            let params = SearchParams {
                query,
                limit,
                vector_weight,
                text_weight,
                rrf_k,
            };
            search(&server, params).await;
        }
        Commands::Tools => {
            let info = DemoServer::info();
            println!("{} {} - {}\n", info.name, info.version, info.description);
            for tool in DemoServer::tools() {
                println!("- {}: {}", tool.name, tool.description);
            }
        }
    }

    Ok(())
}

fn load_corpus(path: &PathBuf) -> Result<Vec<MemoryDocument>, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let documents: Vec<MemoryDocument> = serde_json::from_str(&content)?;
    Ok(documents)
}

async fn search(server: &DemoServer, params: SearchParams) {
    let result = server.search(params).await;
    if result.success {
        println!("{}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        std::process::exit(1);
    }
}
