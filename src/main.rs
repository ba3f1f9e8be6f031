//! # Bookdex CLI
//!
//! The `bookdex` binary is the primary interface for the gateway. All
//! commands accept a `--config` flag pointing to a TOML configuration file
//! describing the engine connection and the server bind address.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `bookdex serve` | Start the HTTP API server |
//! | `bookdex search "<query>"` | Search indexed books |
//! | `bookdex get <id>` | Fetch a full book by id |
//! | `bookdex put <file>` | Upsert a book from a JSON file |
//! | `bookdex delete <id>` | Delete a book by id |
//! | `bookdex stats` | Show index and cluster diagnostics |
//! | `bookdex load <file>` | Bulk-load a producer NDJSON file |

mod config;
mod engine;
mod error;
mod identity;
mod lifecycle;
mod load;
mod model;
mod normalize;
mod query;
mod search;
mod server;
mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// Bookdex — a search gateway for e-book metadata.
#[derive(Parser)]
#[command(
    name = "bookdex",
    about = "Bookdex — a search gateway for e-book metadata",
    version,
    long_about = "Bookdex exposes indexing, retrieval, deletion, and full-text search over \
    book metadata stored in an external Elasticsearch-compatible engine, via a CLI and a \
    JSON HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/bookdex.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and serves the
    /// search, book lifecycle, and stats endpoints.
    Serve,

    /// Search indexed books.
    Search {
        /// Free-text search term.
        query: String,
        /// Maximum number of results (1-50, default 5).
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Fetch a full book by its identifier.
    Get {
        /// Book identifier (12 hex characters).
        id: String,
    },

    /// Upsert a book from a JSON file.
    ///
    /// The identifier is derived from the title; putting the same title
    /// twice overwrites the stored document.
    Put {
        /// Path to a book JSON file.
        file: PathBuf,
    },

    /// Delete a book by its identifier.
    Delete {
        /// Book identifier (12 hex characters).
        id: String,
    },

    /// Show index document count and cluster health.
    Stats,

    /// Bulk-load books from a producer NDJSON file.
    ///
    /// Expects alternating `{"index": {...}}` metadata lines and book
    /// JSON lines, the format the bibliographic fetch script writes.
    Load {
        /// Path to the NDJSON file.
        file: PathBuf,
        /// Action/document pairs per bulk request.
        #[arg(long, default_value_t = 500)]
        batch: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookdex=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    let engine = Arc::new(engine::EngineClient::new(&cfg.engine)?);

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg, engine).await?;
        }
        Commands::Search { query, limit } => {
            search::run_search(&engine, &query, limit).await?;
        }
        Commands::Get { id } => {
            lifecycle::run_get(&engine, &id).await?;
        }
        Commands::Put { file } => {
            lifecycle::run_put(&engine, &file).await?;
        }
        Commands::Delete { id } => {
            lifecycle::run_delete(&engine, &id).await?;
        }
        Commands::Stats => {
            stats::run_stats(&engine).await?;
        }
        Commands::Load { file, batch } => {
            load::run_load(&engine, &file, batch).await?;
        }
    }

    Ok(())
}
