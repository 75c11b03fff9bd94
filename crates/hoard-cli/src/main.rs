//! Hoard CLI - Command-line interface for the hoard asset importer

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{catalog, import, inspect};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hoard")]
#[command(about = "Rebuild a game asset catalog from a content-addressed store", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify every asset in a store and upsert the results into the catalog
    Import {
        /// Store directory (overrides config)
        #[arg(long)]
        store: Option<String>,

        /// Catalog file (overrides config)
        #[arg(long)]
        catalog: Option<String>,

        /// Platform context: ps3, vita, psp, rpcs3, website
        #[arg(long)]
        platform: Option<String>,

        /// Read configuration from this file instead of the layered defaults
        #[arg(long)]
        config: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Verify a single asset file and print its record
    Verify {
        /// Path to the asset file
        file: String,

        /// Expected content hash (defaults to the file name)
        #[arg(long)]
        hash: Option<String>,

        /// Platform context: ps3, vita, psp, rpcs3, website
        #[arg(long)]
        platform: Option<String>,

        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },

    /// Print the dependency table of an asset file
    Deps {
        /// Path to the asset file
        file: String,
    },

    /// Catalog queries
    #[command(subcommand)]
    Catalog(catalog::CatalogCommands),
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "hoard starting");

    match cli.command {
        Commands::Import {
            store,
            catalog,
            platform,
            config,
            format,
        } => import::run(import::ImportArgs {
            store,
            catalog,
            platform,
            config,
            format,
        }),
        Commands::Verify {
            file,
            hash,
            platform,
            format,
        } => inspect::run_verify(&file, hash.as_deref(), platform.as_deref(), &format),
        Commands::Deps { file } => inspect::run_deps(&file),
        Commands::Catalog(cmd) => catalog::run(cmd),
    }
}
