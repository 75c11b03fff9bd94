//! Catalog query commands

use anyhow::Result;
use clap::Subcommand;
use hoard_asset::{AssetCatalog, AssetRecord, AssetType};
use hoard_import::ImportConfig;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List cataloged assets
    List {
        /// Filter by asset type (level, plan, texture, png, ...)
        #[arg(long, rename_all = "lowercase")]
        r#type: Option<String>,

        /// Catalog file (overrides config)
        #[arg(long)]
        catalog: Option<String>,

        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },

    /// Show one asset record
    Info {
        /// Content hash
        hash: String,

        /// Catalog file (overrides config)
        #[arg(long)]
        catalog: Option<String>,
    },

    /// List assets whose dependency table references a hash
    Dependents {
        /// Content hash
        hash: String,

        /// Catalog file (overrides config)
        #[arg(long)]
        catalog: Option<String>,
    },
}

pub fn run(cmd: CatalogCommands) -> Result<()> {
    match cmd {
        CatalogCommands::List {
            r#type,
            catalog,
            format,
        } => run_list(r#type.as_deref(), catalog, &format),
        CatalogCommands::Info { hash, catalog } => run_info(&hash, catalog),
        CatalogCommands::Dependents { hash, catalog } => run_dependents(&hash, catalog),
    }
}

fn open_catalog(path: Option<String>) -> Result<AssetCatalog> {
    let path = match path {
        Some(p) => PathBuf::from(p),
        None => ImportConfig::load()?.catalog_path,
    };
    Ok(AssetCatalog::open(path)?)
}

fn run_list(type_filter: Option<&str>, catalog: Option<String>, format: &str) -> Result<()> {
    let catalog = open_catalog(catalog)?;

    let records: Vec<&AssetRecord> = match type_filter {
        Some(t) => catalog.by_type(t.parse::<AssetType>()?),
        None => catalog.records(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&records)?),
        "toml" => {
            for record in &records {
                println!("[[asset]]");
                print!("{}", toml::to_string_pretty(record)?);
                println!();
            }
        }
        other => anyhow::bail!("Unknown format '{}'. Use: toml, json", other),
    }

    eprintln!("{} assets", records.len());
    Ok(())
}

fn run_info(hash: &str, catalog: Option<String>) -> Result<()> {
    let catalog = open_catalog(catalog)?;
    let record = catalog
        .get(hash)
        .ok_or_else(|| anyhow::anyhow!("Asset '{}' not found in catalog", hash))?;

    println!("Hash:         {}", record.content_hash);
    println!("Type:         {}", record.asset_type);
    println!("Safety:       {}", record.safety_level());
    println!("Size:         {} bytes", record.size_in_bytes);
    println!("Variant:      {}", record.is_platform_variant);
    println!("Uploaded at:  {}", record.uploaded_at);
    println!(
        "Uploader:     {}",
        record.original_uploader.as_deref().unwrap_or("(unknown)")
    );
    println!("Dependencies: {}", record.dependencies.len());
    for dep in &record.dependencies {
        let known = if catalog.get(dep).is_some() { "" } else { "  (missing)" };
        println!("  {}{}", dep, known);
    }
    Ok(())
}

fn run_dependents(hash: &str, catalog: Option<String>) -> Result<()> {
    let catalog = open_catalog(catalog)?;
    let dependents = catalog.dependents_of(hash);

    for record in &dependents {
        println!("{} ({})", record.content_hash, record.asset_type);
    }
    eprintln!("{} assets reference {}", dependents.len(), hash);
    Ok(())
}
