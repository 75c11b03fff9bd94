//! Store-to-catalog import command

use anyhow::{Context, Result};
use hoard_asset::{AssetCatalog, FsStore, Platform};
use hoard_import::{AssetImporter, ImportConfig, ImportSummary};
use std::path::{Path, PathBuf};

pub struct ImportArgs {
    pub store: Option<String>,
    pub catalog: Option<String>,
    pub platform: Option<String>,
    pub config: Option<String>,
    pub format: String,
}

pub fn run(args: ImportArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ImportConfig::load_from_file(Path::new(path))?,
        None => ImportConfig::load()?,
    };

    if let Some(store) = args.store {
        config.store_dir = PathBuf::from(store);
    }
    if let Some(catalog) = args.catalog {
        config.catalog_path = PathBuf::from(catalog);
    }
    if let Some(platform) = args.platform.as_deref() {
        config.platform = Some(platform.parse::<Platform>()?);
    }

    if !config.store_dir.is_dir() {
        anyhow::bail!("Store directory '{}' does not exist", config.store_dir.display());
    }

    let store = FsStore::new(&config.store_dir);
    let mut catalog = AssetCatalog::open(&config.catalog_path)
        .with_context(|| format!("Failed to open catalog {}", config.catalog_path.display()))?;

    let summary = AssetImporter::default()
        .import_all(&store, &mut catalog, config.platform)
        .context("Import aborted; re-run the import once the catalog is writable")?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "text" => print_summary(&summary, &config.catalog_path),
        other => anyhow::bail!("Unknown format '{}'. Use: text, json", other),
    }

    Ok(())
}

fn print_summary(summary: &ImportSummary, catalog_path: &Path) {
    println!(
        "Imported {}/{} assets into {} ({} new, {} updated) in {:.2}s",
        summary.imported_count(),
        summary.processed_count,
        catalog_path.display(),
        summary.new_count,
        summary.updated_count,
        summary.elapsed_secs
    );

    if summary.rejected_count > 0 {
        println!("Rejected {} assets:", summary.rejected_count);
        for rejected in &summary.rejected {
            println!("  {}: {}", rejected.hash, rejected.reason);
        }
    }
}
