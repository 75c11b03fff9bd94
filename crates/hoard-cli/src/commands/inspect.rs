//! Single-file inspection commands

use anyhow::Result;
use hoard_asset::{
    parse_dependency_table, AssetClassifier, AssetType, AssetVerifier, MagicClassifier, Platform,
};
use std::path::Path;

pub fn run_verify(file: &str, hash: Option<&str>, platform: Option<&str>, format: &str) -> Result<()> {
    let path = Path::new(file);
    let data = std::fs::read(path)?;

    let claimed = match hash {
        Some(h) => h.to_string(),
        None => path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| anyhow::anyhow!("Cannot derive a hash from '{}'; pass --hash", file))?,
    };
    let platform = platform.map(str::parse::<Platform>).transpose()?;

    let record = AssetVerifier::default().verify(&claimed, &data, platform, None)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&record)?),
        "toml" => print!("{}", toml::to_string_pretty(&record)?),
        other => anyhow::bail!("Unknown format '{}'. Use: toml, json", other),
    }
    eprintln!("Safety: {}", record.safety_level());

    Ok(())
}

pub fn run_deps(file: &str) -> Result<()> {
    let data = std::fs::read(file)?;
    let (asset_type, deps) = table_dependencies(&data)
        .map_err(|e| anyhow::anyhow!("Could not read dependency table of {}: {}", file, e))?;

    for dep in &deps {
        println!("{}", dep);
    }
    eprintln!("{} dependencies ({})", deps.len(), asset_type);
    Ok(())
}

/// Classify `data` and decode its dependency table. Types that carry no
/// table are refused rather than parsed.
fn table_dependencies(data: &[u8]) -> Result<(AssetType, Vec<String>)> {
    let asset_type = MagicClassifier.classify(data, None);
    if !asset_type.has_dependency_table() {
        anyhow::bail!("{} assets carry no dependency table", asset_type);
    }
    let deps = parse_dependency_table(data)?;
    Ok((asset_type, deps))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `magic` followed by a table at offset 16 listing one hash
    fn with_table(magic: &[u8]) -> Vec<u8> {
        let mut data = magic.to_vec();
        data.resize(8, 0);
        data.extend_from_slice(&16u32.to_be_bytes());
        data.resize(16, 0);
        data.extend_from_slice(&1u32.to_be_bytes());
        data.push(0x1);
        data.extend_from_slice(&[0xab; 20]);
        data.extend_from_slice(&[0, 0, 0, 0]);
        data
    }

    #[test]
    fn test_level_table_is_listed() {
        let (asset_type, deps) = table_dependencies(&with_table(b"LVLb")).unwrap();
        assert_eq!(asset_type, AssetType::Level);
        assert_eq!(deps, vec!["ab".repeat(20)]);
    }

    #[test]
    fn test_image_with_table_shaped_body_is_refused() {
        let png = with_table(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
        let err = table_dependencies(&png).unwrap_err();
        assert!(err.to_string().contains("png"));
    }

    #[test]
    fn test_unknown_blob_is_refused() {
        assert!(table_dependencies(&with_table(b"????")).is_err());
    }

    #[test]
    fn test_truncated_table_is_an_error() {
        let mut data = with_table(b"PLNb");
        data.truncate(24);
        assert!(table_dependencies(&data).is_err());
    }
}
