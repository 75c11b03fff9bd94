//! Asset type definitions

use chrono::{DateTime, Utc};
use hoard_core::HoardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Formats a stored blob can be classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Level,
    Plan,
    Material,
    Mesh,
    GfxMaterial,
    Palette,
    Script,
    VoiceRecording,
    Painting,
    Texture,
    GameDataTexture,
    Jpeg,
    Png,
    Tga,
    Unknown,
}

impl AssetType {
    /// Whether payloads of this type embed a dependency table.
    ///
    /// Image-like formats and unrecognised blobs never do.
    pub fn has_dependency_table(self) -> bool {
        !matches!(
            self,
            AssetType::Texture
                | AssetType::GameDataTexture
                | AssetType::Jpeg
                | AssetType::Png
                | AssetType::Tga
                | AssetType::Unknown
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Level => "level",
            AssetType::Plan => "plan",
            AssetType::Material => "material",
            AssetType::Mesh => "mesh",
            AssetType::GfxMaterial => "gfx_material",
            AssetType::Palette => "palette",
            AssetType::Script => "script",
            AssetType::VoiceRecording => "voice_recording",
            AssetType::Painting => "painting",
            AssetType::Texture => "texture",
            AssetType::GameDataTexture => "game_data_texture",
            AssetType::Jpeg => "jpeg",
            AssetType::Png => "png",
            AssetType::Tga => "tga",
            AssetType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = HoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = match s {
            "level" => AssetType::Level,
            "plan" => AssetType::Plan,
            "material" => AssetType::Material,
            "mesh" => AssetType::Mesh,
            "gfx_material" => AssetType::GfxMaterial,
            "palette" => AssetType::Palette,
            "script" => AssetType::Script,
            "voice_recording" => AssetType::VoiceRecording,
            "painting" => AssetType::Painting,
            "texture" => AssetType::Texture,
            "game_data_texture" => AssetType::GameDataTexture,
            "jpeg" => AssetType::Jpeg,
            "png" => AssetType::Png,
            "tga" => AssetType::Tga,
            "unknown" => AssetType::Unknown,
            other => return Err(HoardError::Config(format!("Unknown asset type '{}'", other))),
        };
        Ok(t)
    }
}

/// How risky an asset type is to hand out to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSafetyLevel {
    Safe,
    PotentiallyUnwanted,
    /// Carries code that runs on the client (scripts, shaders)
    Dangerous,
}

impl AssetSafetyLevel {
    pub fn from_asset_type(asset_type: AssetType) -> Self {
        match asset_type {
            AssetType::Script | AssetType::GfxMaterial => AssetSafetyLevel::Dangerous,
            AssetType::Mesh | AssetType::Unknown => AssetSafetyLevel::PotentiallyUnwanted,
            _ => AssetSafetyLevel::Safe,
        }
    }
}

impl fmt::Display for AssetSafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSafetyLevel::Safe => f.write_str("safe"),
            AssetSafetyLevel::PotentiallyUnwanted => f.write_str("potentially unwanted"),
            AssetSafetyLevel::Dangerous => f.write_str("dangerous"),
        }
    }
}

/// Hardware platform an import is running on behalf of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ps3,
    Vita,
    Psp,
    Rpcs3,
    Website,
}

impl Platform {
    /// Assets imported for this platform are stored as a separate variant
    pub fn is_variant(self) -> bool {
        self == Platform::Psp
    }
}

impl FromStr for Platform {
    type Err = HoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ps3" => Ok(Platform::Ps3),
            "vita" => Ok(Platform::Vita),
            "psp" => Ok(Platform::Psp),
            "rpcs3" => Ok(Platform::Rpcs3),
            "website" => Ok(Platform::Website),
            other => Err(HoardError::Config(format!(
                "Unknown platform '{}'. Use: ps3, vita, psp, rpcs3, website",
                other
            ))),
        }
    }
}

/// Reconstructed metadata for one stored asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Lowercase hex SHA-1 of the payload
    pub content_hash: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub size_in_bytes: usize,
    #[serde(default)]
    pub is_platform_variant: bool,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub original_uploader: Option<String>,
    /// Referenced content hashes in table order, duplicates kept
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl AssetRecord {
    /// Carry `uploaded_at` and `original_uploader` over from a previously
    /// cataloged record; everything else stays as freshly computed.
    pub fn inherit_provenance(self, prior: Option<&AssetRecord>) -> Self {
        match prior {
            Some(old) => AssetRecord {
                uploaded_at: old.uploaded_at,
                original_uploader: old.original_uploader.clone(),
                ..self
            },
            None => self,
        }
    }

    pub fn safety_level(&self) -> AssetSafetyLevel {
        AssetSafetyLevel::from_asset_type(self.asset_type)
    }
}
