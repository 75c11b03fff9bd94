//! Asset format detection by signature sniffing

use crate::types::{AssetType, Platform};

/// Maps raw payload bytes to an [`AssetType`].
///
/// Implementations must be total: unrecognised content is
/// [`AssetType::Unknown`], never an error.
pub trait AssetClassifier: Send + Sync {
    fn classify(&self, data: &[u8], platform: Option<Platform>) -> AssetType;
}

const MAGICS: &[(&[u8; 4], AssetType)] = &[
    (b"LVLb", AssetType::Level),
    (b"PLNb", AssetType::Plan),
    (b"MATb", AssetType::Material),
    (b"MSHb", AssetType::Mesh),
    (b"GMTb", AssetType::GfxMaterial),
    (b"PALb", AssetType::Palette),
    (b"FSHb", AssetType::Script),
    (b"VOPb", AssetType::VoiceRecording),
    (b"PTGb", AssetType::Painting),
    (b"TEX ", AssetType::Texture),
    (b"GTF ", AssetType::GameDataTexture),
];

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
const JPEG_SIGNATURE: &[u8] = &[0xff, 0xd8, 0xff];
const TGA_FOOTER: &[u8] = b"TRUEVISION-XFILE.\0";

/// Default classifier matching leading magic bytes and known file signatures.
///
/// The signature table is the same for every platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicClassifier;

impl AssetClassifier for MagicClassifier {
    fn classify(&self, data: &[u8], _platform: Option<Platform>) -> AssetType {
        if let Some((_, asset_type)) = MAGICS
            .iter()
            .find(|(magic, _)| data.starts_with(magic.as_slice()))
        {
            return *asset_type;
        }

        if data.starts_with(PNG_SIGNATURE) {
            AssetType::Png
        } else if data.starts_with(JPEG_SIGNATURE) {
            AssetType::Jpeg
        } else if data.ends_with(TGA_FOOTER) {
            AssetType::Tga
        } else {
            AssetType::Unknown
        }
    }
}
