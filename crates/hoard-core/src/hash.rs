//! SHA-1 content hashing for content-addressed assets

use sha1::{Digest, Sha1};
use std::fmt;

use crate::error::{HoardError, Result};

/// A SHA-1 digest identifying an asset by its content.
///
/// Store keys and catalog records carry this as a 40-character lowercase
/// hex string; this type is the parsed form.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct Sha1Hash([u8; 20]);

impl Sha1Hash {
    /// Length of the hex rendering
    pub const HEX_LEN: usize = 40;

    /// Compute a hash from bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Wrap an already computed raw digest
    pub fn from_digest(digest: [u8; 20]) -> Self {
        Self(digest)
    }

    /// Parse a 40-character hex string (either case)
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != Self::HEX_LEN {
            return Err(HoardError::InvalidHash(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| HoardError::InvalidHash(s.to_string()))?;
        Ok(Self(bytes))
    }

    /// Get the hash as a lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Debug for Sha1Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1Hash({})", self.to_hex())
    }
}

impl fmt::Display for Sha1Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
