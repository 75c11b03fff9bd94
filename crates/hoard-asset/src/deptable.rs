//! Dependency table decoding
//!
//! Binary assets embed a big-endian table listing the other assets they
//! reference. Bytes `[8, 12)` hold the absolute offset of the table; the
//! table starts with a `u32` entry count, and each entry is a flags byte,
//! an optional payload and a trailing 4-byte field:
//!
//! | flags      | payload                          |
//! |------------|----------------------------------|
//! | `& 0x1`    | 20-byte SHA-1 digest (collected)  |
//! | `& 0x2`    | 4-byte identifier (skipped)       |
//! | otherwise  | none                             |

use hoard_core::{HoardError, Sha1Hash};
use thiserror::Error;

const TABLE_OFFSET_POSITION: usize = 8;
const FLAG_HASH: u8 = 0x1;
const FLAG_GUID: u8 = 0x2;

/// Failure while decoding a dependency table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("needed {needed} bytes at offset {offset}, but the buffer is {available} bytes long")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

impl From<ParseError> for HoardError {
    fn from(err: ParseError) -> Self {
        HoardError::TruncatedDependencyTable(err.to_string())
    }
}

/// A read position into a borrowed buffer.
///
/// Every read consumes the cursor and hands back the value together with the
/// advanced cursor, so there is no hidden stream state.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to an absolute offset. Seeking past the end is allowed; the next
    /// read reports the truncation.
    pub fn seek(self, pos: usize) -> Self {
        Self { buf: self.buf, pos }
    }

    pub fn take(self, n: usize) -> Result<(&'a [u8], Self), ParseError> {
        let truncated = ParseError::Truncated {
            offset: self.pos,
            needed: n,
            available: self.buf.len(),
        };
        let end = self.pos.checked_add(n).ok_or_else(|| truncated.clone())?;
        let bytes = self.buf.get(self.pos..end).ok_or(truncated)?;
        Ok((bytes, Self { buf: self.buf, pos: end }))
    }

    pub fn skip(self, n: usize) -> Result<Self, ParseError> {
        self.take(n).map(|(_, next)| next)
    }

    pub fn read_u8(self) -> Result<(u8, Self), ParseError> {
        let (bytes, next) = self.take(1)?;
        Ok((bytes[0], next))
    }

    pub fn read_u32_be(self) -> Result<(u32, Self), ParseError> {
        let (bytes, next) = self.take(4)?;
        Ok((u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), next))
    }

    pub fn read_digest(self) -> Result<(Sha1Hash, Self), ParseError> {
        let (bytes, next) = self.take(20)?;
        let mut digest = [0u8; 20];
        digest.copy_from_slice(bytes);
        Ok((Sha1Hash::from_digest(digest), next))
    }
}

/// Extract the content hashes an asset references, in table order.
///
/// Entries flagged as identifiers are consumed but not returned. The result
/// is not deduplicated. Callers must only pass payloads whose type carries a
/// table (see [`crate::AssetType::has_dependency_table`]).
pub fn parse_dependency_table(data: &[u8]) -> Result<Vec<String>, ParseError> {
    let cursor = Cursor::new(data).seek(TABLE_OFFSET_POSITION);
    let (table_offset, cursor) = cursor.read_u32_be()?;

    let (count, mut cursor) = cursor.seek(table_offset as usize).read_u32_be()?;
    tracing::debug!(table_offset, count, "reading dependency table");

    let mut dependencies = Vec::new();
    for _ in 0..count {
        let (flags, next) = cursor.read_u8()?;
        cursor = next;

        if flags & FLAG_HASH != 0 {
            let (digest, next) = cursor.read_digest()?;
            dependencies.push(digest.to_hex());
            cursor = next;
        } else if flags & FLAG_GUID != 0 {
            cursor = cursor.skip(4)?;
        }

        cursor = cursor.skip(4)?;
    }

    Ok(dependencies)
}
