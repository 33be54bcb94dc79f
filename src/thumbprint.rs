//! Thumbprint validation and normalization.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Hex digit counts for the digests a store thumbprint may use:
/// MD5, SHA-1, SHA-224, SHA-256, SHA-384, SHA-512.
const DIGEST_HEX_LENGTHS: &[usize] = &[32, 40, 56, 64, 96, 128];

/// A certificate thumbprint: hex digest of the DER encoding.
///
/// Always stored uppercase, so equality between two `Thumbprint`s is
/// case-insensitive hex equality. Construct via [`Thumbprint::parse`];
/// there is no way to hold a malformed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Thumbprint(String);

impl Thumbprint {
    /// Validate and normalize a thumbprint string.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if !DIGEST_HEX_LENGTHS.contains(&trimmed.len())
            || !trimmed.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(Error::InvalidThumbprint(s.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Build from a raw digest, e.g. the SHA-1 of a DER certificate.
    ///
    /// Digest lengths come from real hash functions, so this cannot
    /// produce a value `parse` would reject.
    pub fn from_digest(digest: &[u8]) -> Self {
        Self(hex::encode_upper(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Thumbprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Thumbprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
