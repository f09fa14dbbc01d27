//! Content digests: BLAKE2b-256 over the lowercase hex text of a file's bytes.
//!
//! The hex text, not the raw bytes, is what gets hashed. Digests produced by
//! other clients of the same ledger use this encoding, so it must not change.

use std::path::Path;

use anyhow::{Context, Result};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest as _};
use poe_protocol::Digest;

type Blake2b256 = Blake2b<U32>;

/// A file that has been read and hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedFile {
    /// File name without directories.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    pub digest: Digest,
}

/// Hash arbitrary text with BLAKE2b-256, returning `0x`-prefixed hex.
pub fn hash_text(text: &str) -> Digest {
    let out = Blake2b256::digest(text.as_bytes());
    Digest::new(format!("0x{}", data_encoding::HEXLOWER.encode(&out)))
}

/// Digest of a byte buffer: each byte becomes two lowercase hex characters,
/// concatenated without separators, and that text is hashed.
pub fn hash_bytes(bytes: &[u8]) -> Digest {
    hash_text(&data_encoding::HEXLOWER.encode(bytes))
}

/// Read a whole file into memory and compute its digest.
///
/// There is no size limit: the file is buffered in full.
pub async fn hash_file(path: &Path) -> Result<HashedFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read file: {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let digest = hash_bytes(&bytes);

    tracing::info!(
        file_name = %name,
        file_size = bytes.len(),
        digest = %digest,
        "file hashed"
    );

    Ok(HashedFile {
        name,
        size: bytes.len() as u64,
        digest,
    })
}
