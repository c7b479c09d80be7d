//! SHA-256 checksums used to decide whether a write changes anything
//!
//! Providers compare the checksum of the desired content against the file on
//! disk; equal checksums mean the resource is already converged.

use sha2::{Digest, Sha256};

use crate::{Error, NormalizedPath, Result};

const PREFIX: &str = "sha256:";

/// Checksum of in-memory bytes in the form `"sha256:<hex>"`.
pub fn bytes_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Checksum of a file on disk, or `None` when the file does not exist.
pub fn file_checksum(path: &NormalizedPath) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let native_path = path.to_native();
    let content = std::fs::read(&native_path).map_err(|e| Error::io(&native_path, e))?;
    Ok(Some(bytes_checksum(&content)))
}

/// True when the file at `path` already holds exactly `content`.
pub fn matches_content(path: &NormalizedPath, content: &[u8]) -> Result<bool> {
    Ok(file_checksum(path)?.is_some_and(|actual| actual == bytes_checksum(content)))
}
