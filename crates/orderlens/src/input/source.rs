//! Metadata about an ingested source.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::format::FileFormat;

/// Metadata about the bytes a table was ingested from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path, when ingested from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Full path to the file, when ingested from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// SHA-256 hash of the raw bytes.
    pub hash: String,
    /// Input size in bytes.
    pub size_bytes: u64,
    /// Format the bytes were parsed as.
    pub format: FileFormat,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When ingestion happened.
    pub ingested_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe in-memory bytes that produced a table of the given shape.
    pub fn new(bytes: &[u8], format: FileFormat, row_count: usize, column_count: usize) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            file: None,
            path: None,
            hash,
            size_bytes: bytes.len() as u64,
            format,
            row_count,
            column_count,
            ingested_at: Utc::now(),
        }
    }

    /// Attach the on-disk location of the source.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned());
        self.path = Some(path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable() {
        let a = SourceMetadata::new(b"a,b\n1,2\n", FileFormat::Csv, 1, 2);
        let b = SourceMetadata::new(b"a,b\n1,2\n", FileFormat::Csv, 1, 2);
        assert_eq!(a.hash, b.hash);
        assert!(a.hash.starts_with("sha256:"));
        assert_eq!(a.size_bytes, 8);
    }

    #[test]
    fn test_with_path() {
        let meta = SourceMetadata::new(b"", FileFormat::Json, 0, 0)
            .with_path(PathBuf::from("/tmp/orders.json"));
        assert_eq!(meta.file.as_deref(), Some("orders.json"));
    }
}
