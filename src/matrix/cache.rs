//! Matrix Cache - memoize parsed matrices by content fingerprint
//!
//! Re-reading the same matrix file skips parsing and validation when its
//! bytes are unchanged. The sequencer never touches this cache; it is a
//! convenience for callers that load the same work center repeatedly.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use sha2::{Digest, Sha256};

use crate::error::{Result, SequencerError};
use crate::matrix::loader::read_matrix_file;
use crate::matrix::{MatrixFormat, ToolMatrix, parse_bytes};

/// Fingerprint of matrix content: format plus SHA-256 of the bytes.
pub fn fingerprint(content: &[u8], format: MatrixFormat) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}:{}", format, hex::encode(hasher.finalize()))
}

/// Thread-safe cache of parsed matrices keyed by fingerprint
#[derive(Default)]
pub struct MatrixCache {
    entries: RwLock<HashMap<String, Arc<ToolMatrix>>>,
}

impl MatrixCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a matrix file, parsing it only if its content is not cached
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<ToolMatrix>> {
        let path = path.as_ref();
        let format = MatrixFormat::from_path(path)?;
        let bytes = read_matrix_file(path)?;
        let key = fingerprint(&bytes, format);

        {
            let entries = self.entries.read().map_err(|e| {
                SequencerError::Io(std::io::Error::other(format!(
                    "Failed to acquire read lock: {}",
                    e
                )))
            })?;
            if let Some(matrix) = entries.get(&key) {
                tracing::debug!(path = %path.display(), "Matrix cache hit");
                return Ok(Arc::clone(matrix));
            }
        }

        let matrix = Arc::new(parse_bytes(&bytes, format)?);
        tracing::debug!(path = %path.display(), items = matrix.len(), "Matrix cache miss, parsed");

        {
            let mut entries = self.entries.write().map_err(|e| {
                SequencerError::Io(std::io::Error::other(format!(
                    "Failed to acquire write lock: {}",
                    e
                )))
            })?;
            entries.insert(key, Arc::clone(&matrix));
        }

        Ok(matrix)
    }

    /// Check whether content with this fingerprint is cached
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached matrix
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "Item,A,B\nA,0,2\nB,2,0\n";

    #[test]
    fn test_fingerprint_depends_on_content_and_format() {
        let a = fingerprint(CSV.as_bytes(), MatrixFormat::Csv);
        assert_eq!(a, fingerprint(CSV.as_bytes(), MatrixFormat::Csv));
        assert_ne!(a, fingerprint(CSV.as_bytes(), MatrixFormat::Tsv));
        assert_ne!(a, fingerprint(b"Item,A\nA,1\n", MatrixFormat::Csv));
        assert!(a.starts_with("csv:"));
    }

    #[test]
    fn test_second_load_hits_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Tool_Matrix.csv");
        std::fs::write(&path, CSV).unwrap();

        let cache = MatrixCache::new();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&fingerprint(CSV.as_bytes(), MatrixFormat::Csv)));
    }

    #[test]
    fn test_same_content_different_path_shares_entry() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(&a, CSV).unwrap();
        std::fs::write(&b, CSV).unwrap();

        let cache = MatrixCache::new();
        let first = cache.load(&a).unwrap();
        let second = cache.load(&b).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_changed_file_is_reparsed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.csv");
        std::fs::write(&path, CSV).unwrap();

        let cache = MatrixCache::new();
        cache.load(&path).unwrap();
        std::fs::write(&path, "Item,A,B\nA,0,7\nB,7,0\n").unwrap();
        let reloaded = cache.load(&path).unwrap();
        assert_eq!(reloaded.get("A", "B"), Some(7.0));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_malformed_file_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Item,A,B\nA,0,1\nB,2,0\n").unwrap();

        let cache = MatrixCache::new();
        assert!(cache.load(&path).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let cache = MatrixCache::new();
        let err = cache.load("/nonexistent/Tool_Matrix.csv").unwrap_err();
        assert!(matches!(err, SequencerError::Io(_)));
    }
}
