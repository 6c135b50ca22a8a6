//! Caller-owned cache for artifact tables.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::debug;

use ward_ingest::read_table;

#[derive(Debug, Clone)]
struct CacheEntry {
    modified: SystemTime,
    len: u64,
    frame: Arc<DataFrame>,
}

/// Cache of loaded artifact tables keyed by path.
///
/// An entry is reused only while the file's modification time and length are
/// unchanged; otherwise the file is re-read. Absent files yield `Ok(None)`
/// rather than an error, and evict any stale entry for that path.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    entries: BTreeMap<PathBuf, CacheEntry>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Loads a CSV artifact through the cache.
    pub fn frame(&mut self, path: &Path) -> Result<Option<Arc<DataFrame>>> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                self.entries.remove(path);
                return Ok(None);
            }
            Err(error) => {
                return Err(error).with_context(|| format!("stat: {}", path.display()));
            }
        };
        let modified = meta
            .modified()
            .with_context(|| format!("stat: {}", path.display()))?;
        let len = meta.len();
        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified && entry.len == len {
                debug!(path = %path.display(), "artifact cache hit");
                return Ok(Some(Arc::clone(&entry.frame)));
            }
        }
        let frame = Arc::new(read_table(path)?);
        debug!(
            path = %path.display(),
            rows = frame.height(),
            "artifact cache refresh"
        );
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                modified,
                len,
                frame: Arc::clone(&frame),
            },
        );
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn absent_file_is_none_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ArtifactCache::new();
        let loaded = cache.frame(&dir.path().join("missing.csv")).unwrap();
        assert!(loaded.is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn unchanged_file_hits_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kpis.csv");
        fs::write(&path, "metric,value\noccupancy_rate,0.6\n").unwrap();
        let mut cache = ArtifactCache::new();
        let first = cache.frame(&path).unwrap().unwrap();
        let second = cache.frame(&path).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn rewritten_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trend.csv");
        fs::write(&path, "admission_week,admissions\n2025-01-06,4\n").unwrap();
        let mut cache = ArtifactCache::new();
        let first = cache.frame(&path).unwrap().unwrap();
        assert_eq!(first.height(), 1);

        // Different length guarantees invalidation even on coarse mtimes.
        fs::write(
            &path,
            "admission_week,admissions\n2025-01-06,4\n2025-01-13,7\n",
        )
        .unwrap();
        let second = cache.frame(&path).unwrap().unwrap();
        assert_eq!(second.height(), 2);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn deleted_file_evicts_its_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        let mut cache = ArtifactCache::new();
        assert!(cache.frame(&path).unwrap().is_some());
        assert_eq!(cache.len(), 1);

        fs::remove_file(&path).unwrap();
        assert!(cache.frame(&path).unwrap().is_none());
        assert!(cache.is_empty());
    }
}
