//! Dataset Cache
//!
//! Memoizes loads keyed by path and modification time so that re-rendering
//! the dashboard does not re-read the file. Absence and failures are not
//! cached; the next request tries again.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

use super::error::DatasetError;
use super::loader::MealLoader;
use super::types::{LoadOutcome, MealTable};

struct CacheEntry {
    modified: Option<SystemTime>,
    table: Arc<MealTable>,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub loads: u64,
}

/// Memoized meal dataset loader
pub struct DatasetCache {
    loader: MealLoader,
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
    stats: RwLock<CacheStats>,
}

impl DatasetCache {
    pub fn new(loader: MealLoader) -> Self {
        Self {
            loader,
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Get the dataset at `path`, loading it only if the cached copy is
    /// missing or stale.
    pub async fn get(&self, path: &Path) -> LoadOutcome {
        let modified = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.modified().ok(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Meal dataset not found");
                self.entries.write().await.remove(path);
                return LoadOutcome::Missing {
                    path: path.to_path_buf(),
                };
            }
            Err(e) => return failed(path, &DatasetError::Io(e)),
        };

        if let Some(entry) = self.entries.read().await.get(path) {
            if entry.modified == modified {
                self.stats.write().await.hits += 1;
                return LoadOutcome::Loaded(Arc::clone(&entry.table));
            }
        }

        match self.loader.load(path).await {
            Ok(table) => {
                let table = Arc::new(table);
                self.entries.write().await.insert(
                    path.to_path_buf(),
                    CacheEntry {
                        modified,
                        table: Arc::clone(&table),
                    },
                );
                self.stats.write().await.loads += 1;
                LoadOutcome::Loaded(table)
            }
            Err(DatasetError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Meal dataset disappeared before read");
                LoadOutcome::Missing {
                    path: path.to_path_buf(),
                }
            }
            Err(e) => failed(path, &e),
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let mut stats = *self.stats.read().await;
        stats.entries = self.entries.read().await.len();
        stats
    }
}

fn failed(path: &Path, error: &DatasetError) -> LoadOutcome {
    tracing::error!(path = %path.display(), error = %error, "Failed to load meal dataset");
    LoadOutcome::Failed {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}
