//! Application State
//!
//! Shared state accessible by all handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{ApiConfig, Config};
use crate::dataset::{DatasetCache, DatasetResult, LoadOutcome, MealLoader};
use crate::session::SessionStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Memoized dataset loads
    pub dataset: Arc<DatasetCache>,
    /// File the dashboard reads
    pub dataset_path: PathBuf,
    /// Per-visitor sessions
    pub sessions: Arc<SessionStore>,
    /// Server configuration
    pub api: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state from a loaded configuration
    pub fn new(config: &Config) -> DatasetResult<Self> {
        let loader = MealLoader::from_config(&config.dataset)?;

        Ok(Self {
            dataset: Arc::new(DatasetCache::new(loader)),
            dataset_path: PathBuf::from(&config.dataset.path),
            sessions: Arc::new(SessionStore::new(config.session.clone())),
            api: Arc::new(config.api.clone()),
            start_time: Instant::now(),
        })
    }

    /// Current dataset, from cache when the file is unchanged
    pub async fn load_dataset(&self) -> LoadOutcome {
        self.dataset.get(&self.dataset_path).await
    }

    /// Name of the session cookie
    pub fn cookie_name(&self) -> &str {
        &self.sessions.config().cookie_name
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
