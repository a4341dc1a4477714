//! Configuration types and defaults for the glyph worker

use serde::{Deserialize, Serialize};

/// Tunables shared by the loader, search index, and request controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Base URL the versioned dataset files are served from. Default: "/data"
    pub dataset_base_url: String,
    /// Hard cap on the number of search results per query. Default: 1000
    pub max_results: usize,
    /// Queries are truncated to this many graphemes before matching. Default: 128
    pub max_query_len: usize,
    /// Capacity of the LRU query-result cache. Default: 64
    pub cache_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            dataset_base_url: "/data".to_string(),
            max_results: 1000,
            max_query_len: 128,
            cache_capacity: 64,
        }
    }
}

impl WorkerConfig {
    /// Config pointed at a non-default dataset location
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            dataset_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Fetch target for a dataset version, e.g. "/data/16.0.json"
    pub fn dataset_url(&self, version: &str) -> String {
        format!("{}/{}.json", self.dataset_base_url.trim_end_matches('/'), version)
    }
}
