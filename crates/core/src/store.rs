//! Persistence capability used by the orchestrator and the scrape
//! collaborators.
//!
//! The store is injected everywhere as `&dyn ScrapeStore` so callers can
//! swap the SQLite implementation for [`MemoryStore`] in tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use thiserror::Error;

use crate::types::ScrapedResult;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Operations the job pipeline needs from the persistent store.
#[async_trait::async_trait]
pub trait ScrapeStore: Send + Sync {
    /// Upsert the result list for a `movie:<id>` or `tv:<id>:<season>` key.
    async fn save_scraped_results(
        &self,
        key: &str,
        results: &[ScrapedResult],
    ) -> Result<(), StoreError>;

    /// Fetch the result list for a key, `None` if never written.
    async fn get_scraped_results(
        &self,
        key: &str,
    ) -> Result<Option<Vec<ScrapedResult>>, StoreError>;

    /// Remove a key and its results.
    async fn delete_scraped_results(&self, key: &str) -> Result<(), StoreError>;

    /// Mark an identifier as fully processed.
    async fn mark_as_done(&self, imdb_id: &str) -> Result<(), StoreError>;

    /// Whether an identifier carries the done marker.
    async fn is_done(&self, imdb_id: &str) -> Result<bool, StoreError>;
}

/// In-memory [`ScrapeStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    scraped: HashMap<String, Vec<ScrapedResult>>,
    done: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All keys currently holding a result list, sorted.
    pub fn keys(&self) -> Vec<String> {
        let inner = self.inner.lock().expect("memory store poisoned");
        let mut keys: Vec<String> = inner.scraped.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait::async_trait]
impl ScrapeStore for MemoryStore {
    async fn save_scraped_results(
        &self,
        key: &str,
        results: &[ScrapedResult],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.scraped.insert(key.to_string(), results.to_vec());
        Ok(())
    }

    async fn get_scraped_results(
        &self,
        key: &str,
    ) -> Result<Option<Vec<ScrapedResult>>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.scraped.get(key).cloned())
    }

    async fn delete_scraped_results(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.scraped.remove(key);
        Ok(())
    }

    async fn mark_as_done(&self, imdb_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.done.insert(imdb_id.to_string());
        Ok(())
    }

    async fn is_done(&self, imdb_id: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.done.contains(imdb_id))
    }
}
