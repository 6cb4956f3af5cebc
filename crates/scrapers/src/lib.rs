//! Downstream scrape/clean collaborators.
//!
//! The orchestrator only sees the two traits here; the production
//! implementation delegates the actual torrent discovery to an external
//! aggregator service and keeps the store reconciliation local.

pub mod aggregator;

use reelscrape_core::{ScrapeStore, StoreError};
use reelscrape_metadata::{ResolvedMetadata, SecondaryInfo};
use thiserror::Error;

pub use aggregator::AggregatorClient;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("aggregator error: {0}")]
    Backend(String),
    #[error("network error: {0}")]
    Network(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Movie-side collaborators: fetch-and-persist, and stale-entry cleanup.
#[async_trait::async_trait]
pub trait MovieScraper: Send + Sync {
    async fn scrape_movies(
        &self,
        imdb_id: &str,
        detailed: &ResolvedMetadata,
        secondary: &SecondaryInfo,
        store: &dyn ScrapeStore,
        replace_old: bool,
    ) -> Result<(), ScrapeError>;

    async fn clean_movie_scrapes(
        &self,
        imdb_id: &str,
        detailed: &ResolvedMetadata,
        secondary: &SecondaryInfo,
        store: &dyn ScrapeStore,
    ) -> Result<(), ScrapeError>;
}

/// TV-side collaborators. Scraping fans out per season; cleaning drops
/// season keys that no longer exist for the series.
#[async_trait::async_trait]
pub trait TvScraper: Send + Sync {
    async fn scrape_tv(
        &self,
        imdb_id: &str,
        detailed: &ResolvedMetadata,
        secondary: &SecondaryInfo,
        store: &dyn ScrapeStore,
        replace_old: bool,
    ) -> Result<(), ScrapeError>;

    async fn clean_tv_scrapes(
        &self,
        imdb_id: &str,
        detailed: &ResolvedMetadata,
        secondary: &SecondaryInfo,
        store: &dyn ScrapeStore,
    ) -> Result<(), ScrapeError>;
}
