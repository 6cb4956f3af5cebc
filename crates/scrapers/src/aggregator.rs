//! HTTP delegation to the external scraper-aggregator service.
//!
//! The aggregator owns the actual torrent-site scraping; this client asks
//! it for candidates per title (movies) or per season (TV) and persists
//! them through the store capability.

use std::time::Duration;

use reelscrape_core::{movie_key, tv_key, ScrapeStore, ScrapedResult};
use reelscrape_metadata::{ResolvedMetadata, SecondaryInfo};
use tracing::{debug, info};

use crate::{MovieScraper, ScrapeError, TvScraper};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct AggregatorClient {
    base_url: String,
    client: reqwest::Client,
}

impl AggregatorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    async fn fetch_results(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<ScrapedResult>, ScrapeError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "aggregator request");

        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ScrapeError::Backend(format!(
                "aggregator returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| ScrapeError::Backend(format!("parse JSON: {e}")))
    }

    async fn save_merged(
        &self,
        store: &dyn ScrapeStore,
        key: &str,
        fresh: Vec<ScrapedResult>,
        replace_old: bool,
    ) -> Result<usize, ScrapeError> {
        let results = if replace_old {
            fresh
        } else {
            let existing = store.get_scraped_results(key).await?.unwrap_or_default();
            merge_by_hash(existing, fresh)
        };
        store.save_scraped_results(key, &results).await?;
        Ok(results.len())
    }
}

/// Keep existing entries, append fresh ones with unseen hashes.
fn merge_by_hash(existing: Vec<ScrapedResult>, fresh: Vec<ScrapedResult>) -> Vec<ScrapedResult> {
    let mut merged = existing;
    for result in fresh {
        if !merged.iter().any(|r| r.hash == result.hash) {
            merged.push(result);
        }
    }
    merged
}

/// Seasons to fan out over. Degraded metadata has no season count; scrape
/// season 1 only rather than guessing.
fn seasons_to_scrape(detailed: &ResolvedMetadata) -> i32 {
    detailed.number_of_seasons.unwrap_or(1).max(1)
}

fn display_title<'a>(detailed: &'a ResolvedMetadata, secondary: &'a SecondaryInfo) -> Option<&'a str> {
    detailed
        .title
        .as_deref()
        .or(detailed.name.as_deref())
        .or(secondary.title.as_deref())
}

fn query_params<'a>(
    detailed: &'a ResolvedMetadata,
    secondary: &'a SecondaryInfo,
) -> Vec<(&'static str, &'a str)> {
    let mut params = Vec::new();
    if let Some(title) = display_title(detailed, secondary) {
        params.push(("title", title));
    }
    if let Some(year) = detailed.release_date.as_deref().and_then(|d| d.get(..4)) {
        params.push(("year", year));
    }
    params
}

#[async_trait::async_trait]
impl MovieScraper for AggregatorClient {
    async fn scrape_movies(
        &self,
        imdb_id: &str,
        detailed: &ResolvedMetadata,
        secondary: &SecondaryInfo,
        store: &dyn ScrapeStore,
        replace_old: bool,
    ) -> Result<(), ScrapeError> {
        let fresh = self
            .fetch_results(
                &format!("/scrape/movie/{imdb_id}"),
                &query_params(detailed, secondary),
            )
            .await?;

        let saved = self
            .save_merged(store, &movie_key(imdb_id), fresh, replace_old)
            .await?;
        info!(imdb_id, results = saved, "movie scrape saved");
        Ok(())
    }

    async fn clean_movie_scrapes(
        &self,
        imdb_id: &str,
        _detailed: &ResolvedMetadata,
        _secondary: &SecondaryInfo,
        store: &dyn ScrapeStore,
    ) -> Result<(), ScrapeError> {
        let key = movie_key(imdb_id);
        let Some(existing) = store.get_scraped_results(&key).await? else {
            return Ok(());
        };

        let cleaned = dedupe_results(&existing);
        if cleaned.len() != existing.len() {
            info!(
                imdb_id,
                removed = existing.len() - cleaned.len(),
                "cleaned stale movie scrapes"
            );
            store.save_scraped_results(&key, &cleaned).await?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TvScraper for AggregatorClient {
    async fn scrape_tv(
        &self,
        imdb_id: &str,
        detailed: &ResolvedMetadata,
        secondary: &SecondaryInfo,
        store: &dyn ScrapeStore,
        replace_old: bool,
    ) -> Result<(), ScrapeError> {
        let seasons = seasons_to_scrape(detailed);
        let params = query_params(detailed, secondary);

        for season in 1..=seasons {
            let fresh = self
                .fetch_results(&format!("/scrape/tv/{imdb_id}/{season}"), &params)
                .await?;
            let saved = self
                .save_merged(store, &tv_key(imdb_id, season), fresh, replace_old)
                .await?;
            info!(imdb_id, season, results = saved, "tv scrape saved");
        }
        Ok(())
    }

    async fn clean_tv_scrapes(
        &self,
        imdb_id: &str,
        detailed: &ResolvedMetadata,
        _secondary: &SecondaryInfo,
        store: &dyn ScrapeStore,
    ) -> Result<(), ScrapeError> {
        // Without a season count there is nothing safe to reconcile.
        let Some(seasons) = detailed.number_of_seasons else {
            debug!(imdb_id, "season count unknown, skipping tv clean");
            return Ok(());
        };

        // Per-season dedupe, then drop keys past the known season count.
        for season in 1..=seasons {
            let key = tv_key(imdb_id, season);
            if let Some(existing) = store.get_scraped_results(&key).await? {
                let cleaned = dedupe_results(&existing);
                if cleaned.len() != existing.len() {
                    store.save_scraped_results(&key, &cleaned).await?;
                }
            }
        }

        let mut season = seasons + 1;
        loop {
            let key = tv_key(imdb_id, season);
            if store.get_scraped_results(&key).await?.is_none() {
                break;
            }
            info!(imdb_id, season, "removing orphaned season scrapes");
            store.delete_scraped_results(&key).await?;
            season += 1;
        }
        Ok(())
    }
}

/// Drop empty-hash entries and duplicate hashes, keeping first occurrence.
fn dedupe_results(results: &[ScrapedResult]) -> Vec<ScrapedResult> {
    let mut seen = std::collections::HashSet::new();
    results
        .iter()
        .filter(|r| !r.hash.is_empty() && seen.insert(r.hash.clone()))
        .cloned()
        .collect()
}
