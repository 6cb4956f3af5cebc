//! [`ScrapeStore`] implementation over the SQLite pool.

use reelscrape_core::{ScrapeStore, ScrapedResult, StoreError};
use sqlx::SqlitePool;

use crate::repo::scrapes;
use crate::DbError;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn to_store_err(e: DbError) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait::async_trait]
impl ScrapeStore for SqliteStore {
    async fn save_scraped_results(
        &self,
        key: &str,
        results: &[ScrapedResult],
    ) -> Result<(), StoreError> {
        scrapes::save_scraped_results(&self.pool, key, results)
            .await
            .map_err(to_store_err)
    }

    async fn get_scraped_results(
        &self,
        key: &str,
    ) -> Result<Option<Vec<ScrapedResult>>, StoreError> {
        scrapes::get_scraped_results(&self.pool, key)
            .await
            .map_err(to_store_err)
    }

    async fn delete_scraped_results(&self, key: &str) -> Result<(), StoreError> {
        scrapes::delete_scraped_results(&self.pool, key)
            .await
            .map(|_| ())
            .map_err(to_store_err)
    }

    async fn mark_as_done(&self, imdb_id: &str) -> Result<(), StoreError> {
        scrapes::mark_as_done(&self.pool, imdb_id)
            .await
            .map_err(to_store_err)
    }

    async fn is_done(&self, imdb_id: &str) -> Result<bool, StoreError> {
        scrapes::is_done(&self.pool, imdb_id)
            .await
            .map_err(to_store_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trait_impl_round_trips_through_sqlite() {
        let pool = crate::connect(":memory:").await.unwrap();
        crate::migrate::run(&pool).await.unwrap();
        let store = SqliteStore::new(pool);

        let results = vec![ScrapedResult {
            title: "Some.Movie.1080p".into(),
            file_size_mb: 2048.0,
            hash: "abc123".into(),
        }];
        store
            .save_scraped_results("movie:tt0111161", &results)
            .await
            .unwrap();

        let got = store
            .get_scraped_results("movie:tt0111161")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, results);

        store.mark_as_done("tt0111161").await.unwrap();
        assert!(store.is_done("tt0111161").await.unwrap());

        store.delete_scraped_results("movie:tt0111161").await.unwrap();
        assert_eq!(
            store.get_scraped_results("movie:tt0111161").await.unwrap(),
            None
        );
    }
}
