use reelscrape_core::ScrapedResult;
use sqlx::SqlitePool;

use crate::DbError;

/// Upsert the scrape result list for a key.
pub async fn save_scraped_results(
    pool: &SqlitePool,
    key: &str,
    results: &[ScrapedResult],
) -> Result<(), DbError> {
    let json = serde_json::to_string(results)?;
    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        "INSERT INTO scraped (key, results_json, updated_ts) VALUES (?, ?, ?) \
         ON CONFLICT(key) DO UPDATE SET results_json = excluded.results_json, \
         updated_ts = excluded.updated_ts",
    )
    .bind(key)
    .bind(json)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Fetch the result list for a key, `None` if never written.
pub async fn get_scraped_results(
    pool: &SqlitePool,
    key: &str,
) -> Result<Option<Vec<ScrapedResult>>, DbError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT results_json FROM scraped WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    match row {
        Some((json,)) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Delete a key and its results.
pub async fn delete_scraped_results(pool: &SqlitePool, key: &str) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM scraped WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Mark an identifier as fully processed.
pub async fn mark_as_done(pool: &SqlitePool, imdb_id: &str) -> Result<(), DbError> {
    let now = chrono::Utc::now().timestamp();
    sqlx::query("INSERT OR IGNORE INTO media_done (imdb_id, done_ts) VALUES (?, ?)")
        .bind(imdb_id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(())
}

/// Whether an identifier carries the done marker.
pub async fn is_done(pool: &SqlitePool, imdb_id: &str) -> Result<bool, DbError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT imdb_id FROM media_done WHERE imdb_id = ?")
            .bind(imdb_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}
