use reelscrape_core::RequestStatus;
use sqlx::SqlitePool;

#[derive(Debug, Clone)]
pub struct RequestRow {
    pub id: String,
    pub imdb_id: String,
    pub replace_old: bool,
    pub status: String,
    pub outcome: Option<String>,
    pub error: Option<String>,
    pub created_ts: i64,
    pub updated_ts: i64,
}

/// Enqueue a scrape request for an identifier.
pub async fn enqueue(
    pool: &SqlitePool,
    imdb_id: &str,
    replace_old: bool,
) -> Result<RequestRow, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO scrape_request (id, imdb_id, replace_old, status, created_ts, updated_ts) \
         VALUES (?, ?, ?, 'queued', ?, ?)",
    )
    .bind(&id)
    .bind(imdb_id)
    .bind(replace_old)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(RequestRow {
        id,
        imdb_id: imdb_id.to_string(),
        replace_old,
        status: RequestStatus::Queued.as_str().to_string(),
        outcome: None,
        error: None,
        created_ts: now,
        updated_ts: now,
    })
}

/// Claim the oldest queued request, flipping it to `processing`.
///
/// Returns `None` when the queue is empty or another consumer claimed the
/// row first (the UPDATE is guarded on status).
pub async fn claim_next(pool: &SqlitePool) -> Result<Option<RequestRow>, sqlx::Error> {
    let row: Option<(String, String, bool, Option<String>, Option<String>, i64, i64)> =
        sqlx::query_as(
            "SELECT id, imdb_id, replace_old, outcome, error, created_ts, updated_ts \
             FROM scrape_request WHERE status = 'queued' \
             ORDER BY created_ts LIMIT 1",
        )
        .fetch_optional(pool)
        .await?;

    let Some((id, imdb_id, replace_old, outcome, error, created_ts, _)) = row else {
        return Ok(None);
    };

    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE scrape_request SET status = 'processing', updated_ts = ? \
         WHERE id = ? AND status = 'queued'",
    )
    .bind(now)
    .bind(&id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(RequestRow {
        id,
        imdb_id,
        replace_old,
        status: RequestStatus::Processing.as_str().to_string(),
        outcome,
        error,
        created_ts,
        updated_ts: now,
    }))
}

/// Record a finished request with its outcome.
pub async fn finish(pool: &SqlitePool, id: &str, outcome: &str) -> Result<bool, sqlx::Error> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE scrape_request SET status = 'done', outcome = ?, error = NULL, updated_ts = ? \
         WHERE id = ?",
    )
    .bind(outcome)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Record a failed request with its error.
pub async fn fail(pool: &SqlitePool, id: &str, error: &str) -> Result<bool, sqlx::Error> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE scrape_request SET status = 'failed', error = ?, updated_ts = ? WHERE id = ?",
    )
    .bind(error)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = crate::connect(":memory:").await.unwrap();
        crate::migrate::run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn claim_follows_enqueue_order() {
        let pool = test_pool().await;
        let first = enqueue(&pool, "tt0000001", false).await.unwrap();
        let second = enqueue(&pool, "tt0000002", true).await.unwrap();

        // Same created_ts is possible at second granularity; force an order.
        sqlx::query("UPDATE scrape_request SET created_ts = created_ts - 10 WHERE id = ?")
            .bind(&first.id)
            .execute(&pool)
            .await
            .unwrap();

        let claimed = claim_next(&pool).await.unwrap().unwrap();
        assert_eq!(claimed.imdb_id, "tt0000001");
        assert_eq!(claimed.status, "processing");
        assert!(!claimed.replace_old);

        let claimed = claim_next(&pool).await.unwrap().unwrap();
        assert_eq!(claimed.id, second.id);
        assert!(claimed.replace_old);

        assert!(claim_next(&pool).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn finish_and_fail_record_terminal_state() {
        let pool = test_pool().await;
        let req = enqueue(&pool, "tt0000003", false).await.unwrap();
        claim_next(&pool).await.unwrap().unwrap();

        assert!(finish(&pool, &req.id, "scraped movie").await.unwrap());
        let row: (String, Option<String>) =
            sqlx::query_as("SELECT status, outcome FROM scrape_request WHERE id = ?")
                .bind(&req.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row.0, "done");
        assert_eq!(row.1.as_deref(), Some("scraped movie"));

        let req = enqueue(&pool, "tt0000004", false).await.unwrap();
        assert!(fail(&pool, &req.id, "catalog fetch failed").await.unwrap());
        let row: (String, Option<String>) =
            sqlx::query_as("SELECT status, error FROM scrape_request WHERE id = ?")
                .bind(&req.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row.0, "failed");
        assert_eq!(row.1.as_deref(), Some("catalog fetch failed"));
    }
}
