use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use reelscrape_db::repo::requests;
use reelscrape_db::SqliteStore;
use reelscrape_jobs::generate_scrape_jobs;
use reelscrape_metadata::mdblist::MdblistClient;
use reelscrape_metadata::provider::Catalog;
use reelscrape_metadata::tmdb::TmdbClient;
use reelscrape_scrapers::AggregatorClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // DB path: use REELSCRAPE_DB env or default
    let db_path = std::env::var("REELSCRAPE_DB").unwrap_or_else(|_| "reelscrape.db".to_string());
    info!(db_path = %db_path, "connecting to database");

    let pool = reelscrape_db::connect(&db_path)
        .await
        .context("failed to connect to database")?;

    // Run migrations
    reelscrape_db::migrate::run(&pool)
        .await
        .context("failed to run migrations")?;
    info!("migrations complete");

    // Catalog credentials and aggregator endpoint come from the environment.
    let tmdb_key = std::env::var("TMDB_KEY").context("TMDB_KEY is not set")?;
    let mdblist_key = std::env::var("MDBLIST_KEY").context("MDBLIST_KEY is not set")?;
    let scraper_url =
        std::env::var("REELSCRAPE_SCRAPER_URL").context("REELSCRAPE_SCRAPER_URL is not set")?;
    let poll_secs: u64 = std::env::var("REELSCRAPE_POLL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    let catalog = Catalog::new(TmdbClient::new(tmdb_key), MdblistClient::new(mdblist_key));
    let aggregator = AggregatorClient::new(scraper_url);
    let store = SqliteStore::new(pool.clone());

    info!(poll_secs, "worker started");
    loop {
        let request = match requests::claim_next(&pool).await {
            Ok(Some(request)) => request,
            Ok(None) => {
                tokio::time::sleep(Duration::from_secs(poll_secs)).await;
                continue;
            }
            Err(e) => {
                error!(error = %e, "failed to claim next request");
                tokio::time::sleep(Duration::from_secs(poll_secs)).await;
                continue;
            }
        };

        info!(
            request_id = %request.id,
            imdb_id = %request.imdb_id,
            replace_old = request.replace_old,
            "processing scrape request"
        );

        match generate_scrape_jobs(
            &catalog,
            &aggregator,
            &aggregator,
            &store,
            &request.imdb_id,
            request.replace_old,
        )
        .await
        {
            Ok(outcome) => {
                info!(imdb_id = %request.imdb_id, outcome = %outcome, "request finished");
                if let Err(e) = requests::finish(&pool, &request.id, &outcome.to_string()).await {
                    error!(request_id = %request.id, error = %e, "failed to record outcome");
                }
            }
            Err(e) => {
                error!(imdb_id = %request.imdb_id, error = %e, "request failed");
                if let Err(err) = requests::fail(&pool, &request.id, &e.to_string()).await {
                    error!(request_id = %request.id, error = %err, "failed to record failure");
                }
            }
        }
    }
}
