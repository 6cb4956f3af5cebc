//! Scrape job orchestration.
//!
//! `generate_scrape_jobs` is the public entry point: it fetches the two
//! catalog signals, classifies the title, resolves the internal id for the
//! detailed lookup, and drives the downstream scrape/clean collaborators.
//! The movie branch is processed first; the TV branch runs only when the
//! movie branch was not taken, or when its degraded retry died (the one
//! documented fall-through). A title neither signal classifies gets the
//! explicit empty/done sentinel so the store never ends in limbo.

use reelscrape_core::{movie_key, tv_key, ContentType, ScrapeStore, StoreError};
use reelscrape_metadata::classify;
use reelscrape_metadata::provider::CatalogProvider;
use reelscrape_metadata::{FindResults, MetadataError, ResolvedMetadata, SecondaryInfo};
use reelscrape_scrapers::{MovieScraper, ScrapeError, TvScraper};
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Either catalog's initial fetch failed; the job aborted before any
    /// store write.
    #[error("catalog fetch failed: {0}")]
    Fetch(#[source] MetadataError),
    /// The detailed lookup failed for a reason other than not-found; the
    /// branch was abandoned.
    #[error("metadata resolution failed: {0}")]
    Resolution(#[source] MetadataError),
    /// A scrape or clean collaborator failed.
    #[error("downstream scrape failed: {0}")]
    Scrape(#[from] ScrapeError),
    /// Writing the terminal sentinel failed.
    #[error("store write failed: {0}")]
    Store(#[from] StoreError),
}

/// What a successful invocation did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// A branch ran to completion. `degraded` marks the fallback path,
    /// where the metadata came from the secondary catalog alone.
    Scraped {
        content: ContentType,
        degraded: bool,
    },
    /// Neither signal classified the title; the empty/done sentinel pair
    /// was written.
    Unclassified,
}

impl std::fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scraped {
                content,
                degraded: false,
            } => write!(f, "scraped {content}"),
            Self::Scraped {
                content,
                degraded: true,
            } => write!(f, "scraped {content} (degraded)"),
            Self::Unclassified => f.write_str("unclassified"),
        }
    }
}

/// A branch that was taken but did not complete.
enum BranchError {
    /// Propagate; no further branch is attempted.
    Fatal(JobError),
    /// The degraded retry itself failed. The movie branch falls through to
    /// the TV evaluation; no sentinel is written either way.
    Degraded(ScrapeError),
}

/// Resolve one identifier end to end.
///
/// Side effects on the store: scrape results under `movie:<id>` /
/// `tv:<id>:<season>` when a branch completes, the empty/done sentinel
/// when nothing classifies, and no write at all when a catalog fetch
/// fails before classification.
pub async fn generate_scrape_jobs(
    catalog: &dyn CatalogProvider,
    movies: &dyn MovieScraper,
    tv: &dyn TvScraper,
    store: &dyn ScrapeStore,
    imdb_id: &str,
    replace_old_scrape: bool,
) -> Result<JobOutcome, JobError> {
    // Both signals are required before classification; the fetches are
    // independent, so issue them concurrently.
    let (found, secondary) = tokio::try_join!(
        catalog.find_by_imdb(imdb_id),
        catalog.info_by_imdb(imdb_id)
    )
    .map_err(|e| {
        error!(imdb_id, error = %e, "catalog fetch failed, store untouched");
        JobError::Fetch(e)
    })?;

    let class = classify::classify(&secondary, &found);
    info!(
        imdb_id,
        movie = class.movie,
        tv = class.tv,
        content_type = %class.content_type(),
        "classified"
    );

    if class.movie {
        match movie_branch(
            catalog,
            movies,
            store,
            imdb_id,
            &secondary,
            &found,
            replace_old_scrape,
        )
        .await
        {
            Ok(outcome) => return Ok(outcome),
            Err(BranchError::Fatal(e)) => return Err(e),
            Err(BranchError::Degraded(e)) => {
                warn!(imdb_id, error = %e, "degraded movie scrape failed");
                if !class.tv {
                    return Err(JobError::Scrape(e));
                }
                // Movie branch is spent; evaluate the TV signal.
            }
        }
    } else if !class.tv {
        // Neither branch applies: terminal sentinel, explicitly
        // distinguishing "nothing classifiable" from "never processed".
        store.save_scraped_results(&movie_key(imdb_id), &[]).await?;
        store.save_scraped_results(&tv_key(imdb_id, 1), &[]).await?;
        store.mark_as_done(imdb_id).await?;
        info!(imdb_id, "unclassifiable, wrote empty sentinel");
        return Ok(JobOutcome::Unclassified);
    }

    match tv_branch(
        catalog,
        tv,
        store,
        imdb_id,
        &secondary,
        &found,
        replace_old_scrape,
    )
    .await
    {
        Ok(outcome) => Ok(outcome),
        Err(BranchError::Fatal(e)) => Err(e),
        Err(BranchError::Degraded(e)) => {
            warn!(imdb_id, error = %e, "degraded tv scrape failed");
            Err(JobError::Scrape(e))
        }
    }
}

/// Detailed movie lookup. An unresolvable internal id is the same
/// not-found condition as a 404 from the catalog.
async fn lookup_movie(
    catalog: &dyn CatalogProvider,
    secondary: &SecondaryInfo,
    found: &FindResults,
) -> Result<ResolvedMetadata, MetadataError> {
    match classify::movie_candidate(secondary, found) {
        Some(id) => catalog.movie_details(id).await,
        None => Err(MetadataError::NotFound),
    }
}

async fn lookup_tv(
    catalog: &dyn CatalogProvider,
    secondary: &SecondaryInfo,
    found: &FindResults,
) -> Result<ResolvedMetadata, MetadataError> {
    match classify::tv_candidate(secondary, found) {
        Some(id) => catalog.tv_details(id).await,
        None => Err(MetadataError::NotFound),
    }
}

async fn movie_branch(
    catalog: &dyn CatalogProvider,
    movies: &dyn MovieScraper,
    store: &dyn ScrapeStore,
    imdb_id: &str,
    secondary: &SecondaryInfo,
    found: &FindResults,
    replace_old_scrape: bool,
) -> Result<JobOutcome, BranchError> {
    let detailed = match lookup_movie(catalog, secondary, found).await {
        Ok(detailed) => Some(detailed),
        Err(MetadataError::NotFound) => None,
        Err(e) => {
            error!(imdb_id, error = %e, "movie lookup failed, branch abandoned");
            return Err(BranchError::Fatal(JobError::Resolution(e)));
        }
    };

    match detailed {
        Some(detailed) => {
            movies
                .scrape_movies(imdb_id, &detailed, secondary, store, replace_old_scrape)
                .await
                .map_err(|e| {
                    error!(imdb_id, error = %e, "movie scrape failed");
                    BranchError::Fatal(JobError::Scrape(e))
                })?;
            movies
                .clean_movie_scrapes(imdb_id, &detailed, secondary, store)
                .await
                .map_err(|e| {
                    error!(imdb_id, error = %e, "movie clean failed");
                    BranchError::Fatal(JobError::Scrape(e))
                })?;
            Ok(JobOutcome::Scraped {
                content: ContentType::Movie,
                degraded: false,
            })
        }
        None => {
            info!(imdb_id, "movie lookup not found, retrying with fallback metadata");
            let degraded = classify::degraded_metadata(secondary);
            let retry = async {
                movies
                    .scrape_movies(imdb_id, &degraded, secondary, store, replace_old_scrape)
                    .await?;
                movies
                    .clean_movie_scrapes(imdb_id, &degraded, secondary, store)
                    .await
            };
            match retry.await {
                Ok(()) => Ok(JobOutcome::Scraped {
                    content: ContentType::Movie,
                    degraded: true,
                }),
                Err(e) => Err(BranchError::Degraded(e)),
            }
        }
    }
}

async fn tv_branch(
    catalog: &dyn CatalogProvider,
    tv: &dyn TvScraper,
    store: &dyn ScrapeStore,
    imdb_id: &str,
    secondary: &SecondaryInfo,
    found: &FindResults,
    replace_old_scrape: bool,
) -> Result<JobOutcome, BranchError> {
    let detailed = match lookup_tv(catalog, secondary, found).await {
        Ok(detailed) => Some(detailed),
        Err(MetadataError::NotFound) => None,
        Err(e) => {
            error!(imdb_id, error = %e, "tv lookup failed, branch abandoned");
            return Err(BranchError::Fatal(JobError::Resolution(e)));
        }
    };

    match detailed {
        Some(detailed) => {
            // Stale per-season entries are invalidated before the fresh
            // scrape, unless the caller asked for a full replacement.
            if !replace_old_scrape {
                tv.clean_tv_scrapes(imdb_id, &detailed, secondary, store)
                    .await
                    .map_err(|e| {
                        error!(imdb_id, error = %e, "tv clean failed");
                        BranchError::Fatal(JobError::Scrape(e))
                    })?;
            }
            tv.scrape_tv(imdb_id, &detailed, secondary, store, replace_old_scrape)
                .await
                .map_err(|e| {
                    error!(imdb_id, error = %e, "tv scrape failed");
                    BranchError::Fatal(JobError::Scrape(e))
                })?;
            Ok(JobOutcome::Scraped {
                content: ContentType::Tv,
                degraded: false,
            })
        }
        None => {
            info!(imdb_id, "tv lookup not found, retrying with fallback metadata");
            // Only the scrape is retried with degraded metadata; the clean
            // is not repeated.
            let degraded = classify::degraded_metadata(secondary);
            match tv
                .scrape_tv(imdb_id, &degraded, secondary, store, replace_old_scrape)
                .await
            {
                Ok(()) => Ok(JobOutcome::Scraped {
                    content: ContentType::Tv,
                    degraded: true,
                }),
                Err(e) => Err(BranchError::Degraded(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_display() {
        assert_eq!(
            JobOutcome::Scraped {
                content: ContentType::Movie,
                degraded: false
            }
            .to_string(),
            "scraped movie"
        );
        assert_eq!(
            JobOutcome::Scraped {
                content: ContentType::Tv,
                degraded: true
            }
            .to_string(),
            "scraped tv (degraded)"
        );
        assert_eq!(JobOutcome::Unclassified.to_string(), "unclassified");
    }
}
