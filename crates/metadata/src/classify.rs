//! Classifier, resolver and fallback converter.
//!
//! Two independent signals feed classification: the secondary catalog's
//! type tag and the non-emptiness of the primary catalog's search buckets.
//! The signals may conflict or both fire; precedence is movie over TV.

use reelscrape_core::ContentType;

use crate::{FindResults, ResolvedMetadata, SecondaryInfo};

/// The two classification flags, kept separate because the orchestrator
/// may fall back from the movie branch to the TV branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub movie: bool,
    pub tv: bool,
}

impl Classification {
    /// Collapse to a single content type. Tie-break: a title flagged as
    /// both is treated as a movie, matching the orchestrator's
    /// movie-branch-first processing order.
    pub fn content_type(self) -> ContentType {
        if self.movie {
            ContentType::Movie
        } else if self.tv {
            ContentType::Tv
        } else {
            ContentType::Unknown
        }
    }
}

/// Derive the classification flags from the two raw signals.
pub fn classify(info: &SecondaryInfo, found: &FindResults) -> Classification {
    Classification {
        movie: info.kind == "movie" || !found.movies.is_empty(),
        tv: info.kind == "show" || !found.tv.is_empty(),
    }
}

/// Internal id for the movie detailed lookup: the secondary catalog's id
/// when present, else the first primary-search movie candidate. `None`
/// means no id is resolvable and the caller routes to the fallback.
pub fn movie_candidate(info: &SecondaryInfo, found: &FindResults) -> Option<u64> {
    info.tmdb_id
        .or_else(|| found.movies.first().map(|r| r.tmdb_id))
}

/// Symmetric rule for the TV branch.
pub fn tv_candidate(info: &SecondaryInfo, found: &FindResults) -> Option<u64> {
    info.tmdb_id.or_else(|| found.tv.first().map(|r| r.tmdb_id))
}

/// Synthesize a minimal metadata record from the secondary catalog alone,
/// for titles whose detailed lookup is unusable. `title` and `name` both
/// carry the secondary title so either scraper finds its display field.
pub fn degraded_metadata(info: &SecondaryInfo) -> ResolvedMetadata {
    ResolvedMetadata {
        title: info.title.clone(),
        name: info.title.clone(),
        release_date: info.released.clone(),
        ..Default::default()
    }
}
