pub mod classify;
pub mod mdblist;
pub mod provider;
pub mod tmdb;

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default HTTP client for catalog requests. Catalog APIs are uncontrolled
/// third parties, so every request carries a timeout.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// Normalized metadata handed to the downstream scrapers.
///
/// The detailed lookup fills what the provider knows; the fallback
/// converter fills only `title`, `name` and `release_date`. Scrapers must
/// tolerate any field being absent.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedMetadata {
    pub title: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub vote_average: Option<f64>,
    pub number_of_seasons: Option<i32>,
}

/// Raw info record from the secondary catalog (MDBList).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SecondaryInfo {
    /// Content type tag: "movie", "show", or something else (including
    /// empty for identifiers the catalog does not know).
    pub kind: String,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub released: Option<String>,
    /// Internal TMDB id, when the secondary catalog knows it. Lets the
    /// resolver skip the primary catalog's search candidates.
    pub tmdb_id: Option<u64>,
    pub score: Option<i64>,
}

/// One candidate from the primary catalog's find-by-external-id endpoint.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FindResult {
    pub tmdb_id: u64,
    pub title: String,
    pub year: Option<i32>,
}

/// The movie and TV buckets returned by find-by-external-id. Either bucket
/// being non-empty is itself a classification hint.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FindResults {
    pub movies: Vec<FindResult>,
    pub tv: Vec<FindResult>,
}
