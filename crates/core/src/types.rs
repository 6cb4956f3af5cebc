use serde::{Deserialize, Serialize};

/// Resolved classification for a title.
///
/// `Unknown` is a valid terminal outcome (the title exists in neither
/// catalog bucket), not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Tv,
    Unknown,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a queued scrape request, stored in `scrape_request.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Queued,
    Processing,
    Done,
    Failed,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate result produced by a scraper for a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedResult {
    pub title: String,
    pub file_size_mb: f64,
    pub hash: String,
}

/// Store key for a movie's scrape results.
pub fn movie_key(imdb_id: &str) -> String {
    format!("movie:{imdb_id}")
}

/// Store key for one season of a TV series' scrape results.
pub fn tv_key(imdb_id: &str, season: i32) -> String {
    format!("tv:{imdb_id}:{season}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_keys() {
        assert_eq!(movie_key("tt0111161"), "movie:tt0111161");
        assert_eq!(tv_key("tt0903747", 2), "tv:tt0903747:2");
    }

    #[test]
    fn content_type_round_trips_through_str() {
        for ct in [ContentType::Movie, ContentType::Tv, ContentType::Unknown] {
            let s = serde_json::to_string(&ct).unwrap();
            assert_eq!(s, format!("\"{}\"", ct.as_str()));
        }
    }
}
