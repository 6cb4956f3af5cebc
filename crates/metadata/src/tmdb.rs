//! TMDB (The Movie Database) catalog client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use tracing::debug;

use crate::{FindResult, FindResults, MetadataError, ResolvedMetadata};

const BASE_URL: &str = "https://api.themoviedb.org/3";

pub struct TmdbClient {
    api_key: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self::with_client(api_key, crate::http_client())
    }

    /// Build with a shared reqwest client (the worker reuses one client
    /// across all catalog consumers).
    pub fn with_client(api_key: String, client: reqwest::Client) -> Self {
        Self { api_key, client }
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, MetadataError> {
        let mut all_params = vec![("api_key", self.api_key.as_str())];
        all_params.extend_from_slice(params);

        let url = format!("{BASE_URL}{path}");
        debug!(url = %url, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "TMDB returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))
    }

    /// Look up a title by IMDB id. Returns the movie and TV candidate
    /// buckets, either of which may be empty.
    pub async fn find_by_imdb(&self, imdb_id: &str) -> Result<FindResults, MetadataError> {
        let data = self
            .get_json(
                &format!("/find/{imdb_id}"),
                &[("external_source", "imdb_id")],
            )
            .await?;

        Ok(parse_find_results(&data))
    }

    /// Full movie metadata by TMDB id. `NotFound` when the id does not
    /// exist for this type.
    pub async fn movie_details(&self, tmdb_id: u64) -> Result<ResolvedMetadata, MetadataError> {
        let data = self.get_json(&format!("/movie/{tmdb_id}"), &[]).await?;
        Ok(parse_movie_details(&data))
    }

    /// Full series metadata by TMDB id.
    pub async fn tv_details(&self, tmdb_id: u64) -> Result<ResolvedMetadata, MetadataError> {
        let data = self.get_json(&format!("/tv/{tmdb_id}"), &[]).await?;
        Ok(parse_tv_details(&data))
    }
}

fn parse_find_results(data: &serde_json::Value) -> FindResults {
    let movies = data["movie_results"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    let tv = data["tv_results"].as_array().cloned().unwrap_or_default();

    FindResults {
        movies: movies
            .iter()
            .map(|r| FindResult {
                tmdb_id: r["id"].as_u64().unwrap_or(0),
                title: r["title"].as_str().unwrap_or("Unknown").to_string(),
                year: r["release_date"]
                    .as_str()
                    .and_then(|d| d.get(..4))
                    .and_then(|y| y.parse().ok()),
            })
            .collect(),
        tv: tv
            .iter()
            .map(|r| FindResult {
                tmdb_id: r["id"].as_u64().unwrap_or(0),
                title: r["name"].as_str().unwrap_or("Unknown").to_string(),
                year: r["first_air_date"]
                    .as_str()
                    .and_then(|d| d.get(..4))
                    .and_then(|y| y.parse().ok()),
            })
            .collect(),
    }
}

fn parse_movie_details(data: &serde_json::Value) -> ResolvedMetadata {
    ResolvedMetadata {
        title: data["title"].as_str().map(|s| s.to_string()),
        name: None,
        release_date: data["release_date"].as_str().map(|s| s.to_string()),
        overview: data["overview"].as_str().map(|s| s.to_string()),
        runtime_minutes: data["runtime"].as_i64().map(|r| r as i32),
        vote_average: data["vote_average"].as_f64(),
        number_of_seasons: None,
    }
}

fn parse_tv_details(data: &serde_json::Value) -> ResolvedMetadata {
    ResolvedMetadata {
        title: None,
        name: data["name"].as_str().map(|s| s.to_string()),
        release_date: data["first_air_date"].as_str().map(|s| s.to_string()),
        overview: data["overview"].as_str().map(|s| s.to_string()),
        runtime_minutes: None,
        vote_average: data["vote_average"].as_f64(),
        number_of_seasons: data["number_of_seasons"].as_i64().map(|n| n as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_find_results_buckets() {
        let json = serde_json::json!({
            "movie_results": [
                { "id": 278, "title": "The Shawshank Redemption", "release_date": "1994-09-23" }
            ],
            "tv_results": [],
            "person_results": [
                { "id": 1, "name": "Somebody" }
            ]
        });

        let found = parse_find_results(&json);
        assert_eq!(found.movies.len(), 1);
        assert_eq!(found.movies[0].tmdb_id, 278);
        assert_eq!(found.movies[0].year, Some(1994));
        assert!(found.tv.is_empty());
    }

    #[test]
    fn parse_find_results_missing_buckets() {
        let found = parse_find_results(&serde_json::json!({}));
        assert!(found.movies.is_empty());
        assert!(found.tv.is_empty());
    }

    #[test]
    fn parse_movie_details_from_json() {
        let json = serde_json::json!({
            "title": "The Shawshank Redemption",
            "release_date": "1994-09-23",
            "overview": "Framed in the 1940s...",
            "runtime": 142,
            "vote_average": 8.7
        });

        let meta = parse_movie_details(&json);
        assert_eq!(meta.title.as_deref(), Some("The Shawshank Redemption"));
        assert_eq!(meta.name, None);
        assert_eq!(meta.release_date.as_deref(), Some("1994-09-23"));
        assert_eq!(meta.runtime_minutes, Some(142));
        assert!((meta.vote_average.unwrap() - 8.7).abs() < 0.01);
    }

    #[test]
    fn parse_tv_details_from_json() {
        let json = serde_json::json!({
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "number_of_seasons": 5,
            "vote_average": 9.5
        });

        let meta = parse_tv_details(&json);
        assert_eq!(meta.name.as_deref(), Some("Breaking Bad"));
        assert_eq!(meta.title, None);
        assert_eq!(meta.release_date.as_deref(), Some("2008-01-20"));
        assert_eq!(meta.number_of_seasons, Some(5));
    }
}
