//! MDBList catalog client.
//!
//! One endpoint: info by IMDB id. Unknown identifiers come back as a 200
//! with an empty `type` tag, so classification treats the tag as a plain
//! string rather than an error.

use tracing::debug;

use crate::{MetadataError, SecondaryInfo};

const BASE_URL: &str = "https://mdblist.com/api/";

pub struct MdblistClient {
    api_key: String,
    client: reqwest::Client,
}

impl MdblistClient {
    pub fn new(api_key: String) -> Self {
        Self::with_client(api_key, crate::http_client())
    }

    pub fn with_client(api_key: String, client: reqwest::Client) -> Self {
        Self { api_key, client }
    }

    /// Info record for an IMDB id: type tag, title, release date and,
    /// when known, the internal TMDB id.
    pub async fn info_by_imdb(&self, imdb_id: &str) -> Result<SecondaryInfo, MetadataError> {
        debug!(imdb_id, "MDBList request");

        let resp = self
            .client
            .get(BASE_URL)
            .query(&[("apikey", self.api_key.as_str()), ("i", imdb_id)])
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "MDBList returned {}",
                resp.status()
            )));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))?;

        Ok(parse_secondary_info(&data))
    }
}

fn parse_secondary_info(data: &serde_json::Value) -> SecondaryInfo {
    SecondaryInfo {
        kind: data["type"].as_str().unwrap_or("").to_string(),
        title: data["title"].as_str().map(|s| s.to_string()),
        year: data["year"].as_i64().map(|y| y as i32),
        released: data["released"].as_str().map(|s| s.to_string()),
        tmdb_id: data["tmdbid"].as_u64(),
        score: data["score"].as_i64(),
    }
}
