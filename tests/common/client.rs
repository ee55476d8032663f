//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    pub async fn get_artist(&self, artist_id: &str) -> Response {
        self.client
            .get(format!("{}/artists/{}", self.base_url, artist_id))
            .send()
            .await
            .expect("Get artist request failed")
    }

    pub async fn search_artists(&self, name: &str, limit: Option<u32>) -> Response {
        let mut query = vec![("name", name.to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.client
            .get(format!("{}/artists/search", self.base_url))
            .query(&query)
            .send()
            .await
            .expect("Search request failed")
    }

    pub async fn update_artist(&self, name: &str, id: &str, platform: &str) -> Response {
        self.client
            .post(format!("{}/artists/update", self.base_url))
            .query(&[("name", name), ("id", id), ("platform", platform)])
            .send()
            .await
            .expect("Update artist request failed")
    }

    pub async fn list_artist_mappings(&self) -> Response {
        self.client
            .get(format!("{}/artists/mappings", self.base_url))
            .send()
            .await
            .expect("List mappings request failed")
    }

    pub async fn get_artist_mapping(&self, name: &str) -> Response {
        self.client
            .get(format!(
                "{}/artists/mappings/{}",
                self.base_url,
                urlencoding::encode(name)
            ))
            .send()
            .await
            .expect("Get mapping request failed")
    }
}
