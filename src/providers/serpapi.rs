//! SerpAPI (Google engine) provider.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{SearchHit, SearchProvider};

const ENDPOINT: &str = "https://serpapi.com/search.json";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

pub struct SerpApiProvider {
    client: reqwest::Client,
    api_key: String,
    timeout: Duration,
}

impl SerpApiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if self.api_key.is_empty() {
            return Ok(Vec::new());
        }

        let num = limit.to_string();
        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("num", num.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .context("serpapi search request")?
            .error_for_status()
            .context("serpapi search status")?;

        let data: SearchResponse = response.json().await.context("serpapi search body")?;

        let mut hits = Vec::with_capacity(data.organic_results.len());
        for result in data.organic_results {
            let Some(url) = result.link else { continue };
            hits.push(SearchHit::new(
                result.title.unwrap_or_default(),
                url,
                result.snippet.unwrap_or_default(),
            ));
        }
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "serpapi"
    }
}
