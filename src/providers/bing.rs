//! Bing Web Search API v7 provider.
//!
//! Requires a subscription key; without one it returns no results instead of
//! erroring, so a missing key degrades coverage rather than aborting runs.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{SearchHit, SearchProvider};

const ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/search";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    web_pages: Option<WebPages>,
}

#[derive(Debug, Deserialize)]
struct WebPages {
    #[serde(default)]
    value: Vec<WebPage>,
}

#[derive(Debug, Deserialize)]
struct WebPage {
    name: Option<String>,
    url: Option<String>,
    snippet: Option<String>,
}

pub struct BingProvider {
    client: reqwest::Client,
    api_key: String,
    timeout: Duration,
}

impl BingProvider {
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
impl SearchProvider for BingProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if self.api_key.is_empty() {
            return Ok(Vec::new());
        }

        let count = limit.to_string();
        let response = self
            .client
            .get(ENDPOINT)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("count", count.as_str()),
                ("responseFilter", "Webpages"),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .context("bing search request")?
            .error_for_status()
            .context("bing search status")?;

        let data: SearchResponse = response.json().await.context("bing search body")?;
        let pages = data.web_pages.map(|w| w.value).unwrap_or_default();

        let mut hits = Vec::with_capacity(pages.len());
        for page in pages {
            let Some(url) = page.url else { continue };
            hits.push(SearchHit::new(
                page.name.unwrap_or_default(),
                url,
                page.snippet.unwrap_or_default(),
            ));
        }
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "bing"
    }
}
