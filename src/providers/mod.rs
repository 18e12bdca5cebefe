//! # Search Providers
//!
//! The web search backend is an external collaborator: the pipeline only
//! needs `search(query, limit)`. A failed query degrades discovery coverage
//! for that query alone; the orchestrator logs it and moves on.

pub mod bing;
pub mod serpapi;

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

/// One raw web search result.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub url: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
    fn name(&self) -> &'static str;
}

/// Fixed-response provider for tests and offline runs.
#[derive(Default)]
pub struct StaticProvider {
    hits: RwLock<HashMap<String, Vec<SearchHit>>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register hits for a query.
    pub fn with_hits(self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.hits.write().unwrap().insert(query.to_string(), hits);
        self
    }

    /// Register bare URLs as hits for a query.
    pub fn with_urls(self, query: &str, urls: &[&str]) -> Self {
        let hits = urls.iter().map(|u| SearchHit::new("", *u, "")).collect();
        self.with_hits(query, hits)
    }
}

#[async_trait]
impl SearchProvider for StaticProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let mut hits = self
            .hits
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default();
        hits.truncate(limit);
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
