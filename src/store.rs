//! # Source Store
//!
//! Durable persistence is an external collaborator; the pipeline only needs
//! an idempotent per-key upsert and a ranked query of exportable sources.
//! `MemoryStore` is the in-process implementation used by the binary and the
//! tests; a database-backed store plugs in behind the same trait.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::source::{Source, SourceKey, SourceStatus};

#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Insert or merge on the identity key. Merging overwrites status,
    /// robots_allowed, score and updated_at; the company name is only filled
    /// when previously unknown, never downgraded. Must be atomic per key.
    async fn upsert(&self, source: &Source) -> Result<()>;

    async fn get(&self, key: &SourceKey) -> Result<Option<Source>>;

    /// Sources the crawler may consume: `valid` and not robots-denied,
    /// ordered by score descending then updated_at descending, capped at
    /// `limit`.
    async fn exportable(&self, limit: usize) -> Result<Vec<Source>>;
}

#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<SourceKey, Source>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full unordered dump, for tests and debugging.
    pub fn snapshot(&self) -> Vec<Source> {
        self.rows.read().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl SourceStore for MemoryStore {
    async fn upsert(&self, source: &Source) -> Result<()> {
        let mut rows = self.rows.write().unwrap();
        match rows.entry(source.key()) {
            Entry::Occupied(mut entry) => {
                let row = entry.get_mut();
                if row.company.is_none() {
                    row.company = source.company.clone();
                }
                row.status = source.status;
                row.robots_allowed = source.robots_allowed;
                row.score = source.score;
                row.updated_at = source.updated_at;
            }
            Entry::Vacant(slot) => {
                slot.insert(source.clone());
            }
        }
        Ok(())
    }

    async fn get(&self, key: &SourceKey) -> Result<Option<Source>> {
        Ok(self.rows.read().unwrap().get(key).cloned())
    }

    async fn exportable(&self, limit: usize) -> Result<Vec<Source>> {
        let rows = self.rows.read().unwrap();
        let mut out: Vec<Source> = rows
            .values()
            .filter(|s| s.status == SourceStatus::Valid && s.robots_allowed.unwrap_or(true))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        out.truncate(limit);
        Ok(out)
    }
}
