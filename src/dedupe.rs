//! Batch deduplication ahead of validation.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::source::{Source, SourceKey};

/// Collapse a batch of candidates to one entry per identity key. Each key
/// keeps its first-discovered position while the last-seen candidate wins
/// for its payload: later search results may carry richer company metadata.
///
/// `cap` bounds the work of the validation stage and applies after
/// deduplication, so it always counts unique sources. Because discovery
/// order is preserved, truncation always drops the same latest-discovered
/// tail for identical input, which keeps repeated runs convergent.
pub fn dedupe(candidates: Vec<Source>, cap: usize) -> Vec<Source> {
    let mut index: HashMap<SourceKey, usize> = HashMap::with_capacity(candidates.len());
    let mut unique: Vec<Source> = Vec::new();
    for source in candidates {
        match index.entry(source.key()) {
            Entry::Occupied(slot) => unique[*slot.get()] = source,
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(source);
            }
        }
    }
    unique.truncate(cap);
    unique
}
