//! Per-query-key cache for RPC query results
//!
//! Keys are `procedure:input-json`. Mutations invalidate whole procedure
//! groups by prefix (`vessel.` drops every vessel query).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;

#[derive(Clone)]
struct CacheEntry {
    value: Value,
    created_at: Instant,
}

pub struct QueryCache {
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<String, CacheEntry>,
}

/// Cache key for a query call
pub fn query_key(procedure: &str, input_json: &str) -> String {
    format!("{}:{}", procedure, input_json)
}

impl QueryCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            entries: HashMap::new(),
        }
    }

    fn evict_stale(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, v| v.created_at.elapsed() <= ttl);
    }

    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.evict_stale();
        self.entries.get(key).map(|e| e.value.clone())
    }

    pub fn insert(&mut self, key: String, value: Value) {
        self.evict_stale();
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            if let Some(victim) = self
                .entries
                .iter()
                .min_by_key(|(_, v)| v.created_at)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    /// Drop every entry whose key starts with `prefix`. Returns how many
    /// were dropped.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| !k.starts_with(prefix));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
