//! Per-venue read cache with a fixed time-to-live
//!
//! Types and settings are read on every command but change rarely. Local
//! writes invalidate their venue entry; other replicas see changes once the
//! TTL runs out. A zero TTL disables caching.

use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: DashMap<String, (Instant, V)>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        if self.ttl.is_zero() {
            return None;
        }
        let entry = self.entries.get(key)?;
        let (stored_at, value) = entry.value();
        if stored_at.elapsed() < self.ttl {
            return Some(value.clone());
        }
        drop(entry);
        self.entries.remove(key);
        None
    }

    pub fn insert(&self, key: &str, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries
            .insert(key.to_string(), (Instant::now(), value));
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }
}
