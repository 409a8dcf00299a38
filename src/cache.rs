// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time-bounded in-memory cache.
//!
//! Entries are stored with the instant they were fetched and are only served
//! while younger than the validity window. Expired entries stay in the map
//! until overwritten or evicted.

use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Cached value with its fetch time.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// Key -> (value, fetch time) map with a fixed validity window.
pub struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Get a fresh value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Get the value for `key` if it is still fresh at `now`.
    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let entry = self.entries.get(key)?;
        if now.saturating_duration_since(entry.fetched_at) < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Store `value` under `key`, stamped with the current time.
    pub fn put(&self, key: K, value: V) {
        self.put_at(key, value, Instant::now());
    }

    /// Store `value` under `key`, stamped with `fetched_at`.
    pub fn put_at(&self, key: K, value: V, fetched_at: Instant) {
        self.entries.insert(key, CacheEntry { value, fetched_at });
    }

    /// Remove the entry for `key`, returning its value regardless of age.
    pub fn evict(&self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|(_, entry)| entry.value)
    }

    /// Number of stored entries, fresh or expired.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
