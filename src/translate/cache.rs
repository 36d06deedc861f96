//! In-memory translation cache.
//!
//! Translations are keyed by language pair and source text and expire after a
//! day.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Default TTL for cached translations.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Prune expired entries once the cache grows past this size.
const PRUNE_THRESHOLD: usize = 500;

/// A cached value with expiration time.
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub struct TranslationCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl TranslationCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Cache key for translating `text` from `source` to `target`.
    pub fn key(source: &str, target: &str, text: &str) -> String {
        format!("{}_{}_{}", source, target, text)
    }

    /// Cached translation, or None if expired/missing.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok().and_then(|guard| {
            guard
                .get(key)
                .filter(|entry| !entry.is_expired())
                .map(|entry| entry.value.clone())
        })
    }

    pub fn insert(&self, key: String, value: String) {
        if let Ok(mut guard) = self.entries.write() {
            guard.insert(key, CacheEntry::new(value, self.ttl));
            if guard.len() > PRUNE_THRESHOLD {
                guard.retain(|_, entry| !entry.is_expired());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
