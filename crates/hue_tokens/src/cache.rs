//! Memoized token resolutions
//!
//! Entries are keyed by the exact token string a caller asked for and store
//! either the resolved color or `None` for "known unresolvable". The dataset
//! is immutable, so entries are never invalidated; resolving the same token
//! twice always produces the same entry, which makes racing writers harmless.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use rustc_hash::FxHashMap;

use crate::resolver::ResolvedColor;

/// Hit/miss counters and entry count at a point in time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<FxHashMap<String, Option<ResolvedColor>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for `token`.
    ///
    /// The outer `Option` is presence in the cache; the inner one is the
    /// cached result, where `None` means the token is known not to resolve.
    pub fn get(&self, token: &str) -> Option<Option<ResolvedColor>> {
        let hit = self.entries.read().unwrap().get(token).cloned();
        match hit {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        hit
    }

    pub fn insert(&self, token: impl Into<String>, resolved: Option<ResolvedColor>) {
        self.entries.write().unwrap().insert(token.into(), resolved);
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.read().unwrap().contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
