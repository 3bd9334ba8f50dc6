//! Shared coordinator over per-corpus BM25 indices.
//!
//! Each corpus (e.g. "code", "docs", a scope-qualified memory corpus) gets
//! its own [`BmIndex`] behind a reader-writer lock. `moka`'s `get_with`
//! collapses concurrent misses on the same corpus into a single rebuild —
//! callers racing to rebuild a just-invalidated index share the one
//! in-flight build rather than each re-scanning storage. `DashMap` tracks
//! which corpora are pending a rebuild, mirroring the concurrent-map
//! pattern the wider codebase uses for shared mutable registries.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use moka::sync::Cache;

use crate::index::BmIndex;

pub struct IndexCache {
    entries: Cache<String, Arc<RwLock<BmIndex>>>,
    dirty: DashMap<String, ()>,
}

impl IndexCache {
    /// `capacity` bounds the number of distinct corpora held at once; under
    /// pressure moka evicts the least-recently-used corpus, which is simply
    /// rebuilt from storage on next access.
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: Cache::new(capacity),
            dirty: DashMap::new(),
        }
    }

    /// Mark `corpus` for a rebuild on next access. Does not rebuild eagerly.
    pub fn invalidate(&self, corpus: &str) {
        self.dirty.insert(corpus.to_string(), ());
        tracing::debug!(corpus, "bm25 index invalidated");
    }

    fn slot<F>(&self, corpus: &str, build: F) -> Arc<RwLock<BmIndex>>
    where
        F: FnOnce() -> BmIndex,
    {
        if self.dirty.remove(corpus).is_some() {
            self.entries.invalidate(corpus);
        }
        self.entries
            .get_with(corpus.to_string(), || Arc::new(RwLock::new(build())))
    }

    /// Read-only access to `corpus`'s index, building it via `build` if it's
    /// missing or was invalidated since the last access.
    pub fn with_index<F, R>(&self, corpus: &str, build: F, read: impl FnOnce(&BmIndex) -> R) -> R
    where
        F: FnOnce() -> BmIndex,
    {
        let slot = self.slot(corpus, build);
        let guard = slot.read().expect("bm25 index lock poisoned");
        read(&guard)
    }

    /// Mutating access to `corpus`'s index (upsert/remove a document).
    pub fn update<F>(&self, corpus: &str, build: F, mutate: impl FnOnce(&mut BmIndex))
    where
        F: FnOnce() -> BmIndex,
    {
        let slot = self.slot(corpus, build);
        let mut guard = slot.write().expect("bm25 index lock poisoned");
        mutate(&mut guard);
    }

    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
