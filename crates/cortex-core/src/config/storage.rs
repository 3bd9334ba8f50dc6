use serde::{Deserialize, Serialize};

/// Dimensionality and durability configuration for `cortex-storage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Embedding dimension `D`; mismatched `D` on a new write is a fatal
    /// `Contract` error (spec.md §6).
    pub embedding_dim: usize,
    /// Cosine-similarity threshold at/above which a candidate `Memory` is a
    /// duplicate and refused on insert (spec.md §3, §9 — *not* the same as
    /// `link_threshold`).
    pub dedup_threshold: f64,
    /// SQLite busy_timeout, milliseconds.
    pub busy_timeout_ms: u32,
    pub read_pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 384,
            dedup_threshold: 0.92,
            busy_timeout_ms: 5_000,
            read_pool_size: 4,
        }
    }
}
