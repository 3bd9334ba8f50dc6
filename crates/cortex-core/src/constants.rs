/// Cortex core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default embedding dimension when a caller doesn't configure one.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// BM25 parameters (spec.md §4.3).
pub const BM25_K1: f64 = 1.2;
pub const BM25_B: f64 = 0.75;

/// RRF smoothing constant (spec.md §4.4, Glossary).
pub const RRF_K: u32 = 60;

/// Similarity at/above which a new `Memory` is considered a duplicate and
/// refused (spec.md §3, §9).
pub const DEDUP_THRESHOLD: f64 = 0.92;

/// Similarity at/above which two memories are "similar enough to link" via
/// auto-link (spec.md §9 — distinct from `DEDUP_THRESHOLD`).
pub const AUTO_LINK_THRESHOLD: f64 = 0.7;

/// Max peers considered by auto-link (spec.md §4.6).
pub const AUTO_LINK_MAX_PEERS: usize = 3;

/// Soft cap on nodes visited during a knowledge-graph BFS (spec.md §4.6).
pub const GRAPH_BFS_MAX_VISITED: usize = 1000;

/// Practical traversal depth bound (spec.md §4.6).
pub const GRAPH_MAX_DEPTH: usize = 4;

/// Regex filters longer than this are ignored as a ReDoS guard (spec.md §4.4
/// step 5).
pub const MAX_REGEX_LEN: usize = 500;

/// Flatcase segmentation corpus-size threshold `T` (spec.md §4.2).
pub const SEGMENTATION_THRESHOLD: u64 = 10_000;
