use chrono::{DateTime, Utc};

use crate::errors::CortexResult;
use crate::model::{Document, Memory, MemoryLink, RelationKind, Scope, SymbolType};
use crate::traits::vector_index::Neighbor;

/// C1: document CRUD plus vector k-NN over the `code`/`docs` corpora.
/// Implemented by `cortex-storage::StorageEngine`.
pub trait DocumentStore: Send + Sync {
    fn upsert_document(&self, doc: &Document) -> CortexResult<()>;

    /// Cascades to the ANN index and `FileHash` rows (spec.md §4.1).
    fn delete_documents_by_path(&self, scope: &Scope, path: &str) -> CortexResult<usize>;

    fn get_document(&self, scope: &Scope, id: &str) -> CortexResult<Option<Document>>;

    /// Whether `path` is unchanged since the last ingest (skip re-chunking).
    fn file_unchanged(&self, scope: &Scope, path: &str, content: &str) -> CortexResult<bool>;

    fn record_file_hash(&self, scope: &Scope, path: &str, content: &str) -> CortexResult<()>;

    /// k-NN over document embeddings, filtered to `corpus` and visible to
    /// `scope`. ANN-or-brute-force is the implementation's concern.
    fn knn_documents(
        &self,
        scope: &Scope,
        corpus: &str,
        query: &[f32],
        k: usize,
    ) -> CortexResult<Vec<Neighbor>>;

    fn get_documents_bulk(&self, scope: &Scope, ids: &[String]) -> CortexResult<Vec<Document>>;

    /// All documents in `corpus` visible to `scope`, for BM25 index builds.
    fn all_documents(&self, scope: &Scope, corpus: &str) -> CortexResult<Vec<Document>>;

    fn document_by_symbol(
        &self,
        scope: &Scope,
        symbol_type: SymbolType,
    ) -> CortexResult<Vec<Document>>;
}

/// Per-item outcome of a batch memory insert (spec.md §4.1, §4.5).
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    Saved { id: String },
    Duplicate { id: String, similarity: f64 },
}

/// Options controlling a single `save` call (spec.md §4.5).
#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub dedup: bool,
    pub dedup_threshold: f64,
    pub auto_link: bool,
    pub link_threshold: f64,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            dedup: true,
            dedup_threshold: crate::constants::DEDUP_THRESHOLD,
            auto_link: true,
            link_threshold: crate::constants::AUTO_LINK_THRESHOLD,
        }
    }
}

/// Temporal/validity filters for `search`/`query` (spec.md §4.5).
#[derive(Debug, Clone, Default)]
pub struct TemporalFilter {
    pub include_expired: bool,
    pub as_of: Option<DateTime<Utc>>,
}

/// C1 (for memory vectors) + C5: the memory store. Implemented by
/// `cortex-storage::StorageEngine`.
pub trait MemoryStore: Send + Sync {
    fn get(&self, id: &str) -> CortexResult<Option<Memory>>;

    fn get_bulk(&self, ids: &[String]) -> CortexResult<Vec<Memory>>;

    /// Inserts unconditionally; dedup/auto-link are orchestrated by the
    /// caller (`cortex-retrieval`'s memory-store facade) since they need the
    /// `VectorIndex` and `LinkStore` together. `StorageEngine` itself only
    /// guarantees the ACID insert.
    fn insert(&self, memory: &Memory) -> CortexResult<()>;

    fn insert_bulk(&self, memories: &[Memory]) -> CortexResult<usize>;

    fn soft_invalidate(&self, id: &str, superseded_by: &str) -> CortexResult<()>;

    fn restore(&self, id: &str) -> CortexResult<()>;

    fn access(&self, ids: &[String], weight: f64) -> CortexResult<()>;

    fn delete(&self, id: &str) -> CortexResult<()>;

    /// All memories visible to `scope`, honoring `filter` (spec.md §4.5).
    fn search_candidates(&self, scope: &Scope, filter: &TemporalFilter) -> CortexResult<Vec<Memory>>;

    fn knn_memories(
        &self,
        scope: &Scope,
        query: &[f32],
        k: usize,
        include_global: bool,
        filter: &TemporalFilter,
    ) -> CortexResult<Vec<Neighbor>>;

    fn vacuum(&self) -> CortexResult<()>;
}

/// C6 persistence: typed edges between memories. Traversal, auto-link, and
/// centrality live in `cortex-graph`, built on top of this trait.
pub trait LinkStore: Send + Sync {
    /// Idempotent on `(source, target, relation)`: repeated calls return the
    /// existing edge's id unchanged (spec.md §3, §4.6).
    fn link(
        &self,
        source_id: &str,
        target_id: &str,
        relation: RelationKind,
        weight: f64,
    ) -> CortexResult<MemoryLink>;

    fn invalidate_link(
        &self,
        source_id: &str,
        target_id: &str,
        relation: Option<RelationKind>,
    ) -> CortexResult<usize>;

    fn links_of(&self, memory_id: &str) -> CortexResult<Vec<MemoryLink>>;

    /// Cascading delete of every edge touching `memory_id` (spec.md §3).
    fn delete_links_of(&self, memory_id: &str) -> CortexResult<usize>;
}
