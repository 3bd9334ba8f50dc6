//! `StorageEngine` — owns the `ConnectionPool`, runs migrations on startup,
//! and implements `DocumentStore` + `MemoryStore` + `LinkStore` over it.

use std::path::Path;

use cortex_core::config::StorageConfig;
use cortex_core::traits::{DocumentStore, LinkStore, MemoryStore, Neighbor, TemporalFilter, VectorIndex};
use cortex_core::{CortexError, CortexResult, Document, Memory, MemoryLink, RelationKind, Scope, SymbolType};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{document_ops, link_ops, maintenance, memory_crud, memory_query, vector_search};
use crate::queries::StorageStats;

/// The storage engine. Holds a `ConnectionPool` and routes reads through
/// the read pool when file-backed, or through the writer when in-memory
/// (in-memory read-pool connections are isolated databases that can't see
/// the writer's changes).
pub struct StorageEngine {
    pool: ConnectionPool,
    use_read_pool: bool,
    cfg: StorageConfig,
}

impl StorageEngine {
    pub fn open(path: &Path, cfg: &StorageConfig) -> CortexResult<Self> {
        let pool = ConnectionPool::open(path, cfg)?;
        let engine = Self { pool, use_read_pool: true, cfg: cfg.clone() };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn open_in_memory(cfg: &StorageConfig) -> CortexResult<Self> {
        let pool = ConnectionPool::open_in_memory(cfg)?;
        let engine = Self { pool, use_read_pool: false, cfg: cfg.clone() };
        engine.initialize()?;
        Ok(engine)
    }

    /// Runs migrations, then the Backend-error repair-on-startup contract
    /// (spec.md §7): a failed `PRAGMA integrity_check` fails the open rather
    /// than silently serving a corrupt database.
    fn initialize(&self) -> CortexResult<()> {
        self.pool.writer.with_conn_sync(migrations::run_migrations)?;
        let ok = self.pool.writer.with_conn_sync(maintenance::integrity_check)?;
        if !ok {
            tracing::error!(target: "cortex::audit", "integrity_check failed on startup");
            return Err(CortexError::backend("sqlite integrity_check failed on startup"));
        }
        Ok(())
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn with_reader<F, T>(&self, f: F) -> CortexResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> CortexResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }

    pub fn vacuum_full(&self) -> CortexResult<()> {
        self.pool.writer.with_conn_sync(|conn| maintenance::full_vacuum(conn))
    }

    pub fn stats(&self, scope: &Scope) -> CortexResult<StorageStats> {
        self.with_reader(|conn| maintenance::stats(conn, scope))
    }
}

impl DocumentStore for StorageEngine {
    fn upsert_document(&self, doc: &Document) -> CortexResult<()> {
        let dim = self.cfg.embedding_dim;
        self.pool.writer.with_conn_sync(|conn| document_ops::upsert_document(conn, doc, dim))
    }

    fn delete_documents_by_path(&self, scope: &Scope, path: &str) -> CortexResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| document_ops::delete_documents_by_path(conn, scope, path))
    }

    fn get_document(&self, scope: &Scope, id: &str) -> CortexResult<Option<Document>> {
        self.with_reader(|conn| document_ops::get_document(conn, scope, id))
    }

    fn file_unchanged(&self, scope: &Scope, path: &str, content: &str) -> CortexResult<bool> {
        self.with_reader(|conn| document_ops::file_unchanged(conn, scope, path, content))
    }

    fn record_file_hash(&self, scope: &Scope, path: &str, content: &str) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| document_ops::record_file_hash(conn, scope, path, content))
    }

    fn knn_documents(&self, scope: &Scope, corpus: &str, query: &[f32], k: usize) -> CortexResult<Vec<Neighbor>> {
        self.with_reader(|conn| vector_search::knn_documents(conn, scope, corpus, query, k))
    }

    fn get_documents_bulk(&self, scope: &Scope, ids: &[String]) -> CortexResult<Vec<Document>> {
        self.with_reader(|conn| document_ops::get_documents_bulk(conn, scope, ids))
    }

    fn all_documents(&self, scope: &Scope, corpus: &str) -> CortexResult<Vec<Document>> {
        self.with_reader(|conn| document_ops::all_documents(conn, scope, corpus))
    }

    fn document_by_symbol(&self, scope: &Scope, symbol_type: SymbolType) -> CortexResult<Vec<Document>> {
        self.with_reader(|conn| document_ops::document_by_symbol(conn, scope, symbol_type))
    }
}

impl MemoryStore for StorageEngine {
    fn get(&self, id: &str) -> CortexResult<Option<Memory>> {
        self.with_reader(|conn| memory_crud::get_memory(conn, id))
    }

    fn get_bulk(&self, ids: &[String]) -> CortexResult<Vec<Memory>> {
        self.with_reader(|conn| memory_crud::bulk_get(conn, ids))
    }

    fn insert(&self, memory: &Memory) -> CortexResult<()> {
        let dim = self.cfg.embedding_dim;
        self.pool.writer.with_conn_sync(|conn| memory_crud::insert_memory(conn, memory, dim))
    }

    fn insert_bulk(&self, memories: &[Memory]) -> CortexResult<usize> {
        let dim = self.cfg.embedding_dim;
        self.pool.writer.with_conn_sync(|conn| memory_crud::bulk_insert(conn, memories, dim))
    }

    fn soft_invalidate(&self, id: &str, superseded_by: &str) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| memory_crud::soft_invalidate(conn, id, superseded_by))
    }

    fn restore(&self, id: &str) -> CortexResult<()> {
        self.pool.writer.with_conn_sync(|conn| memory_crud::restore(conn, id))
    }

    fn access(&self, ids: &[String], weight: f64) -> CortexResult<()> {
        self.pool.writer.with_conn_sync(|conn| memory_crud::access(conn, ids, weight))
    }

    fn delete(&self, id: &str) -> CortexResult<()> {
        self.pool.writer.with_conn_sync(|conn| memory_crud::delete_memory(conn, id))
    }

    fn search_candidates(&self, scope: &Scope, filter: &TemporalFilter) -> CortexResult<Vec<Memory>> {
        self.with_reader(|conn| memory_query::search_candidates(conn, scope, filter))
    }

    fn knn_memories(
        &self,
        scope: &Scope,
        query: &[f32],
        k: usize,
        include_global: bool,
        filter: &TemporalFilter,
    ) -> CortexResult<Vec<Neighbor>> {
        self.with_reader(|conn| vector_search::knn_memories(conn, scope, query, k, include_global, filter))
    }

    fn vacuum(&self) -> CortexResult<()> {
        self.pool.writer.with_conn_sync(|conn| maintenance::vacuum(conn))
    }
}

impl LinkStore for StorageEngine {
    fn link(&self, source_id: &str, target_id: &str, relation: RelationKind, weight: f64) -> CortexResult<MemoryLink> {
        self.pool
            .writer
            .with_conn_sync(|conn| link_ops::link(conn, source_id, target_id, relation, weight))
    }

    fn invalidate_link(
        &self,
        source_id: &str,
        target_id: &str,
        relation: Option<RelationKind>,
    ) -> CortexResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| link_ops::invalidate_link(conn, source_id, target_id, relation))
    }

    fn links_of(&self, memory_id: &str) -> CortexResult<Vec<MemoryLink>> {
        self.with_reader(|conn| link_ops::links_of(conn, memory_id))
    }

    fn delete_links_of(&self, memory_id: &str) -> CortexResult<usize> {
        self.pool.writer.with_conn_sync(|conn| link_ops::delete_links_of(conn, memory_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::MemoryKind;

    fn test_cfg() -> StorageConfig {
        StorageConfig { embedding_dim: 2, ..StorageConfig::default() }
    }

    fn memory(id: &str) -> Memory {
        Memory {
            id: id.into(),
            scope_id: None,
            content: "hello world".into(),
            tags: Default::default(),
            source: None,
            kind: MemoryKind::Observation,
            quality_score: None,
            quality_factors: None,
            embedding: vec![1.0, 0.0],
            access_count: 0.0,
            last_accessed: None,
            valid_from: None,
            valid_until: None,
            invalidated_by: None,
            correction_count: 0,
            is_invariant: false,
            created_at: chrono::Utc::now(),
            content_hash: Memory::compute_content_hash("hello world"),
        }
    }

    #[test]
    fn round_trips_a_memory_through_the_engine() {
        let engine = StorageEngine::open_in_memory(&test_cfg()).unwrap();
        engine.insert(&memory("m1")).unwrap();
        let fetched = engine.get("m1").unwrap().unwrap();
        assert_eq!(fetched.content, "hello world");
    }

    #[test]
    fn link_then_traverse_via_links_of() {
        let engine = StorageEngine::open_in_memory(&test_cfg()).unwrap();
        engine.insert(&memory("a")).unwrap();
        engine.insert(&memory("b")).unwrap();
        engine.link("a", "b", RelationKind::Related, 0.9).unwrap();

        let links = engine.links_of("a").unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_id, "b");
    }

    #[test]
    fn soft_invalidate_then_restore_round_trips() {
        let engine = StorageEngine::open_in_memory(&test_cfg()).unwrap();
        engine.insert(&memory("a")).unwrap();
        engine.insert(&memory("b")).unwrap();
        engine.soft_invalidate("a", "b").unwrap();
        assert!(engine.get("a").unwrap().unwrap().invalidated_by.is_some());
        engine.restore("a").unwrap();
        assert!(engine.get("a").unwrap().unwrap().invalidated_by.is_none());
    }

    #[test]
    fn stats_reflects_inserted_memories_and_links() {
        let engine = StorageEngine::open_in_memory(&test_cfg()).unwrap();
        engine.insert(&memory("a")).unwrap();
        engine.insert(&memory("b")).unwrap();
        engine.link("a", "b", RelationKind::Related, 1.0).unwrap();

        let stats = engine.stats(&Scope::Global).unwrap();
        assert_eq!(stats.memory_count, 2);
        assert_eq!(stats.link_count, 1);
        assert_eq!(stats.isolated_count, 0);
    }
}
