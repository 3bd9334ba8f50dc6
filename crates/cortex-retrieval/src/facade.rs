//! The public entry point (spec.md §4.4, §4.5): `RetrievalEngine` wires
//! `cortex-storage`'s persistence, `cortex-graph`'s traversal/centrality,
//! and `cortex-bm25`'s per-corpus indices together behind `save`,
//! `batch_save`, and the three `search_*` surfaces.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use cortex_bm25::{BmIndex, BmParams, IndexCache};
use cortex_core::config::RetrievalConfig;
use cortex_core::constants::AUTO_LINK_MAX_PEERS;
use cortex_core::traits::{DocumentStore, LinkStore, MemoryStore, SaveOptions, SaveOutcome, TemporalFilter, VectorIndex};
use cortex_core::{CortexResult, Document, Memory, Scope, SymbolType};
use cortex_graph::{auto_link, GraphEngine};
use cortex_storage::vector::BruteForceIndex;
use cortex_storage::StorageEngine;
use cortex_tokens::{tokenize, tokenize_document, FrequencyTable, Mode, TokensConfig};

use crate::pipeline::{self, RankedResult};

/// How many candidates to scan when looking for auto-link peers — wider
/// than `AUTO_LINK_MAX_PEERS` so the threshold cut still has enough above
/// it to pick the true top-3 from.
const AUTO_LINK_SCAN_K: usize = 20;

fn corpus_key(scope: &Scope, corpus: &str) -> String {
    format!("{corpus}:{}", scope.as_db_value().unwrap_or("global"))
}

pub struct RetrievalEngine {
    storage: StorageEngine,
    graph: Mutex<GraphEngine>,
    bm25: IndexCache,
    freq: Mutex<FrequencyTable>,
    tokens_cfg: TokensConfig,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(storage: StorageEngine, tokens_cfg: TokensConfig, config: RetrievalConfig) -> Self {
        let centrality_ttl = match config.centrality_boost {
            cortex_core::config::CentralityBoost::Enabled { ttl_secs, .. } => Duration::from_secs(ttl_secs),
            cortex_core::config::CentralityBoost::Disabled => Duration::from_secs(300),
        };
        Self {
            storage,
            graph: Mutex::new(GraphEngine::new(10_000, centrality_ttl)),
            bm25: IndexCache::new(64),
            freq: Mutex::new(FrequencyTable::new()),
            tokens_cfg,
            config,
        }
    }

    pub fn storage(&self) -> &StorageEngine {
        &self.storage
    }

    /// Rebuild the in-memory graph for `scope` from storage by unioning
    /// every visible memory's edges. A periodic-job entry point; `save`/
    /// `batch_save` keep the graph current incrementally between calls.
    pub fn rebuild_graph(&self, scope: &Scope) -> CortexResult<()> {
        let filter = TemporalFilter { include_expired: true, as_of: None };
        let memories = self.storage.search_candidates(scope, &filter)?;
        let mut seen = std::collections::HashSet::new();
        let mut links = Vec::new();
        for memory in &memories {
            for link in self.storage.links_of(&memory.id)? {
                if seen.insert(link.id.clone()) {
                    links.push(link);
                }
            }
        }
        self.graph.lock().expect("graph lock poisoned").rebuild(&links);
        Ok(())
    }

    pub fn recompute_centrality(&self) {
        self.graph.lock().expect("graph lock poisoned").recompute_centrality();
    }

    // -- §4.5 Memory Store -------------------------------------------------

    pub fn save(&self, scope: &Scope, mut memory: Memory, options: SaveOptions) -> CortexResult<SaveOutcome> {
        memory.content_hash = Memory::compute_content_hash(&memory.content);

        if options.dedup {
            let filter = TemporalFilter::default();
            let neighbors = self.storage.knn_memories(scope, &memory.embedding, 1, true, &filter)?;
            if let Some(top) = neighbors.first() {
                if top.similarity() >= options.dedup_threshold {
                    return Ok(SaveOutcome::Duplicate { id: top.entity_id.clone(), similarity: top.similarity() });
                }
            }
        }

        self.storage.insert(&memory)?;
        self.bm25.invalidate(&corpus_key(scope, "mem"));

        if options.auto_link {
            self.auto_link_one(scope, &memory, options.link_threshold)?;
        }

        tracing::debug!(target: "cortex::audit", op = "save", id = %memory.id, "memory saved");
        Ok(SaveOutcome::Saved { id: memory.id })
    }

    /// O(1) duplicate scan per batch: existing vectors are loaded into one
    /// `BruteForceIndex` up front rather than re-querying storage per item,
    /// and accepted items are folded into the same index so later items in
    /// the batch dedup against earlier ones too (spec.md §4.5).
    pub fn batch_save(&self, scope: &Scope, memories: Vec<Memory>, dedup_threshold: f64, options: SaveOptions) -> CortexResult<Vec<SaveOutcome>> {
        let filter = TemporalFilter::default();
        let existing = self.storage.search_candidates(scope, &filter)?;
        let mut index = BruteForceIndex::from_rows(existing.into_iter().map(|m| (m.id, m.embedding)));

        let mut outcomes = Vec::with_capacity(memories.len());
        let mut accepted = Vec::new();

        for mut memory in memories {
            memory.content_hash = Memory::compute_content_hash(&memory.content);

            if options.dedup {
                if let Some(hit) = index.knn(&memory.embedding, 1).into_iter().next() {
                    if hit.similarity() >= dedup_threshold {
                        outcomes.push(SaveOutcome::Duplicate { id: hit.entity_id, similarity: hit.similarity() });
                        continue;
                    }
                }
            }

            index.upsert(&memory.id, &memory.embedding);
            outcomes.push(SaveOutcome::Saved { id: memory.id.clone() });
            accepted.push(memory);
        }

        self.storage.insert_bulk(&accepted)?;
        self.bm25.invalidate(&corpus_key(scope, "mem"));

        if options.auto_link {
            for memory in &accepted {
                self.auto_link_one(scope, memory, options.link_threshold)?;
            }
        }

        tracing::debug!(target: "cortex::audit", op = "batch_save", accepted = accepted.len(), "batch saved");
        Ok(outcomes)
    }

    fn auto_link_one(&self, scope: &Scope, memory: &Memory, threshold: f64) -> CortexResult<()> {
        let filter = TemporalFilter::default();
        let neighbors = self.storage.knn_memories(scope, &memory.embedding, AUTO_LINK_SCAN_K, true, &filter)?;
        let created = auto_link::auto_link(&self.storage, &memory.id, &neighbors, threshold, AUTO_LINK_MAX_PEERS)?;
        if !created.is_empty() {
            let mut graph = self.graph.lock().expect("graph lock poisoned");
            for link in &created {
                graph.add_link(link);
            }
        }
        Ok(())
    }

    pub fn soft_invalidate(&self, id: &str, superseded_by: &str) -> CortexResult<()> {
        self.storage.soft_invalidate(id, superseded_by)
    }

    pub fn restore(&self, id: &str) -> CortexResult<()> {
        self.storage.restore(id)
    }

    pub fn access(&self, ids: &[String], weight: f64) -> CortexResult<()> {
        self.storage.access(ids, weight)
    }

    // -- §4.4 Hybrid Ranker --------------------------------------------------

    fn bm25_scored_documents(&self, scope: &Scope, corpus: &str, query_text: &str) -> CortexResult<Vec<(String, f64)>> {
        let key = corpus_key(scope, corpus);
        let freq = self.freq.lock().expect("frequency table lock poisoned");
        let query_tokens = tokenize(query_text, Mode::Code, &freq, &self.tokens_cfg);
        let scored = self.bm25.with_index(
            &key,
            || {
                let mut idx = BmIndex::new();
                if let Ok(docs) = self.storage.all_documents(scope, corpus) {
                    for doc in docs {
                        let tokens = tokenize_document(&doc.content, doc.symbol_name.as_deref(), doc.signature.as_deref(), &freq, &self.tokens_cfg);
                        idx.upsert_document(&doc.id, &tokens);
                    }
                }
                idx
            },
            |idx| idx.score(&query_tokens, BmParams::default()),
        );
        Ok(scored)
    }

    fn bm25_scored_memories(&self, scope: &Scope, query_text: &str, filter: &TemporalFilter) -> CortexResult<Vec<(String, f64)>> {
        let key = corpus_key(scope, "mem");
        let freq = self.freq.lock().expect("frequency table lock poisoned");
        let query_tokens = tokenize(query_text, Mode::Prose, &freq, &self.tokens_cfg);
        let scored = self.bm25.with_index(
            &key,
            || {
                let mut idx = BmIndex::new();
                if let Ok(memories) = self.storage.search_candidates(scope, filter) {
                    for memory in memories {
                        let tokens = tokenize(&memory.content, Mode::Prose, &freq, &self.tokens_cfg);
                        idx.upsert_document(&memory.id, &tokens);
                    }
                }
                idx
            },
            |idx| idx.score(&query_tokens, BmParams::default()),
        );
        Ok(scored)
    }

    /// Ingest (or re-ingest) one document chunk: persists it and marks its
    /// corpus's BM25 index dirty. The vector side needs no separate upsert
    /// — `knn_documents` scans storage fresh on every query.
    pub fn ingest_document(&self, doc: &Document) -> CortexResult<()> {
        self.storage.upsert_document(doc)?;
        self.bm25.invalidate(&corpus_key(&doc.scope, doc.corpus()));
        tracing::debug!(target: "cortex::audit", op = "ingest_document", id = %doc.id, "document ingested");
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn search_code(
        &self,
        scope: &Scope,
        query_text: &str,
        query_embedding: &[f32],
        limit: usize,
        threshold: f64,
        regex: Option<&str>,
        symbol_type: Option<SymbolType>,
    ) -> CortexResult<Vec<RankedResult<Document>>> {
        let documents: HashMap<String, Document> = self.storage.all_documents(scope, "code")?.into_iter().map(|d| (d.id.clone(), d)).collect();
        let bm25_scored = self.bm25_scored_documents(scope, "code", query_text)?;
        let vector_neighbors = self.storage.knn_documents(scope, "code", query_embedding, self.config.k_vec)?;
        Ok(pipeline::search_code(query_text, &bm25_scored, &vector_neighbors, documents, regex, symbol_type, &self.config, limit, threshold))
    }

    pub fn search_docs(
        &self,
        scope: &Scope,
        query_text: &str,
        query_embedding: &[f32],
        limit: usize,
        threshold: f64,
        regex: Option<&str>,
    ) -> CortexResult<Vec<RankedResult<Document>>> {
        let documents: HashMap<String, Document> = self.storage.all_documents(scope, "docs")?.into_iter().map(|d| (d.id.clone(), d)).collect();
        let bm25_scored = self.bm25_scored_documents(scope, "docs", query_text)?;
        let vector_neighbors = self.storage.knn_documents(scope, "docs", query_embedding, self.config.k_vec)?;
        Ok(pipeline::search_docs(query_text, &bm25_scored, &vector_neighbors, documents, regex, &self.config, limit, threshold))
    }

    pub fn search_memories(
        &self,
        scope: &Scope,
        query_text: &str,
        query_embedding: &[f32],
        limit: usize,
        threshold: f64,
        filter: TemporalFilter,
        regex: Option<&str>,
    ) -> CortexResult<Vec<RankedResult<Memory>>> {
        let memories: HashMap<String, Memory> = self.storage.search_candidates(scope, &filter)?.into_iter().map(|m| (m.id.clone(), m)).collect();
        let bm25_scored = self.bm25_scored_memories(scope, query_text, &filter)?;
        let vector_neighbors = self.storage.knn_memories(scope, query_embedding, self.config.k_vec, true, &filter)?;

        let graph = self.graph.lock().expect("graph lock poisoned");
        let centrality_of = |id: &str| match graph.centrality_of(id) {
            Some(score) => score.normalized_degree,
            None => {
                graph.recompute_centrality();
                graph.centrality_of(id).map(|s| s.normalized_degree).unwrap_or(0.0)
            }
        };

        Ok(pipeline::search_memories(&bm25_scored, &vector_neighbors, memories, regex, centrality_of, &self.config, limit, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::config::StorageConfig;
    use test_fixtures::memory;

    fn engine() -> RetrievalEngine {
        let cfg = StorageConfig { embedding_dim: 2, ..StorageConfig::default() };
        let storage = StorageEngine::open_in_memory(&cfg).unwrap();
        RetrievalEngine::new(storage, TokensConfig::default(), RetrievalConfig::default())
    }

    #[test]
    fn save_then_search_memories_finds_it() {
        let engine = engine();
        let scope = Scope::Global;
        let outcome = engine.save(&scope, memory("m1", "database connection pooling", vec![1.0, 0.0]), SaveOptions::default()).unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved { .. }));

        let hits = engine
            .search_memories(&scope, "database connection pooling", &[1.0, 0.0], 10, 0.0, TemporalFilter::default(), None)
            .unwrap();
        assert!(hits.iter().any(|h| h.id == "m1"));
    }

    #[test]
    fn save_rejects_near_duplicate_content() {
        let engine = engine();
        let scope = Scope::Global;
        engine.save(&scope, memory("m1", "x", vec![1.0, 0.0]), SaveOptions::default()).unwrap();
        let outcome = engine
            .save(&scope, memory("m2", "x", vec![0.999, 0.001]), SaveOptions { dedup: true, dedup_threshold: 0.92, auto_link: false, link_threshold: 0.7 })
            .unwrap();
        assert!(matches!(outcome, SaveOutcome::Duplicate { .. }));
    }

    #[test]
    fn batch_save_dedups_within_the_same_batch() {
        let engine = engine();
        let scope = Scope::Global;
        let batch = vec![memory("a", "x", vec![1.0, 0.0]), memory("b", "x", vec![0.999, 0.001])];
        let outcomes = engine.batch_save(&scope, batch, 0.92, SaveOptions { dedup: true, dedup_threshold: 0.92, auto_link: false, link_threshold: 0.7 }).unwrap();
        let saved = outcomes.iter().filter(|o| matches!(o, SaveOutcome::Saved { .. })).count();
        assert_eq!(saved, 1);
    }
}
