//! The hybrid ranker's full pipeline (spec.md §4.4), steps 3-11. Steps 1-2
//! (gathering BM25 scores and vector neighbors) are a storage concern and
//! live in [`crate::facade`]; this module is pure and storage-agnostic so
//! it's straightforward to test against hand-built candidate lists.

use std::collections::HashMap;

use cortex_core::config::RetrievalConfig;
use cortex_core::traits::Neighbor;
use cortex_core::{Document, Memory, SymbolType};

use crate::boosts::{apply_centrality_boost, apply_quality_boost, apply_recency_decay};
use crate::candidate::{sort_ranked, Candidate};
use crate::fusion::fuse_candidates;
use crate::mmr::apply_mmr;
use crate::regex_filter::apply_regex_filter;
use crate::symbol_boost::apply_symbol_boost;
use crate::type_filter::apply_type_filter;

/// A final, ranked hit: a plain payload plus its clamped score, with
/// per-source ranking metadata dropped — callers that need provenance read
/// it off the `Candidate` stage directly.
#[derive(Debug, Clone)]
pub struct RankedResult<P> {
    pub id: String,
    pub payload: P,
    pub score: f64,
}

/// Step 11: threshold cut, clamp to `[*, 1.0]`, limit.
fn cut_and_clamp<P>(mut candidates: Vec<Candidate<P>>, threshold: f64, limit: usize) -> Vec<RankedResult<P>> {
    candidates.retain(|c| c.score >= threshold);
    sort_ranked(&mut candidates);
    candidates.truncate(limit);
    candidates
        .into_iter()
        .map(|c| RankedResult { id: c.id, payload: c.payload, score: c.score.min(1.0) })
        .collect()
}

/// Shared code/docs ranking: steps 3-6 plus MMR plus the cut. `apply_symbol_boost`
/// is the only code-specific step — on a docs corpus it's a no-op because
/// prose chunks carry no `symbol_name`.
#[allow(clippy::too_many_arguments)]
fn rank_documents(
    query: &str,
    bm25_scored: &[(String, f64)],
    vector_neighbors: &[Neighbor],
    documents: HashMap<String, Document>,
    regex: Option<&str>,
    symbol_type: Option<SymbolType>,
    config: &RetrievalConfig,
    limit: usize,
    threshold: f64,
) -> Vec<RankedResult<Document>> {
    let mut candidates = fuse_candidates(bm25_scored, vector_neighbors, documents, config.rrf_k, config.alpha);
    apply_symbol_boost(&mut candidates, query, config.symbol_boost_exact, config.symbol_boost_partial);

    let mut candidates = match regex {
        Some(pattern) => apply_regex_filter(candidates, pattern, config.max_regex_len),
        None => candidates,
    };
    if let Some(symbol_type) = symbol_type {
        candidates = apply_type_filter(candidates, symbol_type);
    }
    let candidates = apply_mmr(candidates, &config.mmr);
    cut_and_clamp(candidates, threshold, limit)
}

#[allow(clippy::too_many_arguments)]
pub fn search_code(
    query: &str,
    bm25_scored: &[(String, f64)],
    vector_neighbors: &[Neighbor],
    documents: HashMap<String, Document>,
    regex: Option<&str>,
    symbol_type: Option<SymbolType>,
    config: &RetrievalConfig,
    limit: usize,
    threshold: f64,
) -> Vec<RankedResult<Document>> {
    rank_documents(query, bm25_scored, vector_neighbors, documents, regex, symbol_type, config, limit, threshold)
}

#[allow(clippy::too_many_arguments)]
pub fn search_docs(
    query: &str,
    bm25_scored: &[(String, f64)],
    vector_neighbors: &[Neighbor],
    documents: HashMap<String, Document>,
    regex: Option<&str>,
    config: &RetrievalConfig,
    limit: usize,
    threshold: f64,
) -> Vec<RankedResult<Document>> {
    rank_documents(query, bm25_scored, vector_neighbors, documents, regex, None, config, limit, threshold)
}

/// Steps 3, 5, 7-11 for the memory corpus. Symbol boost and the type
/// filter don't apply — memories carry neither a `symbol_name` nor a
/// `symbol_type`.
#[allow(clippy::too_many_arguments)]
pub fn search_memories(
    bm25_scored: &[(String, f64)],
    vector_neighbors: &[Neighbor],
    memories: HashMap<String, Memory>,
    regex: Option<&str>,
    centrality_of: impl Fn(&str) -> f64,
    config: &RetrievalConfig,
    limit: usize,
    threshold: f64,
) -> Vec<RankedResult<Memory>> {
    let candidates = fuse_candidates(bm25_scored, vector_neighbors, memories, config.rrf_k, config.alpha);
    let mut candidates = match regex {
        Some(pattern) => apply_regex_filter(candidates, pattern, config.max_regex_len),
        None => candidates,
    };
    apply_quality_boost(&mut candidates, &config.quality_boost);
    apply_recency_decay(&mut candidates, &config.recency_decay);
    apply_centrality_boost(&mut candidates, &config.centrality_boost, centrality_of);
    let candidates = apply_mmr(candidates, &config.mmr);
    cut_and_clamp(candidates, threshold, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cortex_core::Scope;
    use std::collections::HashSet;

    fn doc(id: &str, symbol_name: Option<&str>) -> Document {
        Document {
            id: id.into(),
            scope: Scope::Global,
            path: "code:a.rs".into(),
            chunk_index: 0,
            content: format!("fn {id}() {{}}"),
            start_line: 1,
            end_line: 1,
            embedding: vec![0.1, 0.2],
            symbol_name: symbol_name.map(String::from),
            symbol_type: Some(SymbolType::Function),
            signature: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn both_sources_empty_yields_empty_never_errors() {
        let out = search_code(
            "anything",
            &[],
            &[],
            HashMap::new(),
            None,
            None,
            &RetrievalConfig::default(),
            20,
            0.0,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn exact_symbol_match_ranks_above_a_pure_bm25_hit() {
        // S1 — code hybrid ranking symbol boost seed scenario from spec.md §8.
        let mut documents = HashMap::new();
        documents.insert("exact".to_string(), doc("exact", Some("getUserById")));
        documents.insert("other".to_string(), doc("other", None));

        let bm25 = vec![("other".to_string(), 5.0), ("exact".to_string(), 1.0)];
        let out = search_code(
            "getUserById",
            &bm25,
            &[],
            documents,
            None,
            None,
            &RetrievalConfig::default(),
            20,
            0.0,
        );
        assert_eq!(out[0].id, "exact");
    }

    #[test]
    fn unknown_requested_type_empties_the_result() {
        let mut documents = HashMap::new();
        documents.insert("a".to_string(), doc("a", None));
        let bm25 = vec![("a".to_string(), 1.0)];
        let out = search_code(
            "a",
            &bm25,
            &[],
            documents,
            None,
            Some(SymbolType::Class),
            &RetrievalConfig::default(),
            20,
            0.0,
        );
        assert!(out.is_empty());
    }

    fn memory(id: &str, quality: Option<f64>) -> Memory {
        Memory {
            id: id.into(),
            scope_id: None,
            content: "x".into(),
            tags: HashSet::new(),
            source: None,
            kind: cortex_core::MemoryKind::Observation,
            quality_score: quality,
            quality_factors: None,
            embedding: vec![1.0, 0.0],
            access_count: 0.0,
            last_accessed: None,
            valid_from: None,
            valid_until: None,
            invalidated_by: None,
            correction_count: 0,
            is_invariant: false,
            created_at: Utc::now(),
            content_hash: Memory::compute_content_hash("x"),
        }
    }

    #[test]
    fn threshold_cut_drops_low_scoring_memories() {
        let mut memories = HashMap::new();
        memories.insert("m".to_string(), memory("m", None));
        let bm25 = vec![("m".to_string(), 0.01)];
        let out = search_memories(&bm25, &[], memories, None, |_| 0.0, &RetrievalConfig::default(), 20, 0.9);
        assert!(out.is_empty());
    }

    #[test]
    fn final_score_is_clamped_to_one() {
        let mut memories = HashMap::new();
        memories.insert("m".to_string(), memory("m", Some(1.0)));
        let bm25 = vec![("m".to_string(), 1.0)];
        let vector = vec![Neighbor { entity_id: "m".into(), distance: 0.0 }];
        let out = search_memories(&bm25, &vector, memories, None, |_| 1.0, &RetrievalConfig::default(), 20, 0.0);
        assert!(out[0].score <= 1.0);
    }
}
