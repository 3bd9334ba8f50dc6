//! Steps 1-3 of the hybrid ranker (spec.md §4.4): take a corpus's BM25
//! scores and vector neighbors, rank each independently, and fuse them with
//! `cortex_bm25::fuse`.

use std::collections::HashMap;

use cortex_bm25::fuse;
use cortex_core::traits::Neighbor;

use crate::candidate::Candidate;

/// Turn a descending BM25 score list into 0-based ranks.
fn ranked_ids(scored: &[(String, f64)]) -> Vec<(String, usize)> {
    scored.iter().enumerate().map(|(rank, (id, _))| (id.clone(), rank)).collect()
}

/// Turn an ascending-distance neighbor list into 0-based ranks, alongside a
/// lookup from id to similarity for the tie-break rule and MMR.
fn ranked_neighbors(neighbors: &[Neighbor]) -> (Vec<(String, usize)>, HashMap<String, f64>) {
    let ranks = neighbors.iter().enumerate().map(|(rank, n)| (n.entity_id.clone(), rank)).collect();
    let similarities = neighbors.iter().map(|n| (n.entity_id.clone(), n.similarity())).collect();
    (ranks, similarities)
}

/// Fuse BM25 + vector candidates for one corpus and attach each candidate's
/// payload from `payloads`. Candidates with no matching payload (stale
/// index entry) are dropped rather than erroring — the index is a cache,
/// not the source of truth.
pub fn fuse_candidates<P>(
    bm25_scored: &[(String, f64)],
    vector_neighbors: &[Neighbor],
    payloads: HashMap<String, P>,
    rrf_k: u32,
    alpha: f64,
) -> Vec<Candidate<P>> {
    let bm25_ranks = ranked_ids(bm25_scored);
    let (vector_ranks, similarities) = ranked_neighbors(vector_neighbors);
    let fused = fuse(&bm25_ranks, &vector_ranks, rrf_k, alpha);

    let mut payloads = payloads;
    fused
        .into_iter()
        .filter_map(|c| {
            let payload = payloads.remove(&c.id)?;
            Some(Candidate {
                vector_similarity: similarities.get(&c.id).copied(),
                id: c.id,
                payload,
                score: c.rrf_score,
                bm25_rank: c.bm25_rank,
                vector_rank: c.vector_rank,
            })
        })
        .collect()
}
