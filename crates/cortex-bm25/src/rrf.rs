//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i).
//!
//! Combines independently-ranked candidate lists (BM25, vector similarity)
//! into one fused ranking without needing to normalize scores across
//! retrieval methods with different scales.

use std::collections::HashMap;

/// A fused candidate, with the rank it held in each contributing list.
#[derive(Debug, Clone, PartialEq)]
pub struct RrfCandidate {
    pub id: String,
    pub rrf_score: f64,
    pub bm25_rank: Option<usize>,
    pub vector_rank: Option<usize>,
}

/// Fuse a BM25-ranked list and a vector-ranked list. Ranks are 0-based
/// positions within each list. `alpha` biases the fusion toward vector
/// results (`alpha` weight) versus BM25 results (`1 - alpha` weight),
/// matching spec.md's default 0.4 lean toward vector similarity.
pub fn fuse(
    bm25_ranked: &[(String, usize)],
    vector_ranked: &[(String, usize)],
    k: u32,
    alpha: f64,
) -> Vec<RrfCandidate> {
    let mut scores: HashMap<String, f64> = HashMap::new();
    let mut bm25_ranks: HashMap<String, usize> = HashMap::new();
    let mut vector_ranks: HashMap<String, usize> = HashMap::new();

    for (id, rank) in bm25_ranked {
        let contribution = (1.0 - alpha) / (k as f64 + *rank as f64 + 1.0);
        *scores.entry(id.clone()).or_insert(0.0) += contribution;
        bm25_ranks.insert(id.clone(), *rank);
    }

    for (id, rank) in vector_ranked {
        let contribution = alpha / (k as f64 + *rank as f64 + 1.0);
        *scores.entry(id.clone()).or_insert(0.0) += contribution;
        vector_ranks.insert(id.clone(), *rank);
    }

    let mut candidates: Vec<RrfCandidate> = scores
        .into_iter()
        .map(|(id, rrf_score)| RrfCandidate {
            bm25_rank: bm25_ranks.get(&id).copied(),
            vector_rank: vector_ranks.get(&id).copied(),
            id,
            rrf_score,
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.rrf_score
            .partial_cmp(&a.rrf_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_in_both_lists_outranks_single_list_item() {
        let bm25 = vec![("a".to_string(), 0), ("b".to_string(), 1)];
        let vector = vec![("a".to_string(), 0), ("c".to_string(), 1)];
        let fused = fuse(&bm25, &vector, 60, 0.4);
        assert_eq!(fused[0].id, "a");
        assert!(fused[0].bm25_rank.is_some());
        assert!(fused[0].vector_rank.is_some());
    }

    #[test]
    fn alpha_zero_ignores_vector_only_hits_ranking_weight() {
        let bm25 = vec![("a".to_string(), 0)];
        let vector = vec![("b".to_string(), 0)];
        let fused = fuse(&bm25, &vector, 60, 0.0);
        let b = fused.iter().find(|c| c.id == "b").unwrap();
        assert_eq!(b.rrf_score, 0.0);
    }

    #[test]
    fn empty_lists_fuse_to_empty() {
        assert!(fuse(&[], &[], 60, 0.4).is_empty());
    }
}
