//! Step 10 of the hybrid ranker (spec.md §4.4): Maximal Marginal Relevance
//! diversification. Iteratively picks the candidate maximizing
//! `lambda * rel(x) - (1 - lambda) * max_{y in S} cos(emb(x), emb(y))`,
//! trading off relevance against redundancy with what's already selected.

use cortex_core::config::MmrDiversification;

use crate::candidate::{Candidate, Scorable};

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)) as f64
}

/// Re-order `candidates` (already sorted by relevance) by MMR. `rel(x)` is
/// taken to be `x.score` normalized against the top score, since the
/// earlier pipeline stages leave `score` on an unbounded, boost-dependent
/// scale rather than `[0, 1]`.
pub fn apply_mmr<P: Scorable>(candidates: Vec<Candidate<P>>, config: &MmrDiversification) -> Vec<Candidate<P>> {
    let MmrDiversification::Enabled { lambda } = config else {
        return candidates;
    };
    if candidates.is_empty() {
        return candidates;
    }

    let max_score = candidates.iter().map(|c| c.score).fold(f64::MIN, f64::max).max(f64::EPSILON);
    let mut pool = candidates;
    let mut selected: Vec<Candidate<P>> = Vec::with_capacity(pool.len());

    while !pool.is_empty() {
        let mut best_idx = 0;
        let mut best_mmr = f64::MIN;
        for (idx, candidate) in pool.iter().enumerate() {
            let rel = candidate.score / max_score;
            let max_sim = selected
                .iter()
                .map(|s| cosine(candidate.payload.embedding(), s.payload.embedding()))
                .fold(0.0_f64, f64::max);
            let mmr = lambda * rel - (1.0 - lambda) * max_sim;
            if mmr > best_mmr {
                best_mmr = mmr;
                best_idx = idx;
            }
        }
        selected.push(pool.remove(best_idx));
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, score: f64, embedding: Vec<f32>) -> Candidate<Vec<f32>> {
        Candidate { id: id.to_string(), payload: embedding, score, bm25_rank: None, vector_rank: None, vector_similarity: None }
    }

    impl Scorable for Vec<f32> {
        fn content(&self) -> &str {
            ""
        }
        fn embedding(&self) -> &[f32] {
            self
        }
        fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
            chrono::Utc::now()
        }
    }

    #[test]
    fn disabled_preserves_input_order() {
        let candidates = vec![candidate("a", 1.0, vec![1.0, 0.0]), candidate("b", 0.5, vec![0.0, 1.0])];
        let out = apply_mmr(candidates, &MmrDiversification::Disabled);
        assert_eq!(out[0].id, "a");
        assert_eq!(out[1].id, "b");
    }

    #[test]
    fn prefers_a_diverse_second_pick_over_a_near_duplicate() {
        // "near" is a near-duplicate of the top pick "a"; "diverse" is
        // lower-scoring but orthogonal. A high (1-lambda) weight should
        // still surface "diverse" before "near".
        let candidates = vec![
            candidate("a", 1.0, vec![1.0, 0.0]),
            candidate("near", 0.95, vec![0.99, 0.01]),
            candidate("diverse", 0.6, vec![0.0, 1.0]),
        ];
        let out = apply_mmr(candidates, &MmrDiversification::Enabled { lambda: 0.5 });
        assert_eq!(out[0].id, "a");
        assert_eq!(out[1].id, "diverse");
    }
}
