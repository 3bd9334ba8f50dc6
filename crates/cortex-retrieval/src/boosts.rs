//! Steps 7-9 of the hybrid ranker (spec.md §4.4, memories only): quality
//! boost, recency decay, and centrality boost.

use chrono::Utc;

use cortex_core::config::{CentralityBoost, QualityBoost, RecencyDecay};
use cortex_core::Memory;

use crate::candidate::Candidate;

/// `score += weight * quality_score` when enabled. A memory with no
/// computed quality score contributes nothing (neutral, not a penalty).
pub fn apply_quality_boost(candidates: &mut [Candidate<Memory>], config: &QualityBoost) {
    let QualityBoost::Enabled { weight } = config else {
        return;
    };
    for c in candidates.iter_mut() {
        if let Some(quality) = c.payload.quality_score {
            c.score += weight * quality;
        }
    }
}

/// Multiplicative recency decay: `decay = max(floor, 2^(-age_hours/half_life))`,
/// skipped (decay = 1) for candidates ≤24h old when `temporal_auto_skip` is set.
pub fn apply_recency_decay(candidates: &mut [Candidate<Memory>], config: &RecencyDecay) {
    let RecencyDecay::Enabled { half_life_hours, floor, temporal_auto_skip } = config else {
        return;
    };
    let now = Utc::now();
    for c in candidates.iter_mut() {
        let age_hours = (now - c.payload.created_at).num_seconds() as f64 / 3600.0;
        if *temporal_auto_skip && age_hours <= 24.0 {
            continue;
        }
        let decay = (2.0_f64.powf(-age_hours / half_life_hours)).max(*floor);
        c.score *= decay;
    }
}

/// `score += weight * normalized_degree`, looked up via `centrality_of`
/// (the caller supplies the lazy-recompute-on-stale-TTL lookup).
pub fn apply_centrality_boost(
    candidates: &mut [Candidate<Memory>],
    config: &CentralityBoost,
    centrality_of: impl Fn(&str) -> f64,
) {
    let CentralityBoost::Enabled { weight, .. } = config else {
        return;
    };
    for c in candidates.iter_mut() {
        c.score += weight * centrality_of(&c.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashSet;

    fn memory(quality_score: Option<f64>, age_hours: i64) -> Memory {
        Memory {
            id: "m1".into(),
            scope_id: None,
            content: "x".into(),
            tags: HashSet::new(),
            source: None,
            kind: cortex_core::MemoryKind::Observation,
            quality_score,
            quality_factors: None,
            embedding: vec![1.0],
            access_count: 0.0,
            last_accessed: None,
            valid_from: None,
            valid_until: None,
            invalidated_by: None,
            correction_count: 0,
            is_invariant: false,
            created_at: Utc::now() - Duration::hours(age_hours),
            content_hash: Memory::compute_content_hash("x"),
        }
    }

    fn candidate(m: Memory) -> Candidate<Memory> {
        Candidate {
            id: m.id.clone(),
            payload: m,
            score: 1.0,
            bm25_rank: None,
            vector_rank: None,
            vector_similarity: None,
        }
    }

    #[test]
    fn quality_boost_adds_weighted_score() {
        let mut candidates = vec![candidate(memory(Some(0.5), 0))];
        apply_quality_boost(&mut candidates, &QualityBoost::Enabled { weight: 0.2 });
        assert!((candidates[0].score - 1.1).abs() < 1e-9);
    }

    #[test]
    fn disabled_quality_boost_is_a_noop() {
        let mut candidates = vec![candidate(memory(Some(0.5), 0))];
        apply_quality_boost(&mut candidates, &QualityBoost::Disabled);
        assert!((candidates[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn recent_candidate_skips_decay_under_auto_skip() {
        let mut candidates = vec![candidate(memory(None, 1))];
        apply_recency_decay(
            &mut candidates,
            &RecencyDecay::Enabled { half_life_hours: 168.0, floor: 0.1, temporal_auto_skip: true },
        );
        assert!((candidates[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn old_candidate_decays_toward_the_floor() {
        let mut candidates = vec![candidate(memory(None, 24 * 365))];
        apply_recency_decay(
            &mut candidates,
            &RecencyDecay::Enabled { half_life_hours: 168.0, floor: 0.1, temporal_auto_skip: true },
        );
        assert!((candidates[0].score - 0.1).abs() < 1e-9);
    }

    #[test]
    fn centrality_boost_adds_weighted_normalized_degree() {
        let mut candidates = vec![candidate(memory(None, 0))];
        apply_centrality_boost(&mut candidates, &CentralityBoost::Enabled { weight: 0.3, ttl_secs: 60 }, |_| 0.5);
        assert!((candidates[0].score - 1.15).abs() < 1e-9);
    }
}
