//! Pairwise merge-candidate discovery (spec.md §4.7). Candidates are pairs
//! of active memories, not transitive clusters: a memory already consumed
//! by one pair is dropped from consideration by the next so a single
//! consolidation pass never merges the same memory twice.

use chrono::Utc;
use cortex_core::config::ConsolidationConfig;
use cortex_core::Memory;
use cortex_storage::vector::cosine_similarity;
use rayon::prelude::*;

/// One pair of active memories eligible to be merged.
#[derive(Debug, Clone)]
pub struct MergeCandidate {
    pub a: Memory,
    pub b: Memory,
    pub similarity: f64,
}

/// Finds merge candidates among `memories`, gated by `config` (spec.md
/// §4.7): both memories older than `min_memory_age_days`, corpus size at
/// least `min_corpus_size`, and pairwise cosine similarity at least
/// `similarity_for_merge`. `project_override` lets a project narrow (never
/// widen) the global opt-in.
pub fn find_candidates(
    memories: &[Memory],
    config: &ConsolidationConfig,
    project_override: Option<bool>,
) -> Vec<MergeCandidate> {
    if !config.effective_enabled(project_override) {
        return Vec::new();
    }
    if memories.len() < config.min_corpus_size {
        return Vec::new();
    }

    let now = Utc::now();
    let min_age = chrono::Duration::days(config.min_memory_age_days as i64);
    let eligible: Vec<&Memory> = memories
        .iter()
        .filter(|m| m.is_active_at(now) && now - m.created_at >= min_age)
        .collect();

    // All pairs above threshold, scored in parallel; greedily resolved
    // below so each memory appears in at most one candidate.
    let mut scored: Vec<(usize, usize, f64)> = (0..eligible.len())
        .into_par_iter()
        .flat_map(|i| {
            let eligible = &eligible;
            (i + 1..eligible.len())
                .filter_map(move |j| {
                    let sim = cosine_similarity(&eligible[i].embedding, &eligible[j].embedding);
                    (sim >= config.similarity_for_merge).then_some((i, j, sim))
                })
                .collect::<Vec<_>>()
        })
        .collect();
    scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    let mut used = vec![false; eligible.len()];
    let mut out = Vec::new();
    for (i, j, sim) in scored {
        if used[i] || used[j] {
            continue;
        }
        used[i] = true;
        used[j] = true;
        out.push(MergeCandidate { a: eligible[i].clone(), b: eligible[j].clone(), similarity: sim });
    }
    out
}
