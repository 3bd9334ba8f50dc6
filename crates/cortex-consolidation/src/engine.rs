//! `ConsolidationEngine`: the pairwise dedup-merge facade (spec.md §4.7),
//! grounded in `RetrievalEngine`'s role as the orchestration layer that
//! needs `MemoryStore` + `LinkStore` together.

use cortex_core::config::ConsolidationConfig;
use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::traits::{LinkStore, MemoryStore, TemporalFilter};
use cortex_core::{RelationKind, Scope};

use crate::candidates::{find_candidates, MergeCandidate};
use crate::merge::build_merged_memory;

/// Outcome of one `consolidate` pass.
#[derive(Debug, Clone)]
pub struct ConsolidationOutcome {
    pub merged_id: String,
    pub original_ids: (String, String),
    pub similarity: f64,
}

pub struct ConsolidationEngine<'a> {
    store: &'a (dyn MemoryStore + Sync),
    links: &'a (dyn LinkStore + Sync),
    config: ConsolidationConfig,
}

impl<'a> ConsolidationEngine<'a> {
    pub fn new(store: &'a (dyn MemoryStore + Sync), links: &'a (dyn LinkStore + Sync), config: ConsolidationConfig) -> Self {
        Self { store, links, config }
    }

    /// Runs one consolidation pass over every active memory visible to
    /// `scope`: finds pairwise candidates, merges each with the configured
    /// strategy, wires `supersedes` edges new -> originals, and
    /// soft-invalidates the originals. Never hard-deletes (spec.md §4.7).
    pub fn consolidate(&self, scope: &Scope, project_override: Option<bool>) -> CortexResult<Vec<ConsolidationOutcome>> {
        let filter = TemporalFilter::default();
        let memories = self.store.search_candidates(scope, &filter)?;
        let candidates = find_candidates(&memories, &self.config, project_override);

        let mut outcomes = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            outcomes.push(self.merge_one(&candidate)?);
        }
        Ok(outcomes)
    }

    fn merge_one(&self, candidate: &MergeCandidate) -> CortexResult<ConsolidationOutcome> {
        let merged = build_merged_memory(candidate, self.config.merge_strategy, None)?;
        let merged_id = merged.id.clone();
        self.store.insert(&merged)?;

        self.links.link(&merged_id, &candidate.a.id, RelationKind::Supersedes, 1.0)?;
        self.links.link(&merged_id, &candidate.b.id, RelationKind::Supersedes, 1.0)?;

        self.store.soft_invalidate(&candidate.a.id, &merged_id)?;
        self.store.soft_invalidate(&candidate.b.id, &merged_id)?;

        tracing::info!(merged_id, a = %candidate.a.id, b = %candidate.b.id, similarity = candidate.similarity, "consolidated pair");

        Ok(ConsolidationOutcome { merged_id, original_ids: (candidate.a.id.clone(), candidate.b.id.clone()), similarity: candidate.similarity })
    }

    /// Reverses one `consolidate` result: restores both originals and
    /// hard-deletes the merged memory, but only if no edge besides its own
    /// `supersedes` pair still references it (spec.md §4.7).
    pub fn undo(&self, merged_id: &str) -> CortexResult<()> {
        self.store
            .get(merged_id)?
            .ok_or_else(|| CortexError::not_found("memory", merged_id))?;

        let outgoing = self.links.links_of(merged_id)?;
        let supersedes: Vec<&str> = outgoing
            .iter()
            .filter(|l| l.source_id == merged_id && l.relation == RelationKind::Supersedes)
            .map(|l| l.target_id.as_str())
            .collect();
        if supersedes.is_empty() {
            return Err(CortexError::contract(format!("{merged_id} has no supersedes edges to undo")));
        }

        let extra_refs = outgoing
            .iter()
            .any(|l| !(l.source_id == merged_id && l.relation == RelationKind::Supersedes));
        if extra_refs {
            return Err(CortexError::contract(format!(
                "{merged_id} has edges beyond its own supersedes set and cannot be safely undone"
            )));
        }

        for original_id in &supersedes {
            self.store.restore(original_id)?;
        }

        self.links.delete_links_of(merged_id)?;
        self.store.delete(merged_id)?;
        tracing::info!(merged_id, originals = ?supersedes, "undid consolidation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::config::consolidation::MergeStrategy;
    use cortex_core::config::StorageConfig;
    use cortex_core::Memory;
    use cortex_storage::StorageEngine;
    use test_fixtures::aged_memory;

    fn test_cfg() -> StorageConfig {
        StorageConfig { embedding_dim: 2, ..StorageConfig::default() }
    }

    fn memory(id: &str, content: &str, embedding: Vec<f32>, age_days: i64) -> Memory {
        aged_memory(id, content, embedding, 0.5, age_days)
    }

    #[test]
    fn s4_consolidation_roundtrip() {
        // S4 — consolidation roundtrip seed scenario from spec.md §8.
        let storage = StorageEngine::open_in_memory(&test_cfg()).unwrap();
        storage.insert(&memory("a", "the sky is blue", vec![1.0, 0.0], 10)).unwrap();
        storage.insert(&memory("b", "the sky is blue today", vec![0.995, 0.0998], 10)).unwrap();

        let config = ConsolidationConfig {
            enabled: true,
            min_corpus_size: 2,
            merge_strategy: MergeStrategy::Concatenate,
            ..ConsolidationConfig::default()
        };
        let engine = ConsolidationEngine::new(&storage, &storage, config);
        let outcomes = engine.consolidate(&Scope::Global, Some(true)).unwrap();
        assert_eq!(outcomes.len(), 1);
        let outcome = &outcomes[0];

        let a = storage.get("a").unwrap().unwrap();
        let b = storage.get("b").unwrap().unwrap();
        assert_eq!(a.invalidated_by.as_deref(), Some(outcome.merged_id.as_str()));
        assert_eq!(b.invalidated_by.as_deref(), Some(outcome.merged_id.as_str()));
        assert!(!a.is_active());
        assert!(!b.is_active());

        let links = storage.links_of(&outcome.merged_id).unwrap();
        assert_eq!(links.iter().filter(|l| l.relation == RelationKind::Supersedes).count(), 2);

        engine.undo(&outcome.merged_id).unwrap();
        let a = storage.get("a").unwrap().unwrap();
        let b = storage.get("b").unwrap().unwrap();
        assert!(a.is_active());
        assert!(b.is_active());
        assert!(storage.get(&outcome.merged_id).unwrap().is_none());
    }

    #[test]
    fn undo_refuses_a_merged_memory_with_extra_references() {
        let storage = StorageEngine::open_in_memory(&test_cfg()).unwrap();
        storage.insert(&memory("a", "one", vec![1.0, 0.0], 10)).unwrap();
        storage.insert(&memory("b", "one dup", vec![0.999, 0.01], 10)).unwrap();

        let config = ConsolidationConfig { enabled: true, min_corpus_size: 2, ..ConsolidationConfig::default() };
        let engine = ConsolidationEngine::new(&storage, &storage, config);
        let outcomes = engine.consolidate(&Scope::Global, None).unwrap();
        let merged_id = outcomes[0].merged_id.clone();

        storage.insert(&memory("c", "unrelated", vec![0.0, 1.0], 10)).unwrap();
        storage.link(&merged_id, "c", RelationKind::Related, 1.0).unwrap();

        assert!(engine.undo(&merged_id).is_err());
    }
}
