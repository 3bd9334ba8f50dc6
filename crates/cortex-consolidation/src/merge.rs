//! Merge-content strategies (spec.md §4.7): plain concatenation, or an
//! LLM-produced summary when `MergeStrategy::RequireLlm` is configured.

use chrono::Utc;
use cortex_core::config::consolidation::MergeStrategy;
use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::traits::Llm;
use cortex_core::{Memory, MemoryKind};

use crate::candidates::MergeCandidate;

const MERGE_PROMPT_MAX_TOKENS: usize = 256;
const MERGE_PROMPT_TEMPERATURE: f32 = 0.2;

fn concatenate(a: &Memory, b: &Memory) -> String {
    format!("{}\n\n{}", a.content, b.content)
}

fn merge_prompt(a: &Memory, b: &Memory) -> String {
    format!(
        "Merge the following two memories into one, preserving all distinct facts and dropping redundancy:\n\n1) {}\n\n2) {}",
        a.content, b.content
    )
}

/// Picks the dominant kind/invariant flags from the pair, preferring
/// whichever side is the "stronger" claim (an invariant, or the higher
/// correction count) so a merge never silently downgrades either source.
fn merged_kind(a: &Memory, b: &Memory) -> MemoryKind {
    if a.is_invariant || !b.is_invariant {
        a.kind
    } else {
        b.kind
    }
}

/// Builds the merged `Memory` for `candidate`, without an id (the caller
/// assigns one) and without touching storage. `llm` is required when
/// `strategy` is `RequireLlm`; its absence is a contract error rather than
/// a silent fallback to concatenation.
pub fn build_merged_memory(
    candidate: &MergeCandidate,
    strategy: MergeStrategy,
    llm: Option<&dyn Llm>,
) -> CortexResult<Memory> {
    let MergeCandidate { a, b, .. } = candidate;

    let content = match strategy {
        MergeStrategy::Concatenate => concatenate(a, b),
        MergeStrategy::RequireLlm => {
            let llm = llm
                .ok_or_else(|| CortexError::contract("require_llm_merge is set but no Llm provider was supplied"))?;
            llm.generate(&merge_prompt(a, b), MERGE_PROMPT_MAX_TOKENS, MERGE_PROMPT_TEMPERATURE)?
        }
    };

    let embedding = a
        .embedding
        .iter()
        .zip(b.embedding.iter())
        .map(|(x, y)| (x + y) / 2.0)
        .collect::<Vec<f32>>();

    Ok(Memory {
        id: uuid::Uuid::new_v4().to_string(),
        scope_id: a.scope_id.clone().or_else(|| b.scope_id.clone()),
        content: content.clone(),
        tags: a.tags.union(&b.tags).cloned().collect(),
        source: a.source.clone().or_else(|| b.source.clone()),
        kind: merged_kind(a, b),
        quality_score: match (a.quality_score, b.quality_score) {
            (Some(x), Some(y)) => Some(x.max(y)),
            (Some(x), None) => Some(x),
            (None, Some(y)) => Some(y),
            (None, None) => None,
        },
        quality_factors: None,
        embedding,
        access_count: a.access_count + b.access_count,
        last_accessed: a.last_accessed.max(b.last_accessed),
        valid_from: None,
        valid_until: None,
        invalidated_by: None,
        correction_count: 0,
        is_invariant: a.is_invariant || b.is_invariant,
        created_at: Utc::now(),
        content_hash: Memory::compute_content_hash(&content),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_fixtures::memory as fixture_memory;

    fn memory(id: &str, content: &str) -> Memory {
        fixture_memory(id, content, vec![1.0, 0.0])
    }

    #[test]
    fn concatenate_strategy_joins_both_contents() {
        let candidate = MergeCandidate { a: memory("a", "first fact"), b: memory("b", "second fact"), similarity: 0.95 };
        let merged = build_merged_memory(&candidate, MergeStrategy::Concatenate, None).unwrap();
        assert!(merged.content.contains("first fact"));
        assert!(merged.content.contains("second fact"));
    }

    #[test]
    fn require_llm_without_a_provider_errors() {
        let candidate = MergeCandidate { a: memory("a", "x"), b: memory("b", "y"), similarity: 0.95 };
        assert!(build_merged_memory(&candidate, MergeStrategy::RequireLlm, None).is_err());
    }

    struct StubLlm;
    impl Llm for StubLlm {
        fn generate(&self, _prompt: &str, _max_tokens: usize, _temperature: f32) -> CortexResult<String> {
            Ok("summarized merge".into())
        }
    }

    #[test]
    fn require_llm_with_a_provider_uses_its_output() {
        let candidate = MergeCandidate { a: memory("a", "x"), b: memory("b", "y"), similarity: 0.95 };
        let merged = build_merged_memory(&candidate, MergeStrategy::RequireLlm, Some(&StubLlm)).unwrap();
        assert_eq!(merged.content, "summarized merge");
    }

    #[test]
    fn merged_memory_gets_a_fresh_id_distinct_from_both_originals() {
        let candidate = MergeCandidate { a: memory("a", "x"), b: memory("b", "y"), similarity: 0.95 };
        let merged = build_merged_memory(&candidate, MergeStrategy::Concatenate, None).unwrap();
        assert_ne!(merged.id, "a");
        assert_ne!(merged.id, "b");
    }
}
