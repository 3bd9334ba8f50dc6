use serde::{Deserialize, Serialize};

/// Merge-content strategy toggle (spec.md §4.7): LLM-produced vs plain
/// concatenation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MergeStrategy {
    Concatenate,
    RequireLlm,
}

impl Default for MergeStrategy {
    fn default() -> Self {
        MergeStrategy::Concatenate
    }
}

/// Consolidation subsystem configuration (spec.md §4.7). Global opt-in;
/// project-level config can only narrow it further, never enable it when
/// the global flag is off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    pub enabled: bool,
    pub similarity_for_merge: f64,
    pub min_memory_age_days: u32,
    pub min_corpus_size: usize,
    pub merge_strategy: MergeStrategy,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            similarity_for_merge: 0.92,
            min_memory_age_days: 7,
            min_corpus_size: 20,
            merge_strategy: MergeStrategy::default(),
        }
    }
}

impl ConsolidationConfig {
    /// Apply a project-level override: it may disable but never enable
    /// consolidation relative to the global flag (spec.md §4.7).
    pub fn effective_enabled(&self, project_override: Option<bool>) -> bool {
        self.enabled && project_override.unwrap_or(true)
    }
}
