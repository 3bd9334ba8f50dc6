use crate::errors::CortexResult;

/// Pluggable LLM provider, used only by `cortex-consolidation` for
/// `require_llm_merge` and relation enrichment (spec.md §6). Best-effort:
/// errors here are never fatal to the core, they only skip the enrichment
/// step.
pub trait Llm: Send + Sync {
    fn generate(&self, prompt: &str, max_tokens: usize, temperature: f32) -> CortexResult<String>;
}
