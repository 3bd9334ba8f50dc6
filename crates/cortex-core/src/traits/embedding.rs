use crate::errors::CortexResult;

/// Pluggable embedding provider (spec.md §6 — consumed, never implemented by
/// the core). Returns unit-length `f32` vectors of `dimensions()` length.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> CortexResult<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> CortexResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }
}
