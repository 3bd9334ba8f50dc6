/// A single k-NN result: the entity id and its distance from the query
/// (cosine distance, `1 − similarity`, for unit vectors — spec.md §4.1).
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub entity_id: String,
    pub distance: f64,
}

impl Neighbor {
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}

/// Capability-probing vector index (spec.md §4.1, §9 "dynamic dispatch").
/// Callers never branch on whether ANN is available — `knn` picks the best
/// available path internally and the brute-force fallback is always
/// correct, just potentially slower.
pub trait VectorIndex: Send + Sync {
    /// Insert or replace the vector for `entity_id`.
    fn upsert(&mut self, entity_id: &str, embedding: &[f32]);

    /// Remove the vector for `entity_id`, if present.
    fn remove(&mut self, entity_id: &str);

    /// Find the `k` nearest neighbors to `query`, ordered by ascending
    /// distance.
    fn knn(&self, query: &[f32], k: usize) -> Vec<Neighbor>;

    /// Number of vectors currently indexed.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an accelerated (non-brute-force) path is active.
    fn capability_check(&self) -> IndexCapability;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCapability {
    Accelerated,
    BruteForce,
}
