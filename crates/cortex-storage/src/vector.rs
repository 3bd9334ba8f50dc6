//! Brute-force k-NN over in-memory embeddings, implementing
//! [`cortex_core::traits::VectorIndex`]. This is the fallback path spec.md
//! names explicitly; an ANN-accelerated index can implement the same trait
//! and swap in without callers changing (see `capability_check`).

use cortex_core::traits::{IndexCapability, Neighbor, VectorIndex};

#[derive(Debug, Clone)]
struct Entry {
    entity_id: String,
    embedding: Vec<f32>,
}

/// A brute-force in-memory index: O(n) per query, exact cosine distance.
/// The only `VectorIndex` this workspace ships — also the k-NN-miss
/// fallback an accelerated index would sit in front of.
#[derive(Debug, Default)]
pub struct BruteForceIndex {
    entries: Vec<Entry>,
}

impl BruteForceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = (String, Vec<f32>)>) -> Self {
        let entries = rows
            .into_iter()
            .map(|(entity_id, embedding)| Entry { entity_id, embedding })
            .collect();
        Self { entries }
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorIndex for BruteForceIndex {
    fn upsert(&mut self, entity_id: &str, embedding: &[f32]) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.entity_id == entity_id) {
            e.embedding = embedding.to_vec();
        } else {
            self.entries.push(Entry {
                entity_id: entity_id.to_string(),
                embedding: embedding.to_vec(),
            });
        }
    }

    fn remove(&mut self, entity_id: &str) {
        self.entries.retain(|e| e.entity_id != entity_id);
    }

    fn knn(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        let query_norm: f64 = query.iter().map(|x| (*x as f64).powi(2)).sum();
        if query_norm == 0.0 {
            return Vec::new();
        }
        let mut scored: Vec<Neighbor> = self
            .entries
            .iter()
            .map(|e| {
                let sim = cosine_similarity(query, &e.embedding);
                Neighbor {
                    entity_id: e.entity_id.clone(),
                    distance: 1.0 - sim,
                }
            })
            .collect();
        scored.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capability_check(&self) -> IndexCapability {
        IndexCapability::BruteForce
    }
}

/// f32 vectors are stored as little-endian byte blobs.
pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knn_ranks_identical_vector_first() {
        let mut idx = BruteForceIndex::new();
        idx.upsert("a", &[1.0, 0.0, 0.0]);
        idx.upsert("b", &[0.0, 1.0, 0.0]);
        let hits = idx.knn(&[1.0, 0.0, 0.0], 2);
        assert_eq!(hits[0].entity_id, "a");
        assert!(hits[0].similarity() > hits[1].similarity());
    }

    #[test]
    fn zero_query_returns_empty() {
        let mut idx = BruteForceIndex::new();
        idx.upsert("a", &[1.0, 0.0]);
        assert!(idx.knn(&[0.0, 0.0], 5).is_empty());
    }

    #[test]
    fn bytes_roundtrip() {
        let v = vec![1.0_f32, -2.5, 3.25];
        let bytes = f32_vec_to_bytes(&v);
        assert_eq!(bytes_to_f32_vec(&bytes), v);
    }

    #[test]
    fn remove_drops_entry() {
        let mut idx = BruteForceIndex::new();
        idx.upsert("a", &[1.0, 0.0]);
        idx.remove("a");
        assert_eq!(idx.len(), 0);
    }
}
