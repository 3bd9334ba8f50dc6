//! `auto_link`: wire a newly-saved memory to its most similar existing
//! peers with `similar_to` edges (spec.md §4.6). The k-NN scan itself is a
//! storage concern; this module only picks the top peers and persists the
//! edges, so it takes already-ranked neighbors rather than an embedding.

use cortex_core::constants::{AUTO_LINK_MAX_PEERS, AUTO_LINK_THRESHOLD};
use cortex_core::traits::{LinkStore, Neighbor};
use cortex_core::{CortexResult, MemoryLink, RelationKind};

/// Create `similar_to` edges from `memory_id` to its top `max_peers`
/// neighbors at or above `threshold` similarity. `neighbors` is assumed
/// ascending-distance (as returned by `VectorIndex::knn`/`knn_memories`)
/// and must not contain `memory_id` itself.
pub fn auto_link(
    link_store: &dyn LinkStore,
    memory_id: &str,
    neighbors: &[Neighbor],
    threshold: f64,
    max_peers: usize,
) -> CortexResult<Vec<MemoryLink>> {
    let mut created = Vec::new();
    for neighbor in neighbors.iter().filter(|n| n.entity_id != memory_id) {
        if created.len() >= max_peers {
            break;
        }
        if neighbor.similarity() < threshold {
            continue;
        }
        let link = link_store.link(memory_id, &neighbor.entity_id, RelationKind::SimilarTo, neighbor.similarity())?;
        created.push(link);
    }
    tracing::debug!(memory_id, peers = created.len(), "auto-link pass complete");
    Ok(created)
}

/// `auto_link` with spec.md §4.6's defaults (threshold 0.7, max 3 peers).
pub fn auto_link_default(
    link_store: &dyn LinkStore,
    memory_id: &str,
    neighbors: &[Neighbor],
) -> CortexResult<Vec<MemoryLink>> {
    auto_link(link_store, memory_id, neighbors, AUTO_LINK_THRESHOLD, AUTO_LINK_MAX_PEERS)
}
