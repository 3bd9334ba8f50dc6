//! In-memory knowledge graph over `MemoryLink` edges (spec.md §4.6): BFS
//! traversal, auto-link, and a TTL'd degree-centrality cache, built on top
//! of `cortex-storage`'s `LinkStore` persistence.

pub mod auto_link;
pub mod centrality;
pub mod stable_graph;
pub mod traversal;

use std::time::Duration;

use chrono::{DateTime, Utc};

use cortex_core::constants::GRAPH_MAX_DEPTH;
use cortex_core::traits::{LinkStore, Neighbor};
use cortex_core::{CentralityScore, CortexResult, MemoryLink};

pub use centrality::CentralityCache;
pub use stable_graph::IndexedGraph;
pub use traversal::ConnectedNode;

/// Facade tying the in-memory graph, centrality cache, and auto-link logic
/// together. Callers rebuild it from `LinkStore::links_of` (or a bulk scope
/// scan) whenever the underlying edges change; it holds no connection of
/// its own.
pub struct GraphEngine {
    graph: IndexedGraph,
    centrality: CentralityCache,
}

impl GraphEngine {
    pub fn new(centrality_capacity: u64, centrality_ttl: Duration) -> Self {
        Self {
            graph: IndexedGraph::new(),
            centrality: CentralityCache::new(centrality_capacity, centrality_ttl),
        }
    }

    /// Replace the in-memory graph with one built fresh from `links`.
    pub fn rebuild<'a>(&mut self, links: impl IntoIterator<Item = &'a MemoryLink>) {
        self.graph = IndexedGraph::from_links(links);
        tracing::debug!(nodes = self.graph.node_count(), "graph rebuilt from links");
    }

    /// Incrementally add one edge without a full rebuild, for callers that
    /// keep a long-lived `GraphEngine` in sync with each `LinkStore::link`
    /// call rather than re-scanning the whole scope per query.
    pub fn add_link(&mut self, link: &MemoryLink) {
        self.graph.add_link(link);
    }

    pub fn graph(&self) -> &IndexedGraph {
        &self.graph
    }

    pub fn connected(&self, memory_id: &str, max_depth: usize) -> Vec<ConnectedNode> {
        traversal::connected(&self.graph, memory_id, max_depth.min(GRAPH_MAX_DEPTH))
    }

    pub fn connected_as_of(&self, memory_id: &str, as_of: DateTime<Utc>, max_depth: usize) -> Vec<ConnectedNode> {
        traversal::connected_as_of(&self.graph, memory_id, as_of, max_depth.min(GRAPH_MAX_DEPTH))
    }

    pub fn auto_link(
        &self,
        link_store: &dyn LinkStore,
        memory_id: &str,
        neighbors: &[Neighbor],
        threshold: f64,
        max_peers: usize,
    ) -> CortexResult<Vec<MemoryLink>> {
        auto_link::auto_link(link_store, memory_id, neighbors, threshold, max_peers)
    }

    pub fn recompute_centrality(&self) {
        self.centrality.recompute(&self.graph);
    }

    pub fn centrality_of(&self, memory_id: &str) -> Option<CentralityScore> {
        self.centrality.get(memory_id).map(|arc| *arc)
    }
}
