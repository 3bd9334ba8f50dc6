//! Degree-centrality cache (spec.md §4.6): a periodic job recomputes
//! degree/normalized-degree per node; readers consume a cached value that
//! is allowed to be stale up to a TTL.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::sync::Cache;
use petgraph::Direction;

use cortex_core::CentralityScore;

use crate::stable_graph::IndexedGraph;

/// Caches one [`CentralityScore`] per memory id, evicting entries after
/// `ttl` so a stale read self-heals on the next recompute pass rather than
/// needing an explicit invalidation call.
pub struct CentralityCache {
    scores: Cache<String, Arc<CentralityScore>>,
}

impl CentralityCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            scores: Cache::builder().max_capacity(capacity).time_to_live(ttl).build(),
        }
    }

    pub fn get(&self, memory_id: &str) -> Option<Arc<CentralityScore>> {
        self.scores.get(memory_id)
    }

    /// Recompute degree centrality for every node currently in `graph` and
    /// repopulate the cache. Degree only counts edges active `now`
    /// (spec.md §4.6) — a soft-invalidated or expired edge still sits in
    /// the graph for traversal history but must not inflate centrality.
    /// The whole graph is small enough (bounded by a single scope's memory
    /// count) that this is a simple full rebuild rather than an incremental
    /// update.
    pub fn recompute(&self, graph: &IndexedGraph) {
        let now = Utc::now();
        let active_degree = |idx| {
            graph
                .graph
                .edges_directed(idx, Direction::Outgoing)
                .filter(|e| e.weight().is_active_at(now))
                .count()
                + graph
                    .graph
                    .edges_directed(idx, Direction::Incoming)
                    .filter(|e| e.weight().is_active_at(now))
                    .count()
        };

        let max_degree = graph.graph.node_indices().map(active_degree).max().unwrap_or(0).max(1);

        for idx in graph.graph.node_indices() {
            let degree = active_degree(idx);
            let Some(node) = graph.graph.node_weight(idx) else { continue };
            let score = CentralityScore {
                degree: degree as u32,
                normalized_degree: degree as f64 / max_degree as f64,
                updated_at: now,
            };
            self.scores.insert(node.memory_id.clone(), Arc::new(score));
        }
    }

    pub fn len(&self) -> u64 {
        self.scores.run_pending_tasks();
        self.scores.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
