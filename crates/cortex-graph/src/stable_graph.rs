//! The in-memory graph backing every traversal: a `petgraph::StableGraph`
//! keyed by memory id, rebuilt from `LinkStore::links_of`/reloaded on
//! demand rather than persisted separately.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Directed;

use cortex_core::{MemoryLink, RelationKind};

/// A node in the graph is just the memory id; all other memory state lives
/// in `cortex-storage`.
#[derive(Debug, Clone)]
pub struct LinkNode {
    pub memory_id: String,
}

/// Edge weight carrying enough of `MemoryLink` for traversal and
/// `connected_as_of` to evaluate validity without a second storage round
/// trip (spec.md §4.6).
#[derive(Debug, Clone)]
pub struct LinkEdge {
    pub relation: RelationKind,
    pub weight: f64,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl LinkEdge {
    pub fn is_active_at(&self, as_of: DateTime<Utc>) -> bool {
        if let Some(from) = self.valid_from {
            if as_of < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if as_of >= until {
                return false;
            }
        }
        true
    }

    pub fn was_visible_as_of(&self, as_of: DateTime<Utc>) -> bool {
        self.created_at < as_of && self.is_active_at(as_of)
    }
}

/// Wraps a `StableGraph` with an id→index lookup so callers never juggle
/// `NodeIndex` themselves.
#[derive(Debug, Default)]
pub struct IndexedGraph {
    pub graph: StableGraph<LinkNode, LinkEdge, Directed>,
    index: HashMap<String, NodeIndex>,
}

impl IndexedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_node(&self, memory_id: &str) -> Option<NodeIndex> {
        self.index.get(memory_id).copied()
    }

    /// Insert the node if absent, returning its index either way.
    pub fn ensure_node(&mut self, memory_id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(memory_id) {
            return idx;
        }
        let idx = self.graph.add_node(LinkNode { memory_id: memory_id.to_string() });
        self.index.insert(memory_id.to_string(), idx);
        idx
    }

    pub fn remove_node(&mut self, memory_id: &str) {
        if let Some(idx) = self.index.remove(memory_id) {
            self.graph.remove_node(idx);
        }
    }

    pub fn add_link(&mut self, link: &MemoryLink) {
        let source = self.ensure_node(&link.source_id);
        let target = self.ensure_node(&link.target_id);
        self.graph.add_edge(
            source,
            target,
            LinkEdge {
                relation: link.relation,
                weight: link.weight,
                valid_from: link.valid_from,
                valid_until: link.valid_until,
                created_at: link.created_at,
            },
        );
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Build a fresh graph from a flat list of active links — the shape
    /// `LinkStore::links_of` callers already have after traversing a scope.
    pub fn from_links<'a>(links: impl IntoIterator<Item = &'a MemoryLink>) -> Self {
        let mut graph = Self::new();
        for link in links {
            graph.add_link(link);
        }
        graph
    }
}
