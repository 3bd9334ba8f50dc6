//! BFS traversal over active links, both directions treated as undirected
//! (spec.md §4.6): `connected` for the live graph, `connected_as_of` for a
//! point-in-time view.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use cortex_core::constants::{GRAPH_BFS_MAX_VISITED, GRAPH_MAX_DEPTH};

use crate::stable_graph::IndexedGraph;

/// A node reached during traversal, with its BFS depth and the path of
/// memory ids from the origin (inclusive of both endpoints).
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedNode {
    pub memory_id: String,
    pub depth: usize,
    pub path: Vec<String>,
}

/// Breadth-first search from `memory_id` over edges active *now*, both
/// directions unioned, each node visited at most once, depth capped at
/// [`GRAPH_MAX_DEPTH`] and the visited set capped at
/// [`GRAPH_BFS_MAX_VISITED`] (spec.md §4.6).
pub fn connected(graph: &IndexedGraph, memory_id: &str, max_depth: usize) -> Vec<ConnectedNode> {
    bfs(graph, memory_id, max_depth, |edge| edge.is_active_at(Utc::now()))
}

/// Same traversal, but an edge only counts if it was created before
/// `as_of` and was active at `as_of` (spec.md §4.6).
pub fn connected_as_of(
    graph: &IndexedGraph,
    memory_id: &str,
    as_of: DateTime<Utc>,
    max_depth: usize,
) -> Vec<ConnectedNode> {
    bfs(graph, memory_id, max_depth, move |edge| edge.was_visible_as_of(as_of))
}

fn bfs(
    graph: &IndexedGraph,
    memory_id: &str,
    max_depth: usize,
    edge_ok: impl Fn(&crate::stable_graph::LinkEdge) -> bool,
) -> Vec<ConnectedNode> {
    let max_depth = max_depth.min(GRAPH_MAX_DEPTH);
    let Some(start) = graph.get_node(memory_id) else {
        return Vec::new();
    };

    let mut visited = HashSet::new();
    visited.insert(start);
    let mut queue = VecDeque::new();
    queue.push_back((start, 0usize, vec![memory_id.to_string()]));
    let mut out = Vec::new();

    while let Some((current, depth, path)) = queue.pop_front() {
        if depth >= max_depth || visited.len() >= GRAPH_BFS_MAX_VISITED {
            continue;
        }

        let mut neighbors: Vec<_> = graph
            .graph
            .edges_directed(current, Direction::Outgoing)
            .filter(|e| edge_ok(e.weight()))
            .map(|e| e.target())
            .chain(
                graph
                    .graph
                    .edges_directed(current, Direction::Incoming)
                    .filter(|e| edge_ok(e.weight()))
                    .map(|e| e.source()),
            )
            .collect();
        neighbors.sort_by_key(|idx| idx.index());
        neighbors.dedup();

        for next in neighbors {
            if visited.len() >= GRAPH_BFS_MAX_VISITED {
                break;
            }
            if !visited.insert(next) {
                continue;
            }
            let Some(node) = graph.graph.node_weight(next) else { continue };
            let mut next_path = path.clone();
            next_path.push(node.memory_id.clone());
            out.push(ConnectedNode {
                memory_id: node.memory_id.clone(),
                depth: depth + 1,
                path: next_path.clone(),
            });
            queue.push_back((next, depth + 1, next_path));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::{MemoryLink, RelationKind};

    fn link(source: &str, target: &str) -> MemoryLink {
        MemoryLink {
            id: format!("{source}-{target}"),
            source_id: source.into(),
            target_id: target.into(),
            relation: RelationKind::Related,
            weight: 1.0,
            valid_from: None,
            valid_until: None,
            llm_enriched: false,
            created_at: Utc::now() - chrono::Duration::days(1),
        }
    }

    #[test]
    fn connected_visits_each_node_once_via_a_chain() {
        let links = vec![link("a", "b"), link("b", "c")];
        let graph = IndexedGraph::from_links(&links);
        let hits = connected(&graph, "a", 4);
        let ids: Vec<_> = hits.iter().map(|n| n.memory_id.clone()).collect();
        assert_eq!(ids, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(hits[1].depth, 2);
    }

    #[test]
    fn connected_treats_incoming_edges_as_traversable() {
        let links = vec![link("b", "a")];
        let graph = IndexedGraph::from_links(&links);
        let hits = connected(&graph, "a", 4);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].memory_id, "b");
    }

    #[test]
    fn connected_as_of_excludes_edges_created_after_the_cutoff() {
        let mut future_link = link("a", "b");
        future_link.created_at = Utc::now() + chrono::Duration::days(1);
        let graph = IndexedGraph::from_links(&[future_link]);
        let hits = connected_as_of(&graph, "a", Utc::now(), 4);
        assert!(hits.is_empty());
    }

    #[test]
    fn missing_origin_returns_empty() {
        let graph = IndexedGraph::new();
        assert!(connected(&graph, "ghost", 4).is_empty());
    }
}
