use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::graph::{EdgeId, GraphStore, VertexId};
use crate::handle::VertexHandle;
use crate::traversal::neighbors;

/// Kahn's topological sort.
///
/// A vertex's degree is its incoming edge count, or every incident edge when
/// `bidirectional` is set. Zero-degree vertices seed the queue in ascending
/// ID order; dequeuing a vertex consumes each of its edges once (tracked by
/// edge ID, so parallel edges each count) and enqueues neighbors whose degree
/// drops to zero. `callback` returning `false` halts the sort.
///
/// In `bidirectional` mode every endpoint of an edge starts with a nonzero
/// degree, so only isolated vertices are ever emitted and a graph with any
/// edge always reports fewer than `count_vertex()`.
///
/// Returns the number of vertices dequeued, including one the callback
/// halted on. A result below `count_vertex()` on a full run means the graph
/// has a cycle.
pub fn topo_sort<'g, G, F>(graph: &'g G, mut callback: F, bidirectional: bool) -> usize
where
    G: GraphStore,
    F: FnMut(VertexHandle<'g, G>) -> bool,
{
    let mut degree: FxHashMap<VertexId, usize> = FxHashMap::default();
    let mut queue: VecDeque<VertexId> = VecDeque::new();
    for vertex in graph.vertex_ids() {
        let mut d = graph.count_in_edge(vertex);
        if bidirectional {
            d += graph.count_out_edge(vertex);
        }
        if d == 0 {
            queue.push_back(vertex);
        }
        degree.insert(vertex, d);
    }

    let mut consumed: FxHashSet<EdgeId> = FxHashSet::default();
    let mut dequeued = 0;
    while let Some(current) = queue.pop_front() {
        dequeued += 1;
        if !callback(VertexHandle::new(graph, current)) {
            return dequeued;
        }
        for (edge, neighbor, _) in neighbors(graph, current, bidirectional) {
            if !consumed.insert(edge) {
                continue;
            }
            if let Some(d) = degree.get_mut(&neighbor) {
                *d = d.saturating_sub(1);
                if *d == 0 && neighbor != current {
                    queue.push_back(neighbor);
                }
            }
        }
    }
    dequeued
}

/// Full topological order, or `None` if the graph has a cycle.
pub fn topological_order<G: GraphStore>(graph: &G) -> Option<Vec<VertexHandle<'_, G>>> {
    let mut order = Vec::with_capacity(graph.count_vertex());
    topo_sort(
        graph,
        |v| {
            order.push(v);
            true
        },
        false,
    );
    if order.len() < graph.count_vertex() {
        debug!(
            sorted = order.len(),
            vertices = graph.count_vertex(),
            "cycle detected in topological sort"
        );
        return None;
    }
    Some(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact::CompactGraph;
    use crate::graph::GraphStoreMut;
    use crate::indexed::IndexedGraph;

    fn make_graph<G: GraphStoreMut + Default>(n: u64, edges: &[(u64, u64)]) -> G {
        let mut g = G::default();
        for v in 1..=n {
            g.insert_vertex(v, 0);
        }
        for (i, &(src, dst)) in edges.iter().enumerate() {
            g.insert_edge(src, dst, 0, i as u64 + 1);
        }
        g
    }

    fn order_ids<G: GraphStore>(graph: &G, bidirectional: bool) -> (usize, Vec<u64>) {
        let mut ids = Vec::new();
        let count = topo_sort(
            graph,
            |v| {
                ids.push(v.id());
                true
            },
            bidirectional,
        );
        (count, ids)
    }

    #[test]
    fn test_chain_order() {
        let g: CompactGraph = make_graph(3, &[(1, 2), (2, 3)]);
        assert_eq!(order_ids(&g, false), (3, vec![1, 2, 3]));
        let order: Vec<_> = topological_order(&g).unwrap().iter().map(|v| v.id()).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_cycle_sorts_nothing() {
        let g: IndexedGraph = make_graph(3, &[(1, 2), (2, 3), (3, 1)]);
        assert_eq!(order_ids(&g, false), (0, vec![]));
        assert!(topological_order(&g).is_none());
    }

    #[test]
    fn test_parallel_edges_decrement_once_each() {
        let g: CompactGraph = make_graph(3, &[(1, 2), (1, 2), (2, 3)]);
        assert_eq!(order_ids(&g, false), (3, vec![1, 2, 3]));
    }

    #[test]
    fn test_seeds_in_id_order() {
        // 3 -> 1, 2 isolated
        let g: CompactGraph = make_graph(3, &[(3, 1)]);
        assert_eq!(order_ids(&g, false).1, vec![2, 3, 1]);
    }

    #[test]
    fn test_partial_cycle_stops_short() {
        // 1 -> 2 <-> 3
        let g: IndexedGraph = make_graph(3, &[(1, 2), (2, 3), (3, 2)]);
        assert_eq!(order_ids(&g, false), (1, vec![1]));
    }

    #[test]
    fn test_callback_halt_counts_halting_vertex() {
        let g: CompactGraph = make_graph(4, &[(1, 2), (2, 3), (3, 4)]);
        let count = topo_sort(&g, |v| v.id() < 2, false);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_bidirectional_degree() {
        // Every vertex of a path has an incident edge, so nothing has degree zero.
        let g: CompactGraph = make_graph(3, &[(1, 2), (2, 3)]);
        assert_eq!(order_ids(&g, true), (0, vec![]));

        // Isolated vertices sort; an edge joining two never does.
        let g: CompactGraph = make_graph(3, &[(1, 2)]);
        assert_eq!(order_ids(&g, true), (1, vec![3]));
    }

    #[test]
    fn test_bidirectional_emits_only_isolated_vertices() {
        let g: IndexedGraph = make_graph(4, &[(1, 2), (2, 3), (3, 4)]);
        let (count, ids) = order_ids(&g, true);
        assert_eq!((count, ids), (0, vec![]));
        assert!(count < g.count_vertex());

        let g: IndexedGraph = make_graph(5, &[(1, 2), (2, 3)]);
        assert_eq!(order_ids(&g, true), (2, vec![4, 5]));
    }
}
