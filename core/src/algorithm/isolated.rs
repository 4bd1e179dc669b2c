use tracing::debug;

use crate::graph::{GraphStore, GraphStoreMut, VertexId};
use crate::handle::VertexHandle;

/// A vertex with no incident edges. A self-loop counts as incident.
pub fn is_isolated<G: GraphStore>(vertex: &VertexHandle<'_, G>) -> bool {
    vertex.count_out_edge() == 0 && vertex.count_in_edge() == 0
}

fn isolated_ids<G: GraphStore>(graph: &G) -> impl Iterator<Item = VertexId> + '_ {
    graph
        .vertex_ids()
        .filter(move |&v| graph.count_out_edge(v) == 0 && graph.count_in_edge(v) == 0)
}

pub fn has_isolated_vertex<G: GraphStore>(graph: &G) -> bool {
    isolated_ids(graph).next().is_some()
}

/// Isolated vertices in ascending ID order.
pub fn isolated_vertices<G: GraphStore>(graph: &G) -> Vec<VertexHandle<'_, G>> {
    graph.vertices().filter(is_isolated).collect()
}

pub fn count_isolated_vertex<G: GraphStore>(graph: &G) -> usize {
    isolated_ids(graph).count()
}

/// Erase every isolated vertex. Returns how many were removed.
pub fn remove_isolated_vertex<G: GraphStoreMut>(graph: &mut G) -> usize {
    let doomed: Vec<VertexId> = isolated_ids(graph).collect();
    for &vertex in &doomed {
        graph.erase_vertex(vertex);
    }
    if !doomed.is_empty() {
        debug!(removed = doomed.len(), "removed isolated vertices");
    }
    doomed.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact::CompactGraph;
    use crate::indexed::IndexedGraph;

    fn make_graph<G: GraphStoreMut + Default>() -> G {
        // 1 -> 2, 3 self-loop, 4 and 5 isolated
        let mut g = G::default();
        for v in 1..=5 {
            g.insert_vertex(v, 0);
        }
        g.insert_edge(1, 2, 0, 1);
        g.insert_edge(3, 3, 0, 2);
        g
    }

    #[test]
    fn test_queries() {
        let g: CompactGraph = make_graph();
        assert!(has_isolated_vertex(&g));
        assert_eq!(count_isolated_vertex(&g), 2);
        let ids: Vec<_> = isolated_vertices(&g).iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec![4, 5]);
        assert!(!is_isolated(&g.find_vertex(3)));
        assert!(is_isolated(&g.find_vertex(4)));
    }

    #[test]
    fn test_remove_isolated() {
        let mut g: IndexedGraph = make_graph();
        assert_eq!(remove_isolated_vertex(&mut g), 2);
        assert_eq!(g.count_vertex(), 3);
        assert!(!has_isolated_vertex(&g));
        assert_eq!(remove_isolated_vertex(&mut g), 0);
    }

    #[test]
    fn test_erasing_edge_isolates() {
        let mut g: CompactGraph = make_graph();
        g.erase_edge(1);
        assert_eq!(count_isolated_vertex(&g), 4);
    }
}
