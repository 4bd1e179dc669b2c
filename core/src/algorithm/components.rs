use rustc_hash::FxHashSet;

use crate::graph::{GraphStore, VertexId};
use crate::handle::VertexHandle;
use crate::traversal::{bfs, Continue, NoPrune, OnVertex};

/// Weakly connected components.
///
/// Components are ordered by their smallest vertex ID and each is sorted.
pub fn connected_components<G: GraphStore>(graph: &G) -> Vec<Vec<VertexHandle<'_, G>>> {
    let mut assigned: FxHashSet<VertexId> = FxHashSet::default();
    let mut components = Vec::new();

    for root in graph.vertex_ids() {
        if assigned.contains(&root) {
            continue;
        }
        let mut members = Vec::new();
        bfs(
            graph,
            [root],
            OnVertex(|v: VertexHandle<'_, G>| {
                members.push(v.id());
                true
            }),
            NoPrune,
            true,
        );
        members.sort_unstable();
        assigned.extend(members.iter().copied());
        components.push(members.into_iter().map(|id| graph.find_vertex(id)).collect());
    }
    components
}

/// Whether the graph is one weakly connected component. False when empty.
pub fn is_connected<G: GraphStore>(graph: &G) -> bool {
    let Some(root) = graph.vertex_ids().next() else {
        return false;
    };
    bfs(graph, [root], Continue, NoPrune, true) == graph.count_vertex()
}

/// Connected, with exactly one fewer edge than vertices.
pub fn is_tree<G: GraphStore>(graph: &G) -> bool {
    is_connected(graph) && graph.count_edge() + 1 == graph.count_vertex()
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
            g.insert_edge(src, dst, 0, i as u64);
        }
        g
    }

    fn component_ids<G: GraphStore>(graph: &G) -> Vec<Vec<u64>> {
        connected_components(graph)
            .into_iter()
            .map(|c| c.into_iter().map(|v| v.id()).collect())
            .collect()
    }

    #[test]
    fn test_components_ignore_direction() {
        let g: CompactGraph = make_graph(6, &[(2, 1), (3, 2), (5, 4)]);
        assert_eq!(component_ids(&g), vec![vec![1, 2, 3], vec![4, 5], vec![6]]);
        assert!(!is_connected(&g));
    }

    #[test]
    fn test_tree_and_non_tree() {
        let star: IndexedGraph = make_graph(4, &[(1, 2), (1, 3), (4, 1)]);
        assert!(is_connected(&star));
        assert!(is_tree(&star));

        let cycle: IndexedGraph = make_graph(3, &[(1, 2), (2, 3), (3, 1)]);
        assert!(is_connected(&cycle));
        assert!(!is_tree(&cycle));

        let empty: CompactGraph = make_graph(0, &[]);
        assert!(!is_connected(&empty));
        assert!(!is_tree(&empty));
        assert!(component_ids(&empty).is_empty());
    }
}
