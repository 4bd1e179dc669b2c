use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::{Direction, GraphStore, VertexId};
use crate::handle::VertexHandle;
use crate::traversal::neighbors;

/// Distinct neighbors of `vertex` if its local shape is compatible with a
/// simple path, `None` otherwise.
fn path_neighbors<G: GraphStore>(graph: &G, vertex: VertexId, bidirectional: bool) -> Option<Vec<VertexId>> {
    let mut per_direction: FxHashMap<(VertexId, Direction), usize> = FxHashMap::default();
    let mut incident = 0;
    for (_, neighbor, direction) in neighbors(graph, vertex, true) {
        if neighbor == vertex {
            return None;
        }
        incident += 1;
        *per_direction.entry((neighbor, direction)).or_insert(0) += 1;
    }

    let mut distinct: Vec<VertexId> = per_direction.keys().map(|&(n, _)| n).collect();
    distinct.sort_unstable();
    distinct.dedup();

    if bidirectional {
        if per_direction.values().any(|&count| count > 1) || distinct.len() > 2 {
            return None;
        }
    } else if incident > 2 || distinct.len() != incident {
        return None;
    }
    Some(distinct)
}

/// End points of the simple path formed by the whole graph.
///
/// Edge direction never matters for the walk: both in- and out-edges are
/// followed in either mode. `bidirectional` only decides whether a pair of
/// vertices may be joined by an edge each way, unlike [`crate::bfs`] and
/// [`crate::topo_sort`] where `false` means outgoing edges only.
///
/// Without `bidirectional`, consecutive vertices are joined by exactly one
/// edge of either direction. With it, a pair may also be joined by one edge
/// each way. Self-loops never fit. A single vertex is its own path,
/// `(v, v)`. Anything else, the empty graph included, yields two null
/// handles.
pub fn link_end_points<G: GraphStore>(graph: &G, bidirectional: bool) -> (VertexHandle<'_, G>, VertexHandle<'_, G>) {
    let not_link = (VertexHandle::null(), VertexHandle::null());

    let mut adjacency: FxHashMap<VertexId, Vec<VertexId>> = FxHashMap::default();
    let mut start = None;
    for vertex in graph.vertex_ids() {
        let Some(ns) = path_neighbors(graph, vertex, bidirectional) else {
            return not_link;
        };
        if start.is_none() && ns.len() <= 1 {
            start = Some(vertex);
        }
        adjacency.insert(vertex, ns);
    }
    let Some(start) = start else {
        return not_link;
    };

    let mut visited: FxHashSet<VertexId> = FxHashSet::default();
    visited.insert(start);
    let mut current = start;
    loop {
        let mut unvisited = adjacency
            .get(&current)
            .into_iter()
            .flatten()
            .copied()
            .filter(|n| !visited.contains(n));
        let Some(next) = unvisited.next() else {
            break;
        };
        if unvisited.next().is_some() {
            return not_link;
        }
        visited.insert(next);
        current = next;
    }

    let end_degree = adjacency.get(&current).map_or(0, Vec::len);
    if visited.len() != graph.count_vertex() || end_degree > 1 {
        return not_link;
    }
    let (a, b) = (start.min(current), start.max(current));
    (graph.find_vertex(a), graph.find_vertex(b))
}

/// Whether the whole graph is a single simple path or a lone vertex.
///
/// `bidirectional` has the meaning described on [`link_end_points`]; a
/// fan-out such as `1 <- 2 -> 3` is a link in both modes.
pub fn is_link<G: GraphStore>(graph: &G, bidirectional: bool) -> bool {
    !link_end_points(graph, bidirectional).0.is_null()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact::CompactGraph;
    use crate::graph::GraphStoreMut;
    use crate::indexed::IndexedGraph;

    fn make_graph<G: GraphStoreMut + Default>(vertices: &[u64], edges: &[(u64, u64)]) -> G {
        let mut g = G::default();
        for &v in vertices {
            g.insert_vertex(v, 0);
        }
        for (i, &(src, dst)) in edges.iter().enumerate() {
            g.insert_edge(src, dst, 0, i as u64 + 1);
        }
        g
    }

    fn end_ids<G: GraphStore>(graph: &G, bidirectional: bool) -> Option<(u64, u64)> {
        let (a, b) = link_end_points(graph, bidirectional);
        Some((a.get()?, b.get()?))
    }

    #[test]
    fn test_directed_path() {
        let g: CompactGraph = make_graph(&[1, 2, 3], &[(1, 2), (2, 3)]);
        assert!(is_link(&g, false));
        assert_eq!(end_ids(&g, false), Some((1, 3)));
    }

    #[test]
    fn test_mixed_directions_still_a_path() {
        let g: IndexedGraph = make_graph(&[1, 2, 3, 4], &[(2, 1), (2, 3), (4, 3)]);
        assert_eq!(end_ids(&g, false), Some((1, 4)));
    }

    #[test]
    fn test_direction_ignored_without_bidirectional() {
        // 1 <- 2 -> 3
        let g: CompactGraph = make_graph(&[1, 2, 3], &[(2, 1), (2, 3)]);
        assert!(is_link(&g, false));
        assert!(is_link(&g, true));
        assert_eq!(end_ids(&g, false), Some((1, 3)));
    }

    #[test]
    fn test_single_vertex() {
        let g: CompactGraph = make_graph(&[7], &[]);
        assert_eq!(end_ids(&g, false), Some((7, 7)));
        assert_eq!(end_ids(&g, true), Some((7, 7)));
    }

    #[test]
    fn test_empty_graph_is_not_a_link() {
        let g: CompactGraph = make_graph(&[], &[]);
        assert_eq!(end_ids(&g, false), None);
        assert!(!is_link(&g, true));
    }

    #[test]
    fn test_branch_cycle_and_forest_fail() {
        let star: CompactGraph = make_graph(&[1, 2, 3, 4], &[(1, 2), (1, 3), (1, 4)]);
        assert!(!is_link(&star, false));
        assert!(!is_link(&star, true));

        let cycle: IndexedGraph = make_graph(&[1, 2, 3], &[(1, 2), (2, 3), (3, 1)]);
        assert!(!is_link(&cycle, false));
        assert!(!is_link(&cycle, true));

        let forest: CompactGraph = make_graph(&[1, 2, 3], &[(1, 2)]);
        assert!(!is_link(&forest, false));
    }

    #[test]
    fn test_self_loop_fails() {
        let g: CompactGraph = make_graph(&[1, 2], &[(1, 2), (2, 2)]);
        assert!(!is_link(&g, false));
        assert!(!is_link(&g, true));
    }

    #[test]
    fn test_back_and_forth_edges_need_bidirectional() {
        let g: IndexedGraph = make_graph(&[1, 2, 3], &[(1, 2), (2, 1), (2, 3), (3, 2)]);
        assert!(!is_link(&g, false));
        assert_eq!(end_ids(&g, true), Some((1, 3)));
    }

    #[test]
    fn test_parallel_same_direction_fails() {
        let g: CompactGraph = make_graph(&[1, 2], &[(1, 2), (1, 2)]);
        assert!(!is_link(&g, false));
        assert!(!is_link(&g, true));
    }
}
