use std::collections::HashMap;

use graph_engine_core::{
    is_strongly_connected, strongly_connected_components, topological_order, CompactGraph,
    GraphStore, GraphStoreMut, IndexedGraph,
};
use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use proptest::prelude::*;

fn edges_strategy() -> impl Strategy<Value = (u64, Vec<(u64, u64)>)> {
    (1..20u64).prop_flat_map(|n| (Just(n), proptest::collection::vec((0..n, 0..n), 0..40)))
}

fn build<G: GraphStoreMut + Default>(n: u64, edges: &[(u64, u64)]) -> G {
    let mut g = G::default();
    for v in 0..n {
        g.insert_vertex(v, 0);
    }
    for (i, &(src, dst)) in edges.iter().enumerate() {
        g.insert_edge(src, dst, 0, i as u64);
    }
    g
}

fn reference(n: u64, edges: &[(u64, u64)]) -> (DiGraph<u64, ()>, HashMap<NodeIndex, u64>) {
    let mut g = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..n).map(|v| g.add_node(v)).collect();
    for &(src, dst) in edges {
        g.add_edge(nodes[src as usize], nodes[dst as usize], ());
    }
    let ids = nodes.iter().enumerate().map(|(i, &idx)| (idx, i as u64)).collect();
    (g, ids)
}

fn sorted_partition(mut parts: Vec<Vec<u64>>) -> Vec<Vec<u64>> {
    for part in &mut parts {
        part.sort_unstable();
    }
    parts.sort();
    parts
}

fn scc_ids<G: GraphStore>(g: &G) -> Vec<Vec<u64>> {
    strongly_connected_components(g)
        .into_iter()
        .map(|c| c.into_iter().map(|v| v.id()).collect())
        .collect()
}

proptest! {
    #[test]
    fn test_scc_matches_petgraph((n, edges) in edges_strategy()) {
        let (reference_graph, ids) = reference(n, &edges);
        let expected = sorted_partition(
            kosaraju_scc(&reference_graph)
                .into_iter()
                .map(|c| c.into_iter().map(|idx| ids[&idx]).collect())
                .collect(),
        );

        let compact: CompactGraph = build(n, &edges);
        let indexed: IndexedGraph = build(n, &edges);
        let ours = scc_ids(&compact);
        for component in &ours {
            prop_assert!(component.windows(2).all(|w| w[0] < w[1]));
        }
        prop_assert_eq!(sorted_partition(ours.clone()), expected.clone());
        prop_assert_eq!(ours, scc_ids(&indexed));
        prop_assert_eq!(is_strongly_connected(&compact), expected.len() == 1);
    }

    #[test]
    fn test_topological_order_matches_petgraph((n, edges) in edges_strategy()) {
        let (reference_graph, _) = reference(n, &edges);
        let acyclic = toposort(&reference_graph, None).is_ok();

        let g: IndexedGraph = build(n, &edges);
        match topological_order(&g) {
            Some(order) => {
                prop_assert!(acyclic);
                prop_assert_eq!(order.len(), n as usize);
                let position: HashMap<u64, usize> =
                    order.iter().enumerate().map(|(i, v)| (v.id(), i)).collect();
                for &(src, dst) in &edges {
                    prop_assert!(position[&src] < position[&dst]);
                }
            }
            None => {
                prop_assert!(!acyclic);
            }
        }
    }
}
