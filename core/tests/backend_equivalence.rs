use graph_engine_core::{
    check_integrity, connected_components, copy_graph, same_structure, BTreeFamily, Bfs,
    CompactGraph, GraphStore, GraphStoreMut, IndexedGraph,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Operation {
    AddVertex(u64, u32),
    AddEdge(u64, u64, u32, u64),
    EraseVertex(u64),
    EraseEdge(u64),
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (0..16u64, 0..3u32).prop_map(|(v, l)| Operation::AddVertex(v, l)),
        5 => (0..16u64, 0..16u64, 0..3u32, 0..48u64)
            .prop_map(|(s, d, l, e)| Operation::AddEdge(s, d, l, e)),
        1 => (0..16u64).prop_map(Operation::EraseVertex),
        1 => (0..48u64).prop_map(Operation::EraseEdge),
    ]
}

fn apply<G: GraphStoreMut>(g: &mut G, op: &Operation) -> (bool, usize) {
    match *op {
        Operation::AddVertex(v, l) => (g.add_vertex(v, l).1, 0),
        Operation::AddEdge(s, d, l, e) => {
            let (handle, inserted) = g.add_edge(s, d, l, e);
            (inserted, usize::from(handle.is_null()))
        }
        Operation::EraseVertex(v) => (false, g.erase_vertex(v)),
        Operation::EraseEdge(e) => (false, g.erase_edge(e)),
    }
}

fn bfs_trace<G: GraphStore>(g: &G, source: u64, bidirectional: bool) -> Vec<(u64, usize)> {
    Bfs::new(g)
        .source(source)
        .bidirectional(bidirectional)
        .collect_distances()
        .into_iter()
        .map(|(v, d)| (v.id(), d))
        .collect()
}

fn scoped_counts<G: GraphStore>(g: &G) -> Vec<(u64, usize, usize, usize, usize, usize)> {
    g.vertices()
        .map(|v| {
            (
                v.id(),
                v.count_out_edge(),
                v.count_in_edge(),
                v.count_out_edge_with_label(1),
                v.count_in_edge_with_label(2),
                v.count_out_vertex_with_label(0),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn test_backends_stay_equivalent(ops in proptest::collection::vec(operation(), 1..80)) {
        let mut compact = CompactGraph::<graph_engine_core::SortedVecFamily>::new();
        let mut btree = CompactGraph::<BTreeFamily>::new();
        let mut indexed = IndexedGraph::new();

        for op in &ops {
            let a = apply(&mut compact, op);
            let b = apply(&mut btree, op);
            let c = apply(&mut indexed, op);
            prop_assert_eq!(a, b, "compact/btree diverged on {:?}", op);
            prop_assert_eq!(a, c, "compact/indexed diverged on {:?}", op);

            prop_assert!(check_integrity(&compact).is_ok());
            prop_assert!(check_integrity(&btree).is_ok());
            prop_assert!(check_integrity(&indexed).is_ok());
            prop_assert!(same_structure(&compact, &indexed));
            prop_assert!(same_structure(&btree, &indexed));
        }

        prop_assert_eq!(scoped_counts(&compact), scoped_counts(&indexed));
        for source in compact.vertex_ids().collect::<Vec<_>>() {
            for bidirectional in [false, true] {
                prop_assert_eq!(
                    bfs_trace(&compact, source, bidirectional),
                    bfs_trace(&indexed, source, bidirectional)
                );
            }
        }
    }

    #[test]
    fn test_copy_roundtrip_between_backends(ops in proptest::collection::vec(operation(), 1..60)) {
        let mut indexed = IndexedGraph::new();
        for op in &ops {
            apply(&mut indexed, op);
        }
        let compact: CompactGraph = copy_graph(&indexed);
        let back: IndexedGraph = copy_graph(&compact);
        prop_assert!(same_structure(&indexed, &compact));
        prop_assert!(same_structure(&indexed, &back));
        prop_assert!(check_integrity(&back).is_ok());
    }

    #[test]
    fn test_weak_components_partition_vertices(ops in proptest::collection::vec(operation(), 1..60)) {
        let mut g = IndexedGraph::new();
        for op in &ops {
            apply(&mut g, op);
        }
        let mut all: Vec<u64> = connected_components(&g)
            .into_iter()
            .flatten()
            .map(|v| v.id())
            .collect();
        all.sort_unstable();
        let expected: Vec<u64> = g.vertex_ids().collect();
        prop_assert_eq!(all, expected);
    }
}
