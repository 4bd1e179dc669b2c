use graph_engine_core::{
    check_integrity, is_link, link_end_points, strongly_connected_components, topo_sort,
    BTreeFamily, Bfs, CompactGraph, GraphStore, GraphStoreMut, IndexedGraph,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn make_graph<G: GraphStoreMut + Default>(n: u64, edges: &[(u64, u64)]) -> G {
    let mut g = G::default();
    for v in 1..=n {
        g.add_vertex(v, 0);
    }
    for (i, &(src, dst)) in edges.iter().enumerate() {
        assert!(g.add_edge(src, dst, 0, i as u64 + 1).1);
    }
    g
}

fn topo_ids<G: GraphStore>(g: &G) -> (usize, Vec<u64>) {
    let mut order = Vec::new();
    let count = topo_sort(
        g,
        |v| {
            order.push(v.id());
            true
        },
        false,
    );
    (count, order)
}

fn directed_cycle<G: GraphStoreMut + Default>() {
    let g: G = make_graph(3, &[(1, 2), (2, 3), (3, 1)]);

    let components: Vec<Vec<u64>> = strongly_connected_components(&g)
        .into_iter()
        .map(|c| c.into_iter().map(|v| v.id()).collect())
        .collect();
    assert_eq!(components, vec![vec![1, 2, 3]]);

    let (count, order) = topo_ids(&g);
    assert_eq!(count, 0);
    assert!(order.is_empty());
    assert!(count < g.count_vertex());
}

fn simple_path<G: GraphStoreMut + Default>() {
    let mut g: G = make_graph(3, &[(1, 2), (2, 3)]);

    assert!(is_link(&g, false));
    let (a, b) = link_end_points(&g, false);
    assert_eq!((a.id(), b.id()), (1, 3));

    assert_eq!(topo_ids(&g), (3, vec![1, 2, 3]));

    assert_eq!(g.erase_vertex(2), 3);
    assert_eq!(g.count_edge(), 0);
    assert!(g.find_edge(1).is_null());
    assert!(g.find_edge(2).is_null());
    check_integrity(&g).unwrap();
}

fn bfs_orders_by_distance<G: GraphStoreMut + Default>() {
    // Binary tree on 1..=15, edges parent -> child.
    let edges: Vec<(u64, u64)> = (2..=15).map(|v| (v / 2, v)).collect();
    let g: G = make_graph(15, &edges);

    let reached = Bfs::new(&g).source(1).collect_distances();
    assert_eq!(reached.len(), 15);
    assert!(reached.windows(2).all(|w| w[0].1 <= w[1].1));
    let mut ids: Vec<_> = reached.iter().map(|(v, _)| v.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 15);

    let within = Bfs::new(&g).source(1).max_distance(2).collect_distances();
    assert_eq!(within.len(), 7);
    assert!(within.iter().all(|&(_, d)| d <= 2));

    let mut last_index = 0;
    let count = Bfs::new(&g).source(1).visit_indexed(|_, index| {
        last_index = index;
        index < 4
    });
    assert_eq!(count, 5);
    assert_eq!(last_index, 4);
}

fn duplicate_insert_is_idempotent<G: GraphStoreMut + Default>() {
    let mut g: G = make_graph(2, &[(1, 2)]);
    let (v, inserted) = g.add_vertex(1, 99);
    assert!(!inserted);
    assert_eq!(v.label(), 0);

    let (e, inserted) = g.add_edge(2, 1, 5, 1);
    assert!(!inserted);
    assert_eq!((e.src_id(), e.dst_id()), (1, 2));
    assert!(g.find_vertex(3).is_null());
}

macro_rules! on_every_backend {
    ($($scenario:ident),* $(,)?) => {
        mod compact {
            $(#[test] fn $scenario() { super::init_tracing(); super::$scenario::<super::CompactGraph>(); })*
        }
        mod compact_btree {
            $(#[test] fn $scenario() { super::init_tracing(); super::$scenario::<super::CompactGraph<super::BTreeFamily>>(); })*
        }
        mod indexed {
            $(#[test] fn $scenario() { super::init_tracing(); super::$scenario::<super::IndexedGraph>(); })*
        }
    };
}

on_every_backend!(
    directed_cycle,
    simple_path,
    bfs_orders_by_distance,
    duplicate_insert_is_idempotent,
);
