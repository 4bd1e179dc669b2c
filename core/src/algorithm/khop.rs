use rustc_hash::FxHashSet;
use tracing::debug;

use super::copy::{copy_edge, copy_vertex};
use crate::graph::{GraphStore, GraphStoreMut, VertexId};
use crate::handle::VertexHandle;
use crate::traversal::{bfs_within, OnVertex};

fn reached_ids<G: GraphStore>(
    graph: &G,
    sources: impl IntoIterator<Item = VertexId>,
    k: usize,
) -> Vec<VertexId> {
    let mut reached = Vec::new();
    bfs_within(
        graph,
        sources,
        k,
        OnVertex(|v: VertexHandle<'_, G>| {
            reached.push(v.id());
            true
        }),
        true,
    );
    reached.sort_unstable();
    reached
}

/// Vertices within `k` hops of any source, ignoring edge direction, in
/// ascending ID order.
pub fn k_hop_vertices<G: GraphStore>(
    graph: &G,
    sources: impl IntoIterator<Item = VertexId>,
    k: usize,
) -> Vec<VertexHandle<'_, G>> {
    reached_ids(graph, sources, k)
        .into_iter()
        .map(|id| graph.find_vertex(id))
        .collect()
}

/// Induced subgraph on the vertices within `k` hops of `sources`.
///
/// The result holds every such vertex with its label and attributes, and
/// every edge of `graph` whose endpoints are both included, with IDs kept.
pub fn k_hop<G, Out>(graph: &G, sources: impl IntoIterator<Item = VertexId>, k: usize) -> Out
where
    G: GraphStore,
    Out: GraphStoreMut + Default,
{
    let included = reached_ids(graph, sources, k);
    let members: FxHashSet<VertexId> = included.iter().copied().collect();

    let mut out = Out::default();
    for &vertex in &included {
        copy_vertex(graph, &mut out, vertex);
    }
    for &vertex in &included {
        for (edge, dst) in graph.out_adjacency(vertex) {
            if !members.contains(&dst) {
                continue;
            }
            if let Some(view) = graph.edge_view(edge) {
                copy_edge(graph, &mut out, view);
            }
        }
    }

    debug!(
        k,
        vertices = out.count_vertex(),
        edges = out.count_edge(),
        "extracted k-hop subgraph"
    );
    out
}
