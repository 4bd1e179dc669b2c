use std::collections::BTreeSet;

use crate::attribute::AttributeValue;
use crate::graph::{EdgeId, EdgeLabel, EdgeView, GraphStore, GraphStoreMut, VertexId, VertexLabel};

pub(crate) fn vertex_attribute_pairs<G: GraphStore>(
    graph: &G,
    vertex: VertexId,
) -> Vec<(String, AttributeValue)> {
    graph
        .vertex_attributes(vertex)
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub(crate) fn edge_attribute_pairs<G: GraphStore>(graph: &G, edge: EdgeId) -> Vec<(String, AttributeValue)> {
    graph
        .edge_attributes(edge)
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Copy vertex `id` (label and attributes) from `graph` into `out`.
pub(crate) fn copy_vertex<G: GraphStore, Out: GraphStoreMut>(graph: &G, out: &mut Out, id: VertexId) {
    let Some(label) = graph.vertex_label(id) else {
        return;
    };
    out.insert_vertex(id, label);
    for (key, value) in graph.vertex_attributes(id) {
        out.insert_vertex_attribute(id, key, value.clone());
    }
}

/// Copy an edge (label, endpoints, ID and attributes) into `out`.
pub(crate) fn copy_edge<G: GraphStore, Out: GraphStoreMut>(graph: &G, out: &mut Out, edge: EdgeView) {
    out.insert_edge(edge.src, edge.dst, edge.label, edge.id);
    for (key, value) in graph.edge_attributes(edge.id) {
        out.insert_edge_attribute(edge.id, key, value.clone());
    }
}

/// Full structural and attribute copy of `graph` into a new `Out` backend.
///
/// Attributes are dropped when `Out` has no attribute support.
pub fn copy_graph<G, Out>(graph: &G) -> Out
where
    G: GraphStore,
    Out: GraphStoreMut + Default,
{
    let mut out = Out::default();
    for vertex in graph.vertex_ids() {
        copy_vertex(graph, &mut out, vertex);
    }
    for edge in graph.edge_ids().filter_map(|e| graph.edge_view(e)) {
        copy_edge(graph, &mut out, edge);
    }
    out
}

fn vertex_set<G: GraphStore>(graph: &G) -> BTreeSet<(VertexId, VertexLabel)> {
    graph
        .vertex_ids()
        .filter_map(|v| graph.vertex_label(v).map(|l| (v, l)))
        .collect()
}

fn edge_set<G: GraphStore>(graph: &G) -> BTreeSet<(VertexId, EdgeLabel, VertexId, EdgeId)> {
    graph
        .edge_ids()
        .filter_map(|e| graph.edge_view(e))
        .map(|ev| (ev.src, ev.label, ev.dst, ev.id))
        .collect()
}

/// Whether two graphs, possibly on different backends, hold the same
/// vertices `(id, label)` and edges `(src, label, dst, id)`.
pub fn same_structure<A: GraphStore, B: GraphStore>(a: &A, b: &B) -> bool {
    a.count_vertex() == b.count_vertex()
        && a.count_edge() == b.count_edge()
        && vertex_set(a) == vertex_set(b)
        && edge_set(a) == edge_set(b)
}
