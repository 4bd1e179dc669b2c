use tracing::debug;

use super::copy::{edge_attribute_pairs, vertex_attribute_pairs};
use crate::error::{GraphError, GraphResult};
use crate::graph::{EdgeId, EdgeView, GraphStore, GraphStoreMut, VertexId};

/// Largest live vertex ID.
pub fn max_vertex_id<G: GraphStore>(graph: &G) -> Option<VertexId> {
    graph.vertex_ids().max()
}

/// Largest live edge ID.
pub fn max_edge_id<G: GraphStore>(graph: &G) -> Option<EdgeId> {
    graph.edge_ids().max()
}

fn exhausted(what: &str) -> GraphError {
    GraphError::Integrity(format!("{what} id space exhausted"))
}

fn next_id(max: Option<u64>, what: &str) -> GraphResult<u64> {
    match max {
        None => Ok(0),
        Some(id) => id.checked_add(1).ok_or_else(|| exhausted(what)),
    }
}

/// Add a copy of vertex `id` under a fresh ID.
///
/// The duplicate gets the original's label and attributes, plus a copy of
/// every incident edge under fresh edge IDs; a self-loop on the original
/// becomes a self-loop on the duplicate. Returns the new vertex ID.
///
/// Fails with [`GraphError::Integrity`] before touching the graph if the
/// fresh vertex or edge IDs would overflow.
pub fn duplicate_vertex<G: GraphStoreMut>(graph: &mut G, id: VertexId) -> GraphResult<VertexId> {
    let label = graph.vertex_label(id).ok_or(GraphError::VertexNotFound(id))?;
    let copy = next_id(max_vertex_id(graph), "vertex")?;
    let mut next_edge = next_id(max_edge_id(graph), "edge")?;

    let attributes = vertex_attribute_pairs(graph, id);
    let out: Vec<EdgeView> = graph
        .out_edge_ids(id)
        .filter_map(|e| graph.edge_view(e))
        .collect();
    let inc: Vec<EdgeView> = graph
        .in_edge_ids(id)
        .filter_map(|e| graph.edge_view(e))
        .filter(|ev| ev.src != id)
        .collect();

    let edge_count = (out.len() + inc.len()) as u64;
    if edge_count > 0 && next_edge.checked_add(edge_count - 1).is_none() {
        return Err(exhausted("edge"));
    }

    graph.insert_vertex(copy, label);
    for (key, value) in attributes {
        graph.insert_vertex_attribute(copy, &key, value);
    }

    let remapped = out
        .iter()
        .map(|ev| {
            let dst = if ev.dst == id { copy } else { ev.dst };
            (ev, copy, dst)
        })
        .chain(inc.iter().map(|ev| (ev, ev.src, copy)));
    let mut edges = 0;
    for (original, src, dst) in remapped.collect::<Vec<_>>() {
        let attributes = edge_attribute_pairs(graph, original.id);
        graph.insert_edge(src, dst, original.label, next_edge);
        for (key, value) in attributes {
            graph.insert_edge_attribute(next_edge, &key, value);
        }
        edges += 1;
        if edges < edge_count {
            next_edge = next_edge.checked_add(1).ok_or_else(|| exhausted("edge"))?;
        }
    }

    debug!(vertex = id, duplicate = copy, edges, "duplicated vertex");
    Ok(copy)
}

/// Add a parallel copy of edge `id`, same endpoints, label and attributes,
/// under the next free edge ID. Returns the new edge ID.
pub fn duplicate_edge<G: GraphStoreMut>(graph: &mut G, id: EdgeId) -> GraphResult<EdgeId> {
    let view = graph.edge_view(id).ok_or(GraphError::EdgeNotFound(id))?;
    let copy = next_id(max_edge_id(graph), "edge")?;
    let attributes = edge_attribute_pairs(graph, id);

    graph.insert_edge(view.src, view.dst, view.label, copy);
    for (key, value) in attributes {
        graph.insert_edge_attribute(copy, &key, value);
    }
    debug!(edge = id, duplicate = copy, "duplicated edge");
    Ok(copy)
}
