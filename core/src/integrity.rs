//! Referential-integrity verification.
//!
//! [`check_integrity`] re-derives every adjacency relation from a naive scan
//! of the edge table and compares it with what the backend reports through
//! its indices. It works on any backend and then delegates to the backend's
//! own [`GraphStore::check_indices`] for structures only it knows about.

use rustc_hash::FxHashMap;
use tracing::error;

use crate::error::{GraphError, GraphResult};
use crate::graph::{EdgeId, GraphStore, VertexId};

/// Verify the data-model invariants of `graph`.
///
/// Checks that every edge's endpoints exist, that each vertex's out/in edge
/// sets contain exactly the edges that reference it, that label-scoped views
/// agree with the primary tables and that counts match enumeration.
pub fn check_integrity<G: GraphStore>(graph: &G) -> GraphResult<()> {
    let mut expected_out: FxHashMap<VertexId, Vec<EdgeId>> = FxHashMap::default();
    let mut expected_in: FxHashMap<VertexId, Vec<EdgeId>> = FxHashMap::default();

    let mut edge_count = 0;
    for edge_id in graph.edge_ids() {
        edge_count += 1;
        let view = graph
            .edge_view(edge_id)
            .ok_or_else(|| integrity_error(format!("edge {edge_id} enumerated but not resolvable")))?;
        if !graph.contains_vertex(view.src) {
            return Err(integrity_error(format!(
                "edge {edge_id} has missing source {}",
                view.src
            )));
        }
        if !graph.contains_vertex(view.dst) {
            return Err(integrity_error(format!(
                "edge {edge_id} has missing destination {}",
                view.dst
            )));
        }
        if !graph.edge_ids_with_label(view.label).any(|e| e == edge_id) {
            return Err(integrity_error(format!(
                "edge {edge_id} missing from label index {}",
                view.label
            )));
        }
        expected_out.entry(view.src).or_default().push(edge_id);
        expected_in.entry(view.dst).or_default().push(edge_id);
    }
    if edge_count != graph.count_edge() {
        return Err(integrity_error(format!(
            "count_edge reports {} but {edge_count} edges enumerate",
            graph.count_edge()
        )));
    }

    let mut vertex_count = 0;
    for vertex in graph.vertex_ids() {
        vertex_count += 1;
        let label = graph
            .vertex_label(vertex)
            .ok_or_else(|| integrity_error(format!("vertex {vertex} enumerated but not resolvable")))?;
        if !graph.vertex_ids_with_label(label).any(|v| v == vertex) {
            return Err(integrity_error(format!(
                "vertex {vertex} missing from label index {label}"
            )));
        }

        let mut out: Vec<EdgeId> = graph.out_edge_ids(vertex).collect();
        let mut inc: Vec<EdgeId> = graph.in_edge_ids(vertex).collect();
        out.sort_unstable();
        inc.sort_unstable();
        let mut want_out = expected_out.remove(&vertex).unwrap_or_default();
        let mut want_in = expected_in.remove(&vertex).unwrap_or_default();
        want_out.sort_unstable();
        want_in.sort_unstable();

        if out != want_out {
            return Err(integrity_error(format!(
                "vertex {vertex} out-edges {out:?} but edge table implies {want_out:?}"
            )));
        }
        if inc != want_in {
            return Err(integrity_error(format!(
                "vertex {vertex} in-edges {inc:?} but edge table implies {want_in:?}"
            )));
        }
        if graph.count_out_edge(vertex) != out.len() || graph.count_in_edge(vertex) != inc.len() {
            return Err(integrity_error(format!(
                "vertex {vertex} degree counts disagree with enumeration"
            )));
        }
    }
    if vertex_count != graph.count_vertex() {
        return Err(integrity_error(format!(
            "count_vertex reports {} but {vertex_count} vertices enumerate",
            graph.count_vertex()
        )));
    }

    graph.check_indices()
}

fn integrity_error(message: String) -> GraphError {
    GraphError::Integrity(message)
}

/// Mutation-time hook for backends configured with `verify_integrity`.
pub(crate) fn verify_after_mutation<G: GraphStore>(graph: &G, operation: &'static str) {
    if let Err(err) = check_integrity(graph) {
        error!(operation, error = %err, "graph integrity violated");
        if cfg!(debug_assertions) {
            panic!("graph integrity violated after {operation}: {err}");
        }
    }
}
