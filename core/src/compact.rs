//! Compact storage backend.
//!
//! Vertices and edges live in two ID-keyed ordered dictionaries. A vertex
//! stores only the IDs of its incident edges (one ordered set per direction),
//! never edge values, which keeps the footprint small for graphs whose
//! structure changes rarely. Label- and neighbor-scoped queries are linear
//! scans over a vertex's edge set.
//!
//! The container strategy is a type parameter: `CompactGraph` (the default)
//! uses sorted vectors, `CompactGraph<BTreeFamily>` uses B-trees.
//!
//! No attribute support.

use std::fmt;

use tracing::debug;

use crate::config::GraphConfig;
use crate::container::{ContainerFamily, OrderedMap, OrderedSet, SortedVecFamily};
use crate::graph::{
    EdgeId, EdgeLabel, EdgeView, GraphStore, GraphStoreMut, InsertEdge, VertexId, VertexLabel,
};
use crate::integrity;

struct CompactVertex<F: ContainerFamily> {
    label: VertexLabel,
    out_edges: F::Set<EdgeId>,
    in_edges: F::Set<EdgeId>,
}

impl<F: ContainerFamily> CompactVertex<F> {
    fn new(label: VertexLabel) -> Self {
        Self {
            label,
            out_edges: Default::default(),
            in_edges: Default::default(),
        }
    }
}

impl<F: ContainerFamily> Clone for CompactVertex<F> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            out_edges: self.out_edges.clone(),
            in_edges: self.in_edges.clone(),
        }
    }
}

impl<F: ContainerFamily> fmt::Debug for CompactVertex<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactVertex")
            .field("label", &self.label)
            .field("out_edges", &self.out_edges)
            .field("in_edges", &self.in_edges)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
struct CompactEdge {
    label: EdgeLabel,
    src: VertexId,
    dst: VertexId,
}

/// Graph stored as two sorted ID-keyed tables.
pub struct CompactGraph<F: ContainerFamily = SortedVecFamily> {
    vertices: F::Map<VertexId, CompactVertex<F>>,
    edges: F::Map<EdgeId, CompactEdge>,
    verify_integrity: bool,
}

impl<F: ContainerFamily> CompactGraph<F> {
    pub fn new() -> Self {
        Self {
            vertices: Default::default(),
            edges: Default::default(),
            verify_integrity: false,
        }
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(vertex_capacity: usize, edge_capacity: usize) -> Self {
        let mut graph = Self::new();
        graph.vertices.reserve(vertex_capacity);
        graph.edges.reserve(edge_capacity);
        graph
    }

    pub fn with_config(config: &GraphConfig) -> Self {
        let mut graph = Self::with_capacity(config.vertex_capacity, config.edge_capacity);
        graph.verify_integrity = config.verify_integrity;
        graph
    }

    fn after_mutation(&self, operation: &'static str) {
        if self.verify_integrity {
            integrity::verify_after_mutation(self, operation);
        }
    }

    fn view(id: EdgeId, edge: &CompactEdge) -> EdgeView {
        EdgeView {
            id,
            label: edge.label,
            src: edge.src,
            dst: edge.dst,
        }
    }
}

impl<F: ContainerFamily> Default for CompactGraph<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ContainerFamily> Clone for CompactGraph<F> {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            verify_integrity: self.verify_integrity,
        }
    }
}

impl<F: ContainerFamily> fmt::Debug for CompactGraph<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactGraph")
            .field("containers", &F::NAME)
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

impl<F: ContainerFamily> GraphStore for CompactGraph<F> {
    fn count_vertex(&self) -> usize {
        self.vertices.len()
    }

    fn count_edge(&self) -> usize {
        self.edges.len()
    }

    fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    fn vertex_label(&self, id: VertexId) -> Option<VertexLabel> {
        self.vertices.get(&id).map(|v| v.label)
    }

    fn edge_view(&self, id: EdgeId) -> Option<EdgeView> {
        self.edges.get(&id).map(|e| Self::view(id, e))
    }

    fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys()
    }

    fn vertex_ids_with_label(&self, label: VertexLabel) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .filter(move |(_, v)| v.label == label)
            .map(|(id, _)| id)
    }

    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys()
    }

    fn edge_ids_with_label(&self, label: EdgeLabel) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .filter(move |(_, e)| e.label == label)
            .map(|(id, _)| id)
    }

    fn out_edge_ids(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices
            .get(&vertex)
            .into_iter()
            .flat_map(|v| v.out_edges.iter())
    }

    fn in_edge_ids(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices
            .get(&vertex)
            .into_iter()
            .flat_map(|v| v.in_edges.iter())
    }

    fn out_adjacency(&self, vertex: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_ {
        self.out_edge_ids(vertex)
            .filter_map(move |e| self.edges.get(&e).map(|edge| (e, edge.dst)))
    }

    fn in_adjacency(&self, vertex: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_ {
        self.in_edge_ids(vertex)
            .filter_map(move |e| self.edges.get(&e).map(|edge| (e, edge.src)))
    }

    fn count_out_edge(&self, vertex: VertexId) -> usize {
        self.vertices.get(&vertex).map_or(0, |v| v.out_edges.len())
    }

    fn count_in_edge(&self, vertex: VertexId) -> usize {
        self.vertices.get(&vertex).map_or(0, |v| v.in_edges.len())
    }
}

impl<F: ContainerFamily> GraphStoreMut for CompactGraph<F> {
    fn insert_vertex(&mut self, id: VertexId, label: VertexLabel) -> bool {
        let inserted = self.vertices.insert(id, CompactVertex::new(label));
        if inserted {
            self.after_mutation("insert_vertex");
        }
        inserted
    }

    fn insert_edge(
        &mut self,
        src: VertexId,
        dst: VertexId,
        label: EdgeLabel,
        id: EdgeId,
    ) -> InsertEdge {
        if !self.vertices.contains_key(&src) || !self.vertices.contains_key(&dst) {
            return InsertEdge::MissingEndpoint;
        }
        if !self.edges.insert(id, CompactEdge { label, src, dst }) {
            return InsertEdge::Exists;
        }
        if let Some(v) = self.vertices.get_mut(&src) {
            v.out_edges.insert(id);
        }
        if let Some(v) = self.vertices.get_mut(&dst) {
            v.in_edges.insert(id);
        }
        self.after_mutation("insert_edge");
        InsertEdge::Inserted
    }

    fn erase_vertex(&mut self, id: VertexId) -> usize {
        let Some(vertex) = self.vertices.get(&id) else {
            return 0;
        };

        // A self-loop appears in both sets; collect the union once.
        let mut incident: Vec<EdgeId> = vertex
            .out_edges
            .iter()
            .chain(vertex.in_edges.iter())
            .collect();
        incident.sort_unstable();
        incident.dedup();

        for &edge_id in &incident {
            let Some(edge) = self.edges.remove(&edge_id) else {
                continue;
            };
            if edge.src != id {
                if let Some(src) = self.vertices.get_mut(&edge.src) {
                    src.out_edges.remove(&edge_id);
                }
            }
            if edge.dst != id {
                if let Some(dst) = self.vertices.get_mut(&edge.dst) {
                    dst.in_edges.remove(&edge_id);
                }
            }
        }
        self.vertices.remove(&id);

        debug!(vertex = id, edges_removed = incident.len(), "erased vertex");
        self.after_mutation("erase_vertex");
        incident.len() + 1
    }

    fn erase_edge(&mut self, id: EdgeId) -> usize {
        let Some(edge) = self.edges.remove(&id) else {
            return 0;
        };
        if let Some(src) = self.vertices.get_mut(&edge.src) {
            src.out_edges.remove(&id);
        }
        if let Some(dst) = self.vertices.get_mut(&edge.dst) {
            dst.in_edges.remove(&id);
        }
        self.after_mutation("erase_edge");
        1
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }
}
