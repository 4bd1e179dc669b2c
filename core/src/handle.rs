//! Vertex and edge handles.
//!
//! A handle is a small `Copy` value: the ID of an entity plus a shared borrow
//! of the graph that owns it. It holds no ownership and is resolved through
//! the backend on every query. Because the borrow is shared, the graph cannot
//! be mutated while any handle to it is alive, so a non-null handle always
//! names a live entity.
//!
//! Handles compare, order and hash by ID only. Two null handles are equal and
//! a null handle orders before every non-null handle, which makes handles
//! usable as sorted-container keys.
//!
//! Mutable access goes through [`VertexMut`] / [`EdgeMut`], which borrow the
//! graph exclusively.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::DeserializeOwned;

use crate::attribute::{self, AttributeValue};
use crate::cursor::{EdgeCursor, VertexCursor};
use crate::error::GraphResult;
use crate::graph::{
    EdgeId, EdgeLabel, GraphStore, GraphStoreMut, InsertEdge, VertexId, VertexLabel,
};

// ---------------------------------------------------------------------------
// VertexHandle
// ---------------------------------------------------------------------------

/// Nullable reference to a vertex of graph `G`.
pub struct VertexHandle<'g, G> {
    inner: Option<(&'g G, VertexId)>,
}

impl<'g, G> VertexHandle<'g, G> {
    pub(crate) fn new(graph: &'g G, id: VertexId) -> Self {
        Self {
            inner: Some((graph, id)),
        }
    }

    /// The null handle.
    pub const fn null() -> Self {
        Self { inner: None }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// The vertex ID, or `None` for a null handle.
    pub fn get(&self) -> Option<VertexId> {
        self.inner.map(|(_, id)| id)
    }

    /// The graph this handle resolves through.
    ///
    /// # Panics
    /// Panics if the handle is null.
    pub fn graph(&self) -> &'g G {
        self.resolve().0
    }

    fn resolve(&self) -> (&'g G, VertexId) {
        match self.inner {
            Some(inner) => inner,
            None => panic!("dereferenced a null vertex handle"),
        }
    }
}

impl<'g, G: GraphStore> VertexHandle<'g, G> {
    /// # Panics
    /// Panics if the handle is null.
    pub fn id(&self) -> VertexId {
        self.resolve().1
    }

    /// # Panics
    /// Panics if the handle is null.
    pub fn label(&self) -> VertexLabel {
        let (graph, id) = self.resolve();
        match graph.vertex_label(id) {
            Some(label) => label,
            None => panic!("vertex {id} is not present in its graph"),
        }
    }

    pub fn count_out_edge(&self) -> usize {
        let (graph, id) = self.resolve();
        graph.count_out_edge(id)
    }

    pub fn count_in_edge(&self) -> usize {
        let (graph, id) = self.resolve();
        graph.count_in_edge(id)
    }

    /// Total incident edges (out + in). A self-loop counts twice.
    pub fn degree(&self) -> usize {
        self.count_out_edge() + self.count_in_edge()
    }

    pub fn count_out_edge_with_label(&self, label: EdgeLabel) -> usize {
        let (graph, id) = self.resolve();
        graph.count_out_edge_with_label(id, label)
    }

    pub fn count_in_edge_with_label(&self, label: EdgeLabel) -> usize {
        let (graph, id) = self.resolve();
        graph.count_in_edge_with_label(id, label)
    }

    pub fn count_out_edge_to(&self, dst: VertexId) -> usize {
        let (graph, id) = self.resolve();
        graph.count_out_edge_to(id, dst)
    }

    pub fn count_in_edge_from(&self, src: VertexId) -> usize {
        let (graph, id) = self.resolve();
        graph.count_in_edge_from(id, src)
    }

    /// Distinct vertices reached over outgoing edges labeled `label`.
    pub fn count_out_vertex_with_label(&self, label: EdgeLabel) -> usize {
        let (graph, id) = self.resolve();
        graph.count_out_vertex_with_label(id, label)
    }

    /// Distinct vertices reaching this one over edges labeled `label`.
    pub fn count_in_vertex_with_label(&self, label: EdgeLabel) -> usize {
        let (graph, id) = self.resolve();
        graph.count_in_vertex_with_label(id, label)
    }

    pub fn out_edges(&self) -> EdgeCursor<'g, G, impl Iterator<Item = EdgeId> + 'g> {
        let (graph, id) = self.resolve();
        EdgeCursor::new(graph, graph.out_edge_ids(id))
    }

    pub fn in_edges(&self) -> EdgeCursor<'g, G, impl Iterator<Item = EdgeId> + 'g> {
        let (graph, id) = self.resolve();
        EdgeCursor::new(graph, graph.in_edge_ids(id))
    }

    pub fn out_edges_with_label(
        &self,
        label: EdgeLabel,
    ) -> EdgeCursor<'g, G, impl Iterator<Item = EdgeId> + 'g> {
        let (graph, id) = self.resolve();
        EdgeCursor::new(graph, graph.out_edge_ids_with_label(id, label))
    }

    pub fn in_edges_with_label(
        &self,
        label: EdgeLabel,
    ) -> EdgeCursor<'g, G, impl Iterator<Item = EdgeId> + 'g> {
        let (graph, id) = self.resolve();
        EdgeCursor::new(graph, graph.in_edge_ids_with_label(id, label))
    }

    pub fn out_edges_to(&self, dst: VertexId) -> EdgeCursor<'g, G, impl Iterator<Item = EdgeId> + 'g> {
        let (graph, id) = self.resolve();
        EdgeCursor::new(graph, graph.out_edge_ids_to(id, dst))
    }

    pub fn in_edges_from(&self, src: VertexId) -> EdgeCursor<'g, G, impl Iterator<Item = EdgeId> + 'g> {
        let (graph, id) = self.resolve();
        EdgeCursor::new(graph, graph.in_edge_ids_from(id, src))
    }

    pub fn out_edges_to_with_label(
        &self,
        dst: VertexId,
        label: EdgeLabel,
    ) -> EdgeCursor<'g, G, impl Iterator<Item = EdgeId> + 'g> {
        let (graph, id) = self.resolve();
        EdgeCursor::new(graph, graph.out_edge_ids_to_with_label(id, dst, label))
    }

    pub fn in_edges_from_with_label(
        &self,
        src: VertexId,
        label: EdgeLabel,
    ) -> EdgeCursor<'g, G, impl Iterator<Item = EdgeId> + 'g> {
        let (graph, id) = self.resolve();
        EdgeCursor::new(graph, graph.in_edge_ids_from_with_label(id, src, label))
    }

    pub fn out_vertices_with_label(
        &self,
        label: EdgeLabel,
    ) -> VertexCursor<'g, G, impl Iterator<Item = VertexId> + 'g> {
        let (graph, id) = self.resolve();
        VertexCursor::new(graph, graph.out_neighbor_ids_with_label(id, label))
    }

    pub fn in_vertices_with_label(
        &self,
        label: EdgeLabel,
    ) -> VertexCursor<'g, G, impl Iterator<Item = VertexId> + 'g> {
        let (graph, id) = self.resolve();
        VertexCursor::new(graph, graph.in_neighbor_ids_with_label(id, label))
    }

    pub fn attribute(&self, key: &str) -> Option<&'g AttributeValue> {
        let (graph, id) = self.resolve();
        graph.vertex_attribute(id, key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    /// Read an attribute as `T`.
    pub fn attribute_as<T: DeserializeOwned>(&self, key: &str) -> GraphResult<T> {
        attribute::decode(key, self.attribute(key))
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&'g str, &'g AttributeValue)> + 'g {
        let (graph, id) = self.resolve();
        graph.vertex_attributes(id)
    }
}

impl<G> Clone for VertexHandle<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for VertexHandle<'_, G> {}

impl<G> Default for VertexHandle<'_, G> {
    fn default() -> Self {
        Self::null()
    }
}

impl<G> PartialEq for VertexHandle<'_, G> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<G> Eq for VertexHandle<'_, G> {}

impl<G> PartialOrd for VertexHandle<'_, G> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<G> Ord for VertexHandle<'_, G> {
    fn cmp(&self, other: &Self) -> Ordering {
        // `None < Some(_)` gives the null-first order.
        self.get().cmp(&other.get())
    }
}

impl<G> Hash for VertexHandle<'_, G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.get().hash(state);
    }
}

impl<G> fmt::Debug for VertexHandle<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(id) => write!(f, "VertexHandle({id})"),
            None => f.write_str("VertexHandle(null)"),
        }
    }
}

// ---------------------------------------------------------------------------
// EdgeHandle
// ---------------------------------------------------------------------------

/// Nullable reference to an edge of graph `G`.
pub struct EdgeHandle<'g, G> {
    inner: Option<(&'g G, EdgeId)>,
}

impl<'g, G> EdgeHandle<'g, G> {
    pub(crate) fn new(graph: &'g G, id: EdgeId) -> Self {
        Self {
            inner: Some((graph, id)),
        }
    }

    pub const fn null() -> Self {
        Self { inner: None }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    pub fn get(&self) -> Option<EdgeId> {
        self.inner.map(|(_, id)| id)
    }

    fn resolve(&self) -> (&'g G, EdgeId) {
        match self.inner {
            Some(inner) => inner,
            None => panic!("dereferenced a null edge handle"),
        }
    }
}

impl<'g, G: GraphStore> EdgeHandle<'g, G> {
    /// # Panics
    /// Panics if the handle is null.
    pub fn id(&self) -> EdgeId {
        self.resolve().1
    }

    fn view(&self) -> crate::graph::EdgeView {
        let (graph, id) = self.resolve();
        match graph.edge_view(id) {
            Some(view) => view,
            None => panic!("edge {id} is not present in its graph"),
        }
    }

    pub fn label(&self) -> EdgeLabel {
        self.view().label
    }

    pub fn src_id(&self) -> VertexId {
        self.view().src
    }

    pub fn dst_id(&self) -> VertexId {
        self.view().dst
    }

    pub fn src_handle(&self) -> VertexHandle<'g, G> {
        VertexHandle::new(self.resolve().0, self.src_id())
    }

    pub fn dst_handle(&self) -> VertexHandle<'g, G> {
        VertexHandle::new(self.resolve().0, self.dst_id())
    }

    /// The endpoint that is not `vertex`. For a self-loop this is `vertex`
    /// itself.
    pub fn opposite(&self, vertex: VertexId) -> VertexHandle<'g, G> {
        let view = self.view();
        let other = if view.src == vertex { view.dst } else { view.src };
        VertexHandle::new(self.resolve().0, other)
    }

    pub fn attribute(&self, key: &str) -> Option<&'g AttributeValue> {
        let (graph, id) = self.resolve();
        graph.edge_attribute(id, key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    pub fn attribute_as<T: DeserializeOwned>(&self, key: &str) -> GraphResult<T> {
        attribute::decode(key, self.attribute(key))
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&'g str, &'g AttributeValue)> + 'g {
        let (graph, id) = self.resolve();
        graph.edge_attributes(id)
    }
}

impl<G> Clone for EdgeHandle<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for EdgeHandle<'_, G> {}

impl<G> Default for EdgeHandle<'_, G> {
    fn default() -> Self {
        Self::null()
    }
}

impl<G> PartialEq for EdgeHandle<'_, G> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<G> Eq for EdgeHandle<'_, G> {}

impl<G> PartialOrd for EdgeHandle<'_, G> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<G> Ord for EdgeHandle<'_, G> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(&other.get())
    }
}

impl<G> Hash for EdgeHandle<'_, G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.get().hash(state);
    }
}

impl<G> fmt::Debug for EdgeHandle<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(id) => write!(f, "EdgeHandle({id})"),
            None => f.write_str("EdgeHandle(null)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Mutable variants
// ---------------------------------------------------------------------------

/// Exclusive reference to a live vertex.
pub struct VertexMut<'g, G> {
    graph: &'g mut G,
    id: VertexId,
}

impl<'g, G: GraphStoreMut> VertexMut<'g, G> {
    pub(crate) fn new(graph: &'g mut G, id: VertexId) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn label(&self) -> VertexLabel {
        self.as_handle().label()
    }

    /// Read-only view for the duration of the borrow.
    pub fn as_handle(&self) -> VertexHandle<'_, G> {
        VertexHandle::new(&*self.graph, self.id)
    }

    /// Add an attribute; an existing key is left unchanged and `false` returned.
    pub fn add_attribute(&mut self, key: &str, value: AttributeValue) -> bool {
        self.graph.insert_vertex_attribute(self.id, key, value)
    }

    pub fn set_attribute(&mut self, key: &str, value: AttributeValue) -> bool {
        self.graph.set_vertex_attribute(self.id, key, value)
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.graph.remove_vertex_attribute(self.id, key)
    }

    /// Add an edge from this vertex to `dst`.
    pub fn add_out_edge(&mut self, dst: VertexId, label: EdgeLabel, id: EdgeId) -> InsertEdge {
        self.graph.insert_edge(self.id, dst, label, id)
    }

    /// Add an edge from `src` to this vertex.
    pub fn add_in_edge(&mut self, src: VertexId, label: EdgeLabel, id: EdgeId) -> InsertEdge {
        self.graph.insert_edge(src, self.id, label, id)
    }
}

impl<G> fmt::Debug for VertexMut<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexMut({})", self.id)
    }
}

/// Exclusive reference to a live edge.
pub struct EdgeMut<'g, G> {
    graph: &'g mut G,
    id: EdgeId,
}

impl<'g, G: GraphStoreMut> EdgeMut<'g, G> {
    pub(crate) fn new(graph: &'g mut G, id: EdgeId) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn label(&self) -> EdgeLabel {
        self.as_handle().label()
    }

    pub fn as_handle(&self) -> EdgeHandle<'_, G> {
        EdgeHandle::new(&*self.graph, self.id)
    }

    pub fn src_handle(&self) -> VertexHandle<'_, G> {
        self.as_handle().src_handle()
    }

    pub fn dst_handle(&self) -> VertexHandle<'_, G> {
        self.as_handle().dst_handle()
    }

    pub fn src_handle_mut(&mut self) -> VertexMut<'_, G> {
        let src = self.as_handle().src_id();
        VertexMut::new(&mut *self.graph, src)
    }

    pub fn dst_handle_mut(&mut self) -> VertexMut<'_, G> {
        let dst = self.as_handle().dst_id();
        VertexMut::new(&mut *self.graph, dst)
    }

    pub fn add_attribute(&mut self, key: &str, value: AttributeValue) -> bool {
        self.graph.insert_edge_attribute(self.id, key, value)
    }

    pub fn set_attribute(&mut self, key: &str, value: AttributeValue) -> bool {
        self.graph.set_edge_attribute(self.id, key, value)
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.graph.remove_edge_attribute(self.id, key)
    }
}

impl<G> fmt::Debug for EdgeMut<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeMut({})", self.id)
    }
}
