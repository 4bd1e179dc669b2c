//! The storage-backend contract.
//!
//! Algorithms are written once against [`GraphStore`] / [`GraphStoreMut`] and
//! monomorphized per backend. Backends only have to answer ID-level queries;
//! handles and cursors are layered on top by the provided methods.
//!
//! Every ID iterator yields IDs in ascending order. Backends that keep finer
//! indices (label- or neighbor-scoped) override the scanning defaults.

use crate::attribute::AttributeValue;
use crate::cursor::{EdgeCursor, VertexCursor};
use crate::error::GraphResult;
use crate::handle::{EdgeHandle, EdgeMut, VertexHandle, VertexMut};

/// Externally assigned vertex identity, unique among live vertices.
pub type VertexId = u64;

/// Externally assigned edge identity, unique among live edges.
pub type EdgeId = u64;

/// Vertex label. Not required to be unique.
pub type VertexLabel = u32;

/// Edge label. Not required to be unique.
pub type EdgeLabel = u32;

/// Structural snapshot of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeView {
    pub id: EdgeId,
    pub label: EdgeLabel,
    pub src: VertexId,
    pub dst: VertexId,
}

/// Direction an edge is traversed relative to the vertex being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// Outcome of [`GraphStoreMut::insert_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEdge {
    /// The edge was created.
    Inserted,
    /// An edge with this ID already exists; nothing changed.
    Exists,
    /// The source or destination vertex does not exist; nothing changed.
    MissingEndpoint,
}

/// Read side of a storage backend.
pub trait GraphStore {
    /// Whether vertices and edges carry attribute maps.
    const SUPPORTS_ATTRIBUTES: bool = false;

    fn count_vertex(&self) -> usize;

    fn count_edge(&self) -> usize;

    fn count_vertex_with_label(&self, label: VertexLabel) -> usize {
        self.vertex_ids_with_label(label).count()
    }

    fn count_edge_with_label(&self, label: EdgeLabel) -> usize {
        self.edge_ids_with_label(label).count()
    }

    fn contains_vertex(&self, id: VertexId) -> bool;

    fn contains_edge(&self, id: EdgeId) -> bool;

    fn vertex_label(&self, id: VertexId) -> Option<VertexLabel>;

    fn edge_view(&self, id: EdgeId) -> Option<EdgeView>;

    fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_;

    fn vertex_ids_with_label(&self, label: VertexLabel) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_ids()
            .filter(move |&v| self.vertex_label(v) == Some(label))
    }

    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_;

    fn edge_ids_with_label(&self, label: EdgeLabel) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_ids()
            .filter(move |&e| self.edge_view(e).is_some_and(|ev| ev.label == label))
    }

    /// Outgoing edge IDs of `vertex`; empty if the vertex does not exist.
    fn out_edge_ids(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_;

    /// Incoming edge IDs of `vertex`; empty if the vertex does not exist.
    fn in_edge_ids(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_;

    fn out_edge_ids_with_label(
        &self,
        vertex: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edge_ids(vertex)
            .filter(move |&e| self.edge_view(e).is_some_and(|ev| ev.label == label))
    }

    fn in_edge_ids_with_label(
        &self,
        vertex: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.in_edge_ids(vertex)
            .filter(move |&e| self.edge_view(e).is_some_and(|ev| ev.label == label))
    }

    /// Edges from `vertex` to `dst`.
    fn out_edge_ids_to(&self, vertex: VertexId, dst: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edge_ids(vertex)
            .filter(move |&e| self.edge_view(e).is_some_and(|ev| ev.dst == dst))
    }

    /// Edges from `src` into `vertex`.
    fn in_edge_ids_from(&self, vertex: VertexId, src: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.in_edge_ids(vertex)
            .filter(move |&e| self.edge_view(e).is_some_and(|ev| ev.src == src))
    }

    fn out_edge_ids_to_with_label(
        &self,
        vertex: VertexId,
        dst: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edge_ids(vertex).filter(move |&e| {
            self.edge_view(e)
                .is_some_and(|ev| ev.dst == dst && ev.label == label)
        })
    }

    fn in_edge_ids_from_with_label(
        &self,
        vertex: VertexId,
        src: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.in_edge_ids(vertex).filter(move |&e| {
            self.edge_view(e)
                .is_some_and(|ev| ev.src == src && ev.label == label)
        })
    }

    /// `(edge, destination)` pairs for every outgoing edge of `vertex`.
    fn out_adjacency(&self, vertex: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_ {
        self.out_edge_ids(vertex)
            .filter_map(move |e| self.edge_view(e).map(|ev| (e, ev.dst)))
    }

    /// `(edge, source)` pairs for every incoming edge of `vertex`.
    fn in_adjacency(&self, vertex: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_ {
        self.in_edge_ids(vertex)
            .filter_map(move |e| self.edge_view(e).map(|ev| (e, ev.src)))
    }

    /// Distinct destinations reached from `vertex` over edges labeled `label`.
    fn out_neighbor_ids_with_label(
        &self,
        vertex: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = VertexId> + '_ {
        let mut neighbors: Vec<VertexId> = self
            .out_edge_ids_with_label(vertex, label)
            .filter_map(|e| self.edge_view(e).map(|ev| ev.dst))
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors.into_iter()
    }

    /// Distinct sources reaching `vertex` over edges labeled `label`.
    fn in_neighbor_ids_with_label(
        &self,
        vertex: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = VertexId> + '_ {
        let mut neighbors: Vec<VertexId> = self
            .in_edge_ids_with_label(vertex, label)
            .filter_map(|e| self.edge_view(e).map(|ev| ev.src))
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors.into_iter()
    }

    fn count_out_edge(&self, vertex: VertexId) -> usize {
        self.out_edge_ids(vertex).count()
    }

    fn count_in_edge(&self, vertex: VertexId) -> usize {
        self.in_edge_ids(vertex).count()
    }

    fn count_out_edge_with_label(&self, vertex: VertexId, label: EdgeLabel) -> usize {
        self.out_edge_ids_with_label(vertex, label).count()
    }

    fn count_in_edge_with_label(&self, vertex: VertexId, label: EdgeLabel) -> usize {
        self.in_edge_ids_with_label(vertex, label).count()
    }

    fn count_out_edge_to(&self, vertex: VertexId, dst: VertexId) -> usize {
        self.out_edge_ids_to(vertex, dst).count()
    }

    fn count_in_edge_from(&self, vertex: VertexId, src: VertexId) -> usize {
        self.in_edge_ids_from(vertex, src).count()
    }

    fn count_out_vertex_with_label(&self, vertex: VertexId, label: EdgeLabel) -> usize {
        self.out_neighbor_ids_with_label(vertex, label).count()
    }

    fn count_in_vertex_with_label(&self, vertex: VertexId, label: EdgeLabel) -> usize {
        self.in_neighbor_ids_with_label(vertex, label).count()
    }

    fn vertex_attribute(&self, _vertex: VertexId, _key: &str) -> Option<&AttributeValue> {
        None
    }

    fn edge_attribute(&self, _edge: EdgeId, _key: &str) -> Option<&AttributeValue> {
        None
    }

    /// Attributes of `vertex` in insertion order.
    fn vertex_attributes(&self, _vertex: VertexId) -> impl Iterator<Item = (&str, &AttributeValue)> + '_ {
        std::iter::empty()
    }

    /// Attributes of `edge` in insertion order.
    fn edge_attributes(&self, _edge: EdgeId) -> impl Iterator<Item = (&str, &AttributeValue)> + '_ {
        std::iter::empty()
    }

    /// Backend-specific consistency checks on secondary indices.
    ///
    /// Invoked by [`check_integrity`](crate::check_integrity) after the generic
    /// cross-check of adjacency sets against the edge table.
    fn check_indices(&self) -> GraphResult<()> {
        Ok(())
    }

    // --- handle / cursor surface ---

    /// Handle to vertex `id`, or a null handle if it does not exist.
    fn find_vertex(&self, id: VertexId) -> VertexHandle<'_, Self>
    where
        Self: Sized,
    {
        if self.contains_vertex(id) {
            VertexHandle::new(self, id)
        } else {
            VertexHandle::null()
        }
    }

    /// Handle to edge `id`, or a null handle if it does not exist.
    fn find_edge(&self, id: EdgeId) -> EdgeHandle<'_, Self>
    where
        Self: Sized,
    {
        if self.contains_edge(id) {
            EdgeHandle::new(self, id)
        } else {
            EdgeHandle::null()
        }
    }

    fn vertices(&self) -> VertexCursor<'_, Self, impl Iterator<Item = VertexId> + '_>
    where
        Self: Sized,
    {
        VertexCursor::new(self, self.vertex_ids())
    }

    fn vertices_with_label(
        &self,
        label: VertexLabel,
    ) -> VertexCursor<'_, Self, impl Iterator<Item = VertexId> + '_>
    where
        Self: Sized,
    {
        VertexCursor::new(self, self.vertex_ids_with_label(label))
    }

    fn edges(&self) -> EdgeCursor<'_, Self, impl Iterator<Item = EdgeId> + '_>
    where
        Self: Sized,
    {
        EdgeCursor::new(self, self.edge_ids())
    }

    fn edges_with_label(
        &self,
        label: EdgeLabel,
    ) -> EdgeCursor<'_, Self, impl Iterator<Item = EdgeId> + '_>
    where
        Self: Sized,
    {
        EdgeCursor::new(self, self.edge_ids_with_label(label))
    }
}

/// Write side of a storage backend.
///
/// Implementations must keep every invariant of the data model after each
/// call: edge endpoints exist, adjacency sets mirror the edge table, and
/// secondary indices mirror the primary tables.
pub trait GraphStoreMut: GraphStore {
    /// Insert a vertex if `id` is unused. An existing vertex keeps its label.
    /// Returns `true` if a vertex was created.
    fn insert_vertex(&mut self, id: VertexId, label: VertexLabel) -> bool;

    /// Insert edge `id` from `src` to `dst`.
    fn insert_edge(
        &mut self,
        src: VertexId,
        dst: VertexId,
        label: EdgeLabel,
        id: EdgeId,
    ) -> InsertEdge;

    /// Erase a vertex and every edge touching it.
    ///
    /// Returns the number of entities removed (the vertex plus its edges), or
    /// 0 if the vertex did not exist.
    fn erase_vertex(&mut self, id: VertexId) -> usize;

    /// Erase an edge. Returns 1 if it existed, 0 otherwise.
    fn erase_edge(&mut self, id: EdgeId) -> usize;

    /// Remove every vertex and edge.
    fn clear(&mut self);

    /// Add a vertex attribute. Rejects duplicate keys; returns `true` on insert.
    fn insert_vertex_attribute(&mut self, _vertex: VertexId, _key: &str, _value: AttributeValue) -> bool {
        false
    }

    /// Insert or overwrite a vertex attribute. Returns `false` if the vertex
    /// does not exist or the backend has no attribute support.
    fn set_vertex_attribute(&mut self, _vertex: VertexId, _key: &str, _value: AttributeValue) -> bool {
        false
    }

    fn remove_vertex_attribute(&mut self, _vertex: VertexId, _key: &str) -> Option<AttributeValue> {
        None
    }

    /// Add an edge attribute. Rejects duplicate keys; returns `true` on insert.
    fn insert_edge_attribute(&mut self, _edge: EdgeId, _key: &str, _value: AttributeValue) -> bool {
        false
    }

    fn set_edge_attribute(&mut self, _edge: EdgeId, _key: &str, _value: AttributeValue) -> bool {
        false
    }

    fn remove_edge_attribute(&mut self, _edge: EdgeId, _key: &str) -> Option<AttributeValue> {
        None
    }

    // --- handle surface ---

    /// Add a vertex, returning its handle and whether it was newly inserted.
    fn add_vertex(&mut self, id: VertexId, label: VertexLabel) -> (VertexHandle<'_, Self>, bool)
    where
        Self: Sized,
    {
        let inserted = self.insert_vertex(id, label);
        (VertexHandle::new(self, id), inserted)
    }

    /// Add an edge, returning its handle and whether it was newly inserted.
    ///
    /// A missing endpoint yields a null handle; an ID collision yields the
    /// existing edge with `inserted == false`.
    fn add_edge(
        &mut self,
        src: VertexId,
        dst: VertexId,
        label: EdgeLabel,
        id: EdgeId,
    ) -> (EdgeHandle<'_, Self>, bool)
    where
        Self: Sized,
    {
        match self.insert_edge(src, dst, label, id) {
            InsertEdge::Inserted => (EdgeHandle::new(self, id), true),
            InsertEdge::Exists => (EdgeHandle::new(self, id), false),
            InsertEdge::MissingEndpoint => (EdgeHandle::null(), false),
        }
    }

    fn find_vertex_mut(&mut self, id: VertexId) -> Option<VertexMut<'_, Self>>
    where
        Self: Sized,
    {
        if self.contains_vertex(id) {
            Some(VertexMut::new(self, id))
        } else {
            None
        }
    }

    fn find_edge_mut(&mut self, id: EdgeId) -> Option<EdgeMut<'_, Self>>
    where
        Self: Sized,
    {
        if self.contains_edge(id) {
            Some(EdgeMut::new(self, id))
        } else {
            None
        }
    }
}
