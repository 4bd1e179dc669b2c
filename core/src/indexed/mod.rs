//! Pointer-indexed storage backend.
//!
//! Vertex and edge records live in generational arenas and refer to each other
//! by [`Slot`](arena::Slot). Each vertex carries a per-direction
//! [`Adjacency`](adjacency::Adjacency) that indexes its incident edges by
//! label, by neighbor and by label-then-neighbor, so every scoped count and
//! cursor is a map lookup instead of a scan. Graph-wide label indices answer
//! `vertices_with_label` / `edges_with_label` the same way.
//!
//! Vertices and edges carry attribute maps.

mod adjacency;
mod arena;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use self::adjacency::{Adjacency, Incidence};
use self::arena::{Arena, Slot};
use crate::attribute::{self, AttributeValue, Attributes};
use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::{
    EdgeId, EdgeLabel, EdgeView, GraphStore, GraphStoreMut, InsertEdge, VertexId, VertexLabel,
};
use crate::integrity;

#[derive(Debug, Clone)]
struct VertexRecord {
    id: VertexId,
    label: VertexLabel,
    out: Adjacency,
    inc: Adjacency,
    attributes: Attributes,
}

#[derive(Debug, Clone)]
struct EdgeRecord {
    id: EdgeId,
    label: EdgeLabel,
    src: Slot,
    dst: Slot,
    src_id: VertexId,
    dst_id: VertexId,
    attributes: Attributes,
}

/// Graph stored as arena records with per-vertex secondary indices.
#[derive(Clone, Default)]
pub struct IndexedGraph {
    vertices: Arena<VertexRecord>,
    edges: Arena<EdgeRecord>,
    vertex_index: BTreeMap<VertexId, Slot>,
    edge_index: BTreeMap<EdgeId, Slot>,
    vertex_labels: BTreeMap<VertexLabel, BTreeSet<VertexId>>,
    edge_labels: BTreeMap<EdgeLabel, BTreeSet<EdgeId>>,
    verify_integrity: bool,
}

impl IndexedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate record storage for a known graph size.
    pub fn with_capacity(vertex_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            vertices: Arena::with_capacity(vertex_capacity),
            edges: Arena::with_capacity(edge_capacity),
            ..Self::default()
        }
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

    fn vertex(&self, id: VertexId) -> Option<&VertexRecord> {
        self.vertex_index
            .get(&id)
            .and_then(|&slot| self.vertices.get(slot))
    }

    fn vertex_mut(&mut self, id: VertexId) -> Option<&mut VertexRecord> {
        let slot = *self.vertex_index.get(&id)?;
        self.vertices.get_mut(slot)
    }

    fn edge(&self, id: EdgeId) -> Option<&EdgeRecord> {
        self.edge_index
            .get(&id)
            .and_then(|&slot| self.edges.get(slot))
    }

    fn edge_mut(&mut self, id: EdgeId) -> Option<&mut EdgeRecord> {
        let slot = *self.edge_index.get(&id)?;
        self.edges.get_mut(slot)
    }

    /// Unhook the edge at `slot` from both endpoints and every index.
    fn detach_edge(&mut self, id: EdgeId, slot: Slot) -> bool {
        let Some(record) = self.edges.remove(slot) else {
            return false;
        };
        self.edge_index.remove(&id);
        remove_from_label_index(&mut self.edge_labels, record.label, id);
        if let Some(src) = self.vertices.get_mut(record.src) {
            src.out.unlink(id);
        }
        if let Some(dst) = self.vertices.get_mut(record.dst) {
            dst.inc.unlink(id);
        }
        true
    }
}

fn remove_from_label_index<L: Ord + Copy, K: Ord>(
    index: &mut BTreeMap<L, BTreeSet<K>>,
    label: L,
    key: K,
) {
    if let Some(keys) = index.get_mut(&label) {
        keys.remove(&key);
        if keys.is_empty() {
            index.remove(&label);
        }
    }
}

fn check_label_index<L, K>(
    what: &str,
    actual: &BTreeMap<L, BTreeSet<K>>,
    entries: impl Iterator<Item = (L, K)>,
) -> GraphResult<()>
where
    L: Ord + fmt::Debug,
    K: Ord,
{
    let mut expected: BTreeMap<L, BTreeSet<K>> = BTreeMap::new();
    for (label, key) in entries {
        expected.entry(label).or_default().insert(key);
    }
    if &expected != actual {
        return Err(GraphError::Integrity(format!(
            "{what} label index out of step with records"
        )));
    }
    Ok(())
}

impl fmt::Debug for IndexedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedGraph")
            .field("vertices", &self.vertex_index.len())
            .field("edges", &self.edge_index.len())
            .field("vertex_labels", &self.vertex_labels.len())
            .field("edge_labels", &self.edge_labels.len())
            .finish()
    }
}

impl GraphStore for IndexedGraph {
    const SUPPORTS_ATTRIBUTES: bool = true;

    fn count_vertex(&self) -> usize {
        self.vertex_index.len()
    }

    fn count_edge(&self) -> usize {
        self.edge_index.len()
    }

    fn count_vertex_with_label(&self, label: VertexLabel) -> usize {
        self.vertex_labels.get(&label).map_or(0, BTreeSet::len)
    }

    fn count_edge_with_label(&self, label: EdgeLabel) -> usize {
        self.edge_labels.get(&label).map_or(0, BTreeSet::len)
    }

    fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertex_index.contains_key(&id)
    }

    fn contains_edge(&self, id: EdgeId) -> bool {
        self.edge_index.contains_key(&id)
    }

    fn vertex_label(&self, id: VertexId) -> Option<VertexLabel> {
        self.vertex(id).map(|v| v.label)
    }

    fn edge_view(&self, id: EdgeId) -> Option<EdgeView> {
        self.edge(id).map(|e| EdgeView {
            id,
            label: e.label,
            src: e.src_id,
            dst: e.dst_id,
        })
    }

    fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_index.keys().copied()
    }

    fn vertex_ids_with_label(&self, label: VertexLabel) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_labels
            .get(&label)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_index.keys().copied()
    }

    fn edge_ids_with_label(&self, label: EdgeLabel) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_labels
            .get(&label)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    fn out_edge_ids(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(|v| v.out.edge_ids())
    }

    fn in_edge_ids(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(|v| v.inc.edge_ids())
    }

    fn out_edge_ids_with_label(
        &self,
        vertex: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(move |v| v.out.edge_ids_with_label(label))
    }

    fn in_edge_ids_with_label(
        &self,
        vertex: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(move |v| v.inc.edge_ids_with_label(label))
    }

    fn out_edge_ids_to(&self, vertex: VertexId, dst: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(move |v| v.out.edge_ids_to(dst))
    }

    fn in_edge_ids_from(&self, vertex: VertexId, src: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(move |v| v.inc.edge_ids_to(src))
    }

    fn out_edge_ids_to_with_label(
        &self,
        vertex: VertexId,
        dst: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(move |v| v.out.edge_ids_to_with_label(dst, label))
    }

    fn in_edge_ids_from_with_label(
        &self,
        vertex: VertexId,
        src: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(move |v| v.inc.edge_ids_to_with_label(src, label))
    }

    fn out_adjacency(&self, vertex: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(|v| v.out.incidences().map(|(id, inc)| (id, inc.neighbor)))
    }

    fn in_adjacency(&self, vertex: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(|v| v.inc.incidences().map(|(id, inc)| (id, inc.neighbor)))
    }

    fn out_neighbor_ids_with_label(
        &self,
        vertex: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(move |v| v.out.neighbors_with_label(label))
    }

    fn in_neighbor_ids_with_label(
        &self,
        vertex: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(move |v| v.inc.neighbors_with_label(label))
    }

    fn count_out_edge(&self, vertex: VertexId) -> usize {
        self.vertex(vertex).map_or(0, |v| v.out.len())
    }

    fn count_in_edge(&self, vertex: VertexId) -> usize {
        self.vertex(vertex).map_or(0, |v| v.inc.len())
    }

    fn count_out_edge_with_label(&self, vertex: VertexId, label: EdgeLabel) -> usize {
        self.vertex(vertex)
            .map_or(0, |v| v.out.count_with_label(label))
    }

    fn count_in_edge_with_label(&self, vertex: VertexId, label: EdgeLabel) -> usize {
        self.vertex(vertex)
            .map_or(0, |v| v.inc.count_with_label(label))
    }

    fn count_out_edge_to(&self, vertex: VertexId, dst: VertexId) -> usize {
        self.vertex(vertex).map_or(0, |v| v.out.count_to(dst))
    }

    fn count_in_edge_from(&self, vertex: VertexId, src: VertexId) -> usize {
        self.vertex(vertex).map_or(0, |v| v.inc.count_to(src))
    }

    fn count_out_vertex_with_label(&self, vertex: VertexId, label: EdgeLabel) -> usize {
        self.vertex(vertex)
            .map_or(0, |v| v.out.count_neighbors_with_label(label))
    }

    fn count_in_vertex_with_label(&self, vertex: VertexId, label: EdgeLabel) -> usize {
        self.vertex(vertex)
            .map_or(0, |v| v.inc.count_neighbors_with_label(label))
    }

    fn vertex_attribute(&self, vertex: VertexId, key: &str) -> Option<&AttributeValue> {
        self.vertex(vertex)?.attributes.get(key)
    }

    fn edge_attribute(&self, edge: EdgeId, key: &str) -> Option<&AttributeValue> {
        self.edge(edge)?.attributes.get(key)
    }

    fn vertex_attributes(&self, vertex: VertexId) -> impl Iterator<Item = (&str, &AttributeValue)> + '_ {
        self.vertex(vertex)
            .into_iter()
            .flat_map(|v| v.attributes.iter().map(|(k, value)| (k.as_str(), value)))
    }

    fn edge_attributes(&self, edge: EdgeId) -> impl Iterator<Item = (&str, &AttributeValue)> + '_ {
        self.edge(edge)
            .into_iter()
            .flat_map(|e| e.attributes.iter().map(|(k, value)| (k.as_str(), value)))
    }

    fn check_indices(&self) -> GraphResult<()> {
        if self.vertices.len() != self.vertex_index.len() {
            return Err(GraphError::Integrity(format!(
                "{} vertex records but {} indexed",
                self.vertices.len(),
                self.vertex_index.len()
            )));
        }
        if self.edges.len() != self.edge_index.len() {
            return Err(GraphError::Integrity(format!(
                "{} edge records but {} indexed",
                self.edges.len(),
                self.edge_index.len()
            )));
        }

        let mut vertex_entries = Vec::with_capacity(self.vertex_index.len());
        for (&id, &slot) in &self.vertex_index {
            let record = self
                .vertices
                .get(slot)
                .filter(|r| r.id == id)
                .ok_or_else(|| GraphError::Integrity(format!("vertex {id} has a dangling slot")))?;
            record.out.check(id, "out")?;
            record.inc.check(id, "in")?;
            vertex_entries.push((record.label, id));
        }
        check_label_index("vertex", &self.vertex_labels, vertex_entries.into_iter())?;

        let mut edge_entries = Vec::with_capacity(self.edge_index.len());
        for (&id, &slot) in &self.edge_index {
            let record = self
                .edges
                .get(slot)
                .filter(|r| r.id == id)
                .ok_or_else(|| GraphError::Integrity(format!("edge {id} has a dangling slot")))?;
            let expected_out = Incidence {
                edge: slot,
                label: record.label,
                neighbor: record.dst_id,
            };
            let expected_in = Incidence {
                edge: slot,
                label: record.label,
                neighbor: record.src_id,
            };
            let src_ok = self.vertices.get(record.src).is_some_and(|v| {
                v.id == record.src_id
                    && v.out
                        .incidences()
                        .any(|(e, inc)| e == id && *inc == expected_out)
            });
            let dst_ok = self.vertices.get(record.dst).is_some_and(|v| {
                v.id == record.dst_id
                    && v.inc
                        .incidences()
                        .any(|(e, inc)| e == id && *inc == expected_in)
            });
            if !src_ok || !dst_ok {
                return Err(GraphError::Integrity(format!(
                    "edge {id} is not linked from its endpoint records"
                )));
            }
            edge_entries.push((record.label, id));
        }
        check_label_index("edge", &self.edge_labels, edge_entries.into_iter())
    }
}

impl GraphStoreMut for IndexedGraph {
    fn insert_vertex(&mut self, id: VertexId, label: VertexLabel) -> bool {
        if self.vertex_index.contains_key(&id) {
            return false;
        }
        let slot = self.vertices.insert(VertexRecord {
            id,
            label,
            out: Adjacency::default(),
            inc: Adjacency::default(),
            attributes: Attributes::new(),
        });
        self.vertex_index.insert(id, slot);
        self.vertex_labels.entry(label).or_default().insert(id);
        self.after_mutation("insert_vertex");
        true
    }

    fn insert_edge(
        &mut self,
        src: VertexId,
        dst: VertexId,
        label: EdgeLabel,
        id: EdgeId,
    ) -> InsertEdge {
        let (Some(&src_slot), Some(&dst_slot)) =
            (self.vertex_index.get(&src), self.vertex_index.get(&dst))
        else {
            return InsertEdge::MissingEndpoint;
        };
        if self.edge_index.contains_key(&id) {
            return InsertEdge::Exists;
        }

        let slot = self.edges.insert(EdgeRecord {
            id,
            label,
            src: src_slot,
            dst: dst_slot,
            src_id: src,
            dst_id: dst,
            attributes: Attributes::new(),
        });
        self.edge_index.insert(id, slot);
        self.edge_labels.entry(label).or_default().insert(id);

        if let Some(record) = self.vertices.get_mut(src_slot) {
            record.out.link(
                id,
                Incidence {
                    edge: slot,
                    label,
                    neighbor: dst,
                },
            );
        }
        if let Some(record) = self.vertices.get_mut(dst_slot) {
            record.inc.link(
                id,
                Incidence {
                    edge: slot,
                    label,
                    neighbor: src,
                },
            );
        }
        self.after_mutation("insert_edge");
        InsertEdge::Inserted
    }

    fn erase_vertex(&mut self, id: VertexId) -> usize {
        let Some(&slot) = self.vertex_index.get(&id) else {
            return 0;
        };
        let Some(record) = self.vertices.get(slot) else {
            return 0;
        };

        // A self-loop is linked on both sides; detach it once.
        let mut incident: Vec<(EdgeId, Slot)> = record
            .out
            .incidences()
            .chain(record.inc.incidences())
            .map(|(edge_id, inc)| (edge_id, inc.edge))
            .collect();
        incident.sort_unstable();
        incident.dedup();

        for &(edge_id, edge_slot) in &incident {
            self.detach_edge(edge_id, edge_slot);
        }

        if let Some(record) = self.vertices.remove(slot) {
            remove_from_label_index(&mut self.vertex_labels, record.label, id);
        }
        self.vertex_index.remove(&id);

        debug!(vertex = id, edges_removed = incident.len(), "erased vertex");
        self.after_mutation("erase_vertex");
        incident.len() + 1
    }

    fn erase_edge(&mut self, id: EdgeId) -> usize {
        let Some(&slot) = self.edge_index.get(&id) else {
            return 0;
        };
        if !self.detach_edge(id, slot) {
            return 0;
        }
        self.after_mutation("erase_edge");
        1
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.vertex_index.clear();
        self.edge_index.clear();
        self.vertex_labels.clear();
        self.edge_labels.clear();
    }

    fn insert_vertex_attribute(&mut self, vertex: VertexId, key: &str, value: AttributeValue) -> bool {
        self.vertex_mut(vertex)
            .is_some_and(|v| attribute::insert_new(&mut v.attributes, key, value))
    }

    fn set_vertex_attribute(&mut self, vertex: VertexId, key: &str, value: AttributeValue) -> bool {
        match self.vertex_mut(vertex) {
            Some(v) => {
                v.attributes.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    fn remove_vertex_attribute(&mut self, vertex: VertexId, key: &str) -> Option<AttributeValue> {
        self.vertex_mut(vertex)?.attributes.shift_remove(key)
    }

    fn insert_edge_attribute(&mut self, edge: EdgeId, key: &str, value: AttributeValue) -> bool {
        self.edge_mut(edge)
            .is_some_and(|e| attribute::insert_new(&mut e.attributes, key, value))
    }

    fn set_edge_attribute(&mut self, edge: EdgeId, key: &str, value: AttributeValue) -> bool {
        match self.edge_mut(edge) {
            Some(e) => {
                e.attributes.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    fn remove_edge_attribute(&mut self, edge: EdgeId, key: &str) -> Option<AttributeValue> {
        self.edge_mut(edge)?.attributes.shift_remove(key)
    }
}
