//! One direction of a vertex's incidence, indexed four ways.
//!
//! Every structure is keyed from the owning vertex's point of view: for the
//! outgoing side `neighbor` is the edge's destination, for the incoming side
//! its source. [`Adjacency::link`] and [`Adjacency::unlink`] are the only
//! writers and keep the four views in step.

use std::collections::{BTreeMap, BTreeSet};

use super::arena::Slot;
use crate::error::{GraphError, GraphResult};
use crate::graph::{EdgeId, EdgeLabel, VertexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Incidence {
    pub(crate) edge: Slot,
    pub(crate) label: EdgeLabel,
    pub(crate) neighbor: VertexId,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Adjacency {
    edges: BTreeMap<EdgeId, Incidence>,
    by_label: BTreeMap<EdgeLabel, BTreeSet<EdgeId>>,
    by_neighbor: BTreeMap<VertexId, BTreeMap<EdgeLabel, BTreeSet<EdgeId>>>,
    neighbors_by_label: BTreeMap<EdgeLabel, BTreeMap<VertexId, usize>>,
}

impl Adjacency {
    pub(crate) fn link(&mut self, id: EdgeId, incidence: Incidence) {
        if self.edges.insert(id, incidence).is_some() {
            return;
        }
        let Incidence {
            label, neighbor, ..
        } = incidence;
        self.by_label.entry(label).or_default().insert(id);
        self.by_neighbor
            .entry(neighbor)
            .or_default()
            .entry(label)
            .or_default()
            .insert(id);
        *self
            .neighbors_by_label
            .entry(label)
            .or_default()
            .entry(neighbor)
            .or_insert(0) += 1;
    }

    pub(crate) fn unlink(&mut self, id: EdgeId) -> Option<Incidence> {
        let incidence = self.edges.remove(&id)?;
        let Incidence {
            label, neighbor, ..
        } = incidence;

        if let Some(ids) = self.by_label.get_mut(&label) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_label.remove(&label);
            }
        }

        if let Some(labels) = self.by_neighbor.get_mut(&neighbor) {
            if let Some(ids) = labels.get_mut(&label) {
                ids.remove(&id);
                if ids.is_empty() {
                    labels.remove(&label);
                }
            }
            if labels.is_empty() {
                self.by_neighbor.remove(&neighbor);
            }
        }

        if let Some(neighbors) = self.neighbors_by_label.get_mut(&label) {
            if let Some(count) = neighbors.get_mut(&neighbor) {
                *count -= 1;
                if *count == 0 {
                    neighbors.remove(&neighbor);
                }
            }
            if neighbors.is_empty() {
                self.neighbors_by_label.remove(&label);
            }
        }

        Some(incidence)
    }

    pub(crate) fn len(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn incidences(&self) -> impl Iterator<Item = (EdgeId, &Incidence)> + '_ {
        self.edges.iter().map(|(&id, inc)| (id, inc))
    }

    pub(crate) fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys().copied()
    }

    pub(crate) fn edge_ids_with_label(&self, label: EdgeLabel) -> impl Iterator<Item = EdgeId> + '_ {
        self.by_label
            .get(&label)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    pub(crate) fn count_with_label(&self, label: EdgeLabel) -> usize {
        self.by_label.get(&label).map_or(0, BTreeSet::len)
    }

    /// Edges to `neighbor` of any label, ascending.
    pub(crate) fn edge_ids_to(&self, neighbor: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        let mut ids: Vec<EdgeId> = self
            .by_neighbor
            .get(&neighbor)
            .into_iter()
            .flat_map(|labels| labels.values())
            .flat_map(|ids| ids.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.into_iter()
    }

    pub(crate) fn count_to(&self, neighbor: VertexId) -> usize {
        self.by_neighbor
            .get(&neighbor)
            .map_or(0, |labels| labels.values().map(BTreeSet::len).sum())
    }

    pub(crate) fn edge_ids_to_with_label(
        &self,
        neighbor: VertexId,
        label: EdgeLabel,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.by_neighbor
            .get(&neighbor)
            .and_then(|labels| labels.get(&label))
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    pub(crate) fn neighbors_with_label(&self, label: EdgeLabel) -> impl Iterator<Item = VertexId> + '_ {
        self.neighbors_by_label
            .get(&label)
            .into_iter()
            .flat_map(|neighbors| neighbors.keys().copied())
    }

    pub(crate) fn count_neighbors_with_label(&self, label: EdgeLabel) -> usize {
        self.neighbors_by_label.get(&label).map_or(0, BTreeMap::len)
    }

    /// Verify the derived views against the primary edge map.
    pub(crate) fn check(&self, owner: VertexId, side: &str) -> GraphResult<()> {
        let mut by_label: BTreeMap<EdgeLabel, BTreeSet<EdgeId>> = BTreeMap::new();
        let mut by_neighbor: BTreeMap<VertexId, BTreeMap<EdgeLabel, BTreeSet<EdgeId>>> =
            BTreeMap::new();
        let mut neighbors_by_label: BTreeMap<EdgeLabel, BTreeMap<VertexId, usize>> =
            BTreeMap::new();
        for (&id, inc) in &self.edges {
            by_label.entry(inc.label).or_default().insert(id);
            by_neighbor
                .entry(inc.neighbor)
                .or_default()
                .entry(inc.label)
                .or_default()
                .insert(id);
            *neighbors_by_label
                .entry(inc.label)
                .or_default()
                .entry(inc.neighbor)
                .or_insert(0) += 1;
        }

        let mismatch = |what: &str| {
            GraphError::Integrity(format!("vertex {owner} {side} {what} index out of step"))
        };
        if by_label != self.by_label {
            return Err(mismatch("label"));
        }
        if by_neighbor != self.by_neighbor {
            return Err(mismatch("neighbor"));
        }
        if neighbors_by_label != self.neighbors_by_label {
            return Err(mismatch("neighbor multiset"));
        }
        Ok(())
    }
}
