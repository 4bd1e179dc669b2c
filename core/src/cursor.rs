//! Cursors over vertex and edge ID ranges.
//!
//! A cursor pairs a forward-only ID iterator with the graph it came from and
//! rebuilds a fresh handle for each position. It is also an [`Iterator`] over
//! handles, which is the usual way to consume one.

use std::fmt;

use crate::graph::{EdgeId, VertexId};
use crate::handle::{EdgeHandle, VertexHandle};

/// Cursor yielding [`VertexHandle`]s.
pub struct VertexCursor<'g, G, I> {
    graph: &'g G,
    current: Option<VertexId>,
    rest: I,
}

impl<'g, G, I: Iterator<Item = VertexId>> VertexCursor<'g, G, I> {
    pub fn new(graph: &'g G, mut ids: I) -> Self {
        let current = ids.next();
        Self {
            graph,
            current,
            rest: ids,
        }
    }

    pub fn is_done(&self) -> bool {
        self.current.is_none()
    }

    /// Handle at the current position.
    ///
    /// # Panics
    /// Panics if the cursor is done.
    pub fn get(&self) -> VertexHandle<'g, G> {
        match self.current {
            Some(id) => VertexHandle::new(self.graph, id),
            None => panic!("vertex cursor dereferenced past the end"),
        }
    }

    /// Move to the next position.
    ///
    /// # Panics
    /// Panics if the cursor is already done.
    pub fn advance(&mut self) {
        assert!(self.current.is_some(), "vertex cursor advanced past the end");
        self.current = self.rest.next();
    }
}

impl<'g, G, I: Iterator<Item = VertexId>> Iterator for VertexCursor<'g, G, I> {
    type Item = VertexHandle<'g, G>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.rest.next();
        Some(VertexHandle::new(self.graph, id))
    }
}

impl<G, I> PartialEq for VertexCursor<'_, G, I> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<G, I> fmt::Debug for VertexCursor<'_, G, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexCursor")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// Cursor yielding [`EdgeHandle`]s.
pub struct EdgeCursor<'g, G, I> {
    graph: &'g G,
    current: Option<EdgeId>,
    rest: I,
}

impl<'g, G, I: Iterator<Item = EdgeId>> EdgeCursor<'g, G, I> {
    pub fn new(graph: &'g G, mut ids: I) -> Self {
        let current = ids.next();
        Self {
            graph,
            current,
            rest: ids,
        }
    }

    pub fn is_done(&self) -> bool {
        self.current.is_none()
    }

    /// # Panics
    /// Panics if the cursor is done.
    pub fn get(&self) -> EdgeHandle<'g, G> {
        match self.current {
            Some(id) => EdgeHandle::new(self.graph, id),
            None => panic!("edge cursor dereferenced past the end"),
        }
    }

    /// # Panics
    /// Panics if the cursor is already done.
    pub fn advance(&mut self) {
        assert!(self.current.is_some(), "edge cursor advanced past the end");
        self.current = self.rest.next();
    }
}

impl<'g, G, I: Iterator<Item = EdgeId>> Iterator for EdgeCursor<'g, G, I> {
    type Item = EdgeHandle<'g, G>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.rest.next();
        Some(EdgeHandle::new(self.graph, id))
    }
}

impl<G, I> PartialEq for EdgeCursor<'_, G, I> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<G, I> fmt::Debug for EdgeCursor<'_, G, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeCursor")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
