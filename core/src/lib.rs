//! graph-engine-core: storage-agnostic in-memory graph engine.
//!
//! Directed, labeled multigraphs behind one backend contract
//! ([`GraphStore`] / [`GraphStoreMut`]) with two implementations:
//! [`CompactGraph`], sorted ID tables with the smallest footprint, and
//! [`IndexedGraph`], arena records with per-vertex label and neighbor
//! indices plus attribute maps. Handles and cursors sit on top of the
//! contract, and the traversal and structural algorithms are written once
//! against it.
//!
//! Both backends produce identical traversal results for identical graphs.

mod algorithm;
mod attribute;
mod compact;
mod config;
mod container;
mod cursor;
mod error;
mod graph;
mod handle;
mod indexed;
mod integrity;
mod traversal;

pub use algorithm::{
    connected_components, copy_graph, count_isolated_vertex, duplicate_edge, duplicate_vertex,
    has_isolated_vertex, is_connected, is_isolated, is_link, is_strongly_connected, is_tree,
    isolated_vertices, k_hop, k_hop_vertices, link_end_points, max_edge_id, max_vertex_id,
    remove_isolated_vertex, same_structure, strongly_connected_components, topo_sort,
    topological_order,
};
pub use attribute::{AttributeValue, Attributes};
pub use compact::CompactGraph;
pub use config::GraphConfig;
pub use container::{
    BTreeFamily, ContainerFamily, OrderedMap, OrderedSet, SortedVecFamily, SortedVecMap,
    SortedVecSet,
};
pub use cursor::{EdgeCursor, VertexCursor};
pub use error::{GraphError, GraphResult};
pub use graph::{
    Direction, EdgeId, EdgeLabel, EdgeView, GraphStore, GraphStoreMut, InsertEdge, VertexId,
    VertexLabel,
};
pub use handle::{EdgeHandle, EdgeMut, VertexHandle, VertexMut};
pub use indexed::IndexedGraph;
pub use integrity::check_integrity;
pub use traversal::{
    bfs, bfs_from, bfs_within, dfs, Bfs, Continue, DistanceLimit, NoPrune, OnIndexed, OnVertex,
    PruneEdge, PruneEither, PruneVertex, Pruner, Visitor,
};
