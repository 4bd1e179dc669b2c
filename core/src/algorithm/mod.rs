//! Structural algorithms written once against [`GraphStore`](crate::GraphStore).

mod components;
mod copy;
mod ids;
mod isolated;
mod khop;
mod link;
mod scc;
mod topo;

pub use components::{connected_components, is_connected, is_tree};
pub use copy::{copy_graph, same_structure};
pub use ids::{duplicate_edge, duplicate_vertex, max_edge_id, max_vertex_id};
pub use isolated::{
    count_isolated_vertex, has_isolated_vertex, is_isolated, isolated_vertices,
    remove_isolated_vertex,
};
pub use khop::{k_hop, k_hop_vertices};
pub use link::{is_link, link_end_points};
pub use scc::{is_strongly_connected, strongly_connected_components};
pub use topo::{topo_sort, topological_order};
