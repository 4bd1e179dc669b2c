use rustc_hash::FxHashMap;

use crate::graph::{GraphStore, VertexId};
use crate::handle::VertexHandle;

#[derive(Debug, Clone, Copy)]
struct VertexState {
    index: usize,
    low_link: usize,
    on_stack: bool,
}

struct Tarjan<'g, G> {
    graph: &'g G,
    next_index: usize,
    state: FxHashMap<VertexId, VertexState>,
    stack: Vec<VertexId>,
    components: Vec<Vec<VertexHandle<'g, G>>>,
}

impl<'g, G: GraphStore> Tarjan<'g, G> {
    fn strong_connect(&mut self, vertex: VertexId) {
        let index = self.next_index;
        self.next_index += 1;
        self.state.insert(
            vertex,
            VertexState {
                index,
                low_link: index,
                on_stack: true,
            },
        );
        self.stack.push(vertex);

        let graph = self.graph;
        for (_, next) in graph.out_adjacency(vertex) {
            let low = match self.state.get(&next) {
                None => {
                    self.strong_connect(next);
                    self.state[&next].low_link
                }
                Some(s) if s.on_stack => s.index,
                Some(_) => continue,
            };
            if let Some(s) = self.state.get_mut(&vertex) {
                s.low_link = s.low_link.min(low);
            }
        }

        if self.state[&vertex].low_link != index {
            return;
        }
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            if let Some(s) = self.state.get_mut(&member) {
                s.on_stack = false;
            }
            component.push(VertexHandle::new(graph, member));
            if member == vertex {
                break;
            }
        }
        component.sort_unstable();
        self.components.push(component);
    }
}

/// Strongly connected components by Tarjan's algorithm.
///
/// Follows outgoing edges only. Each component is sorted; components are
/// listed in the order their roots close, with roots tried in ascending ID
/// order. Every vertex lands in exactly one component.
///
/// Recursion depth grows with the longest simple path.
pub fn strongly_connected_components<G: GraphStore>(graph: &G) -> Vec<Vec<VertexHandle<'_, G>>> {
    let mut tarjan = Tarjan {
        graph,
        next_index: 0,
        state: FxHashMap::default(),
        stack: Vec::new(),
        components: Vec::new(),
    };
    for vertex in graph.vertex_ids() {
        if !tarjan.state.contains_key(&vertex) {
            tarjan.strong_connect(vertex);
        }
    }
    tarjan.components
}

/// Whether every vertex reaches every other one. False for the empty graph.
pub fn is_strongly_connected<G: GraphStore>(graph: &G) -> bool {
    graph.count_vertex() > 0 && strongly_connected_components(graph).len() == 1
}
