use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::graph::{Direction, EdgeId, GraphStore, VertexId};
use crate::handle::{EdgeHandle, VertexHandle};

/// Per-vertex visit callback.
///
/// Called once per dequeued vertex with its 0-based visit index and its
/// distance from the nearest source. Returning `false` stops the traversal.
///
/// Any `FnMut(VertexHandle, usize, usize) -> bool` is a visitor. Shorter forms
/// go through [`OnVertex`] or [`OnIndexed`].
pub trait Visitor<'g, G: 'g> {
    fn visit(&mut self, vertex: VertexHandle<'g, G>, index: usize, distance: usize) -> bool;
}

impl<'g, G: 'g, F> Visitor<'g, G> for F
where
    F: FnMut(VertexHandle<'g, G>, usize, usize) -> bool,
{
    fn visit(&mut self, vertex: VertexHandle<'g, G>, index: usize, distance: usize) -> bool {
        self(vertex, index, distance)
    }
}

/// Neighbor filter.
///
/// Sees a not-yet-visited neighbor, the edge that reached it, and the visit
/// index and distance of the vertex being expanded. Returning `true` skips the
/// neighbor; it stays unvisited and may still be reached over another edge.
///
/// Any `FnMut(VertexHandle, EdgeHandle, usize, usize) -> bool` is a pruner.
/// Shorter forms go through [`PruneVertex`] or [`PruneEdge`].
pub trait Pruner<'g, G: 'g> {
    fn prune(
        &mut self,
        neighbor: VertexHandle<'g, G>,
        edge: EdgeHandle<'g, G>,
        index: usize,
        distance: usize,
    ) -> bool;
}

impl<'g, G: 'g, F> Pruner<'g, G> for F
where
    F: FnMut(VertexHandle<'g, G>, EdgeHandle<'g, G>, usize, usize) -> bool,
{
    fn prune(
        &mut self,
        neighbor: VertexHandle<'g, G>,
        edge: EdgeHandle<'g, G>,
        index: usize,
        distance: usize,
    ) -> bool {
        self(neighbor, edge, index, distance)
    }
}

/// Visitor taking only the vertex.
#[derive(Debug, Clone, Copy)]
pub struct OnVertex<F>(pub F);

impl<'g, G: 'g, F> Visitor<'g, G> for OnVertex<F>
where
    F: FnMut(VertexHandle<'g, G>) -> bool,
{
    fn visit(&mut self, vertex: VertexHandle<'g, G>, _index: usize, _distance: usize) -> bool {
        (self.0)(vertex)
    }
}

/// Visitor taking the vertex and its visit index.
#[derive(Debug, Clone, Copy)]
pub struct OnIndexed<F>(pub F);

impl<'g, G: 'g, F> Visitor<'g, G> for OnIndexed<F>
where
    F: FnMut(VertexHandle<'g, G>, usize) -> bool,
{
    fn visit(&mut self, vertex: VertexHandle<'g, G>, index: usize, _distance: usize) -> bool {
        (self.0)(vertex, index)
    }
}

/// Visitor that never stops the traversal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Continue;

impl<'g, G: 'g> Visitor<'g, G> for Continue {
    fn visit(&mut self, _vertex: VertexHandle<'g, G>, _index: usize, _distance: usize) -> bool {
        true
    }
}

/// Pruner taking only the neighbor.
#[derive(Debug, Clone, Copy)]
pub struct PruneVertex<F>(pub F);

impl<'g, G: 'g, F> Pruner<'g, G> for PruneVertex<F>
where
    F: FnMut(VertexHandle<'g, G>) -> bool,
{
    fn prune(
        &mut self,
        neighbor: VertexHandle<'g, G>,
        _edge: EdgeHandle<'g, G>,
        _index: usize,
        _distance: usize,
    ) -> bool {
        (self.0)(neighbor)
    }
}

/// Pruner taking the neighbor and the edge that reached it.
#[derive(Debug, Clone, Copy)]
pub struct PruneEdge<F>(pub F);

impl<'g, G: 'g, F> Pruner<'g, G> for PruneEdge<F>
where
    F: FnMut(VertexHandle<'g, G>, EdgeHandle<'g, G>) -> bool,
{
    fn prune(
        &mut self,
        neighbor: VertexHandle<'g, G>,
        edge: EdgeHandle<'g, G>,
        _index: usize,
        _distance: usize,
    ) -> bool {
        (self.0)(neighbor, edge)
    }
}

/// Pruner that accepts every neighbor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrune;

impl<'g, G: 'g> Pruner<'g, G> for NoPrune {
    fn prune(
        &mut self,
        _neighbor: VertexHandle<'g, G>,
        _edge: EdgeHandle<'g, G>,
        _index: usize,
        _distance: usize,
    ) -> bool {
        false
    }
}

/// Stops expansion from vertices at distance `k` or more, so nothing farther
/// than `k` hops from a source is visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceLimit(pub usize);

impl<'g, G: 'g> Pruner<'g, G> for DistanceLimit {
    fn prune(
        &mut self,
        _neighbor: VertexHandle<'g, G>,
        _edge: EdgeHandle<'g, G>,
        _index: usize,
        distance: usize,
    ) -> bool {
        distance >= self.0
    }
}

/// Skips a neighbor if either pruner does. The first short-circuits the second.
#[derive(Debug, Clone, Copy)]
pub struct PruneEither<A, B>(pub A, pub B);

impl<'g, G: 'g, A, B> Pruner<'g, G> for PruneEither<A, B>
where
    A: Pruner<'g, G>,
    B: Pruner<'g, G>,
{
    fn prune(
        &mut self,
        neighbor: VertexHandle<'g, G>,
        edge: EdgeHandle<'g, G>,
        index: usize,
        distance: usize,
    ) -> bool {
        self.0.prune(neighbor, edge, index, distance) || self.1.prune(neighbor, edge, index, distance)
    }
}

/// Adjacent `(edge, neighbor, direction)` triples of `vertex`: outgoing edges
/// first, then incoming ones when `bidirectional` is set.
pub(crate) fn neighbors<G: GraphStore>(
    graph: &G,
    vertex: VertexId,
    bidirectional: bool,
) -> impl Iterator<Item = (EdgeId, VertexId, Direction)> + '_ {
    let out_iter = graph
        .out_adjacency(vertex)
        .map(|(e, n)| (e, n, Direction::Outgoing));
    let in_iter = bidirectional
        .then(|| graph.in_adjacency(vertex))
        .into_iter()
        .flatten()
        .map(|(e, n)| (e, n, Direction::Incoming));
    out_iter.chain(in_iter)
}

/// Generalized breadth-first search.
///
/// Sources are marked visited and enqueued at distance 0; absent or repeated
/// sources are ignored. A neighbor is marked visited when it is enqueued, so
/// parallel paths never enqueue it twice. With `bidirectional` both edge
/// directions are expanded and the pruner is consulted for each.
///
/// Returns the number of vertices visited, including the one whose visitor
/// returned `false`.
pub fn bfs<'g, G, V, P>(
    graph: &'g G,
    sources: impl IntoIterator<Item = VertexId>,
    mut visitor: V,
    mut pruner: P,
    bidirectional: bool,
) -> usize
where
    G: GraphStore,
    V: Visitor<'g, G>,
    P: Pruner<'g, G>,
{
    let mut visited: FxHashSet<VertexId> = FxHashSet::default();
    let mut queue: VecDeque<(VertexId, usize)> = VecDeque::new();

    for source in sources {
        if graph.contains_vertex(source) && visited.insert(source) {
            queue.push_back((source, 0));
        }
    }
    trace!(sources = queue.len(), bidirectional, "bfs start");

    let mut visited_count = 0;
    while let Some((current, distance)) = queue.pop_front() {
        let index = visited_count;
        visited_count += 1;

        if !visitor.visit(VertexHandle::new(graph, current), index, distance) {
            debug!(visited = visited_count, pending = queue.len(), "bfs stopped by visitor");
            return visited_count;
        }

        for (edge, neighbor, _) in neighbors(graph, current, bidirectional) {
            if visited.contains(&neighbor) {
                continue;
            }
            let skip = pruner.prune(
                VertexHandle::new(graph, neighbor),
                EdgeHandle::new(graph, edge),
                index,
                distance,
            );
            if skip {
                continue;
            }
            visited.insert(neighbor);
            queue.push_back((neighbor, distance + 1));
        }
    }

    visited_count
}

/// [`bfs`] from a single source with no pruning.
pub fn bfs_from<'g, G, V>(graph: &'g G, source: VertexId, visitor: V, bidirectional: bool) -> usize
where
    G: GraphStore,
    V: Visitor<'g, G>,
{
    bfs(graph, [source], visitor, NoPrune, bidirectional)
}

/// [`bfs`] restricted to vertices at most `k` hops from a source.
pub fn bfs_within<'g, G, V>(
    graph: &'g G,
    sources: impl IntoIterator<Item = VertexId>,
    k: usize,
    visitor: V,
    bidirectional: bool,
) -> usize
where
    G: GraphStore,
    V: Visitor<'g, G>,
{
    bfs(graph, sources, visitor, DistanceLimit(k), bidirectional)
}

/// Iterative preorder depth-first search with the [`bfs`] callback contract.
///
/// `distance` is the depth in the DFS tree. A vertex is marked when popped
/// and its unvisited, unpruned neighbors are pushed so that they pop in
/// ascending ID order.
pub fn dfs<'g, G, V, P>(
    graph: &'g G,
    sources: impl IntoIterator<Item = VertexId>,
    mut visitor: V,
    mut pruner: P,
    bidirectional: bool,
) -> usize
where
    G: GraphStore,
    V: Visitor<'g, G>,
    P: Pruner<'g, G>,
{
    let mut visited: FxHashSet<VertexId> = FxHashSet::default();
    let mut stack: Vec<(VertexId, usize)> = sources
        .into_iter()
        .filter(|&s| graph.contains_vertex(s))
        .map(|s| (s, 0))
        .collect();
    stack.reverse();
    trace!(sources = stack.len(), bidirectional, "dfs start");

    let mut visited_count = 0;
    let mut frontier: Vec<VertexId> = Vec::new();
    while let Some((current, depth)) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        let index = visited_count;
        visited_count += 1;

        if !visitor.visit(VertexHandle::new(graph, current), index, depth) {
            debug!(visited = visited_count, "dfs stopped by visitor");
            return visited_count;
        }

        frontier.clear();
        for (edge, neighbor, _) in neighbors(graph, current, bidirectional) {
            if visited.contains(&neighbor) {
                continue;
            }
            let skip = pruner.prune(
                VertexHandle::new(graph, neighbor),
                EdgeHandle::new(graph, edge),
                index,
                depth,
            );
            if !skip {
                frontier.push(neighbor);
            }
        }
        frontier.sort_unstable();
        frontier.dedup();
        stack.extend(frontier.iter().rev().map(|&n| (n, depth + 1)));
    }

    visited_count
}

/// Builder over [`bfs`].
///
/// ```ignore
/// let reached = Bfs::new(&graph)
///     .source(1)
///     .max_distance(2)
///     .bidirectional(true)
///     .prune_vertex(|v| v.label() == BLOCKED)
///     .visit_vertices(|v| {
///         println!("{}", v.id());
///         true
///     });
/// ```
pub struct Bfs<'g, G, P = NoPrune> {
    graph: &'g G,
    sources: Vec<VertexId>,
    pruner: P,
    max_distance: Option<usize>,
    bidirectional: bool,
}

impl<'g, G: GraphStore> Bfs<'g, G, NoPrune> {
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            sources: Vec::new(),
            pruner: NoPrune,
            max_distance: None,
            bidirectional: false,
        }
    }
}

impl<'g, G: GraphStore, P: Pruner<'g, G>> Bfs<'g, G, P> {
    pub fn source(mut self, id: VertexId) -> Self {
        self.sources.push(id);
        self
    }

    pub fn sources(mut self, ids: impl IntoIterator<Item = VertexId>) -> Self {
        self.sources.extend(ids);
        self
    }

    /// Visit nothing farther than `k` hops from a source.
    pub fn max_distance(mut self, k: usize) -> Self {
        self.max_distance = Some(k);
        self
    }

    pub fn bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    /// Add a pruner; a neighbor is skipped if any configured pruner skips it.
    pub fn prune<Q: Pruner<'g, G>>(self, pruner: Q) -> Bfs<'g, G, PruneEither<P, Q>> {
        Bfs {
            graph: self.graph,
            sources: self.sources,
            pruner: PruneEither(self.pruner, pruner),
            max_distance: self.max_distance,
            bidirectional: self.bidirectional,
        }
    }

    pub fn prune_vertex<F>(self, f: F) -> Bfs<'g, G, PruneEither<P, PruneVertex<F>>>
    where
        F: FnMut(VertexHandle<'g, G>) -> bool,
    {
        self.prune(PruneVertex(f))
    }

    pub fn prune_edge<F>(self, f: F) -> Bfs<'g, G, PruneEither<P, PruneEdge<F>>>
    where
        F: FnMut(VertexHandle<'g, G>, EdgeHandle<'g, G>) -> bool,
    {
        self.prune(PruneEdge(f))
    }

    pub fn run<V: Visitor<'g, G>>(self, visitor: V) -> usize {
        let limit = DistanceLimit(self.max_distance.unwrap_or(usize::MAX));
        bfs(
            self.graph,
            self.sources,
            visitor,
            PruneEither(limit, self.pruner),
            self.bidirectional,
        )
    }

    pub fn visit_vertices<F>(self, f: F) -> usize
    where
        F: FnMut(VertexHandle<'g, G>) -> bool,
    {
        self.run(OnVertex(f))
    }

    pub fn visit_indexed<F>(self, f: F) -> usize
    where
        F: FnMut(VertexHandle<'g, G>, usize) -> bool,
    {
        self.run(OnIndexed(f))
    }

    /// Every reached vertex with its distance, in visit order.
    pub fn collect_distances(self) -> Vec<(VertexHandle<'g, G>, usize)> {
        let mut reached = Vec::new();
        self.run(|vertex: VertexHandle<'g, G>, _index: usize, distance: usize| {
            reached.push((vertex, distance));
            true
        });
        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact::CompactGraph;
    use crate::graph::GraphStoreMut;
    use crate::indexed::IndexedGraph;

    fn make_chain<G: GraphStoreMut + Default>(n: u64) -> G {
        let mut g = G::default();
        for v in 0..n {
            g.insert_vertex(v, 0);
        }
        for i in 0..n - 1 {
            g.insert_edge(i, i + 1, 0, i);
        }
        g
    }

    fn make_star<G: GraphStoreMut + Default>(leaves: u64) -> G {
        let mut g = G::default();
        g.insert_vertex(0, 0);
        for v in 1..=leaves {
            g.insert_vertex(v, 0);
            g.insert_edge(0, v, 0, v);
        }
        g
    }

    /// 0 -> 1 -> 3, 0 -> 2 -> 3
    fn make_diamond<G: GraphStoreMut + Default>() -> G {
        let mut g = G::default();
        for v in 0..4 {
            g.insert_vertex(v, 0);
        }
        g.insert_edge(0, 1, 0, 10);
        g.insert_edge(0, 2, 0, 11);
        g.insert_edge(1, 3, 0, 12);
        g.insert_edge(2, 3, 0, 13);
        g
    }

    fn ids_and_distances<G: GraphStore>(reached: Vec<(VertexHandle<'_, G>, usize)>) -> Vec<(u64, usize)> {
        reached.into_iter().map(|(v, d)| (v.id(), d)).collect()
    }

    #[test]
    fn test_bfs_chain_distances() {
        let g: CompactGraph = make_chain(5);
        let reached = Bfs::new(&g).source(0).collect_distances();
        assert_eq!(
            ids_and_distances(reached),
            vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]
        );
    }

    #[test]
    fn test_bfs_follows_outgoing_only_by_default() {
        let g: CompactGraph = make_chain(5);
        assert_eq!(Bfs::new(&g).source(4).run(Continue), 1);
        assert_eq!(Bfs::new(&g).source(4).bidirectional(true).run(Continue), 5);
    }

    #[test]
    fn test_bfs_missing_and_duplicate_sources() {
        let g: IndexedGraph = make_chain(4);
        assert_eq!(bfs(&g, [0, 0, 99], Continue, NoPrune, false), 4);
        assert_eq!(bfs(&g, [99], Continue, NoPrune, false), 0);
        assert_eq!(bfs(&g, Vec::new(), Continue, NoPrune, false), 0);
    }

    #[test]
    fn test_bfs_early_stop_counts_stopping_vertex() {
        let g: CompactGraph = make_chain(10);
        let mut indices = Vec::new();
        let count = Bfs::new(&g).source(0).visit_indexed(|_, index| {
            indices.push(index);
            index < 2
        });
        assert_eq!(count, 3);
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_bfs_within_limits_distance() {
        let g: CompactGraph = make_chain(10);
        let mut far = 0;
        let count = bfs_within(
            &g,
            [0],
            2,
            |_v: VertexHandle<'_, CompactGraph>, _: usize, distance: usize| {
                far = far.max(distance);
                true
            },
            false,
        );
        assert_eq!(count, 3);
        assert_eq!(far, 2);

        assert_eq!(bfs_within(&g, [0], 0, Continue, false), 1);
    }

    #[test]
    fn test_bfs_from_bidirectional() {
        let g: IndexedGraph = make_star(3);
        assert_eq!(bfs_from(&g, 2, Continue, false), 1);
        assert_eq!(bfs_from(&g, 2, Continue, true), 4);
    }

    #[test]
    fn test_prune_vertex() {
        let g: CompactGraph = make_star(6);
        let mut seen = Vec::new();
        Bfs::new(&g)
            .source(0)
            .prune_vertex(|v| v.id() % 2 == 1)
            .visit_vertices(|v| {
                seen.push(v.id());
                true
            });
        assert_eq!(seen, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_pruned_neighbor_reachable_over_other_edge() {
        let g: CompactGraph = make_diamond();
        let mut seen = Vec::new();
        let count = Bfs::new(&g)
            .source(0)
            .prune_edge(|_, e| e.id() == 12)
            .visit_vertices(|v| {
                seen.push(v.id());
                true
            });
        assert_eq!(count, 4);
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_neighbor_enqueued_once_over_parallel_paths() {
        let mut g: CompactGraph = make_diamond();
        g.insert_edge(0, 3, 0, 14);
        g.insert_edge(0, 3, 0, 15);
        let reached = Bfs::new(&g).source(0).collect_distances();
        assert_eq!(ids_and_distances(reached), vec![(0, 0), (1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn test_pruner_sees_expanding_vertex_position() {
        let g: CompactGraph = make_chain(4);
        let mut calls = Vec::new();
        let pruner = |n: VertexHandle<'_, CompactGraph>,
                      _e: EdgeHandle<'_, CompactGraph>,
                      index: usize,
                      distance: usize| {
            calls.push((n.id(), index, distance));
            false
        };
        bfs(&g, [0], Continue, pruner, false);
        assert_eq!(calls, vec![(1, 0, 0), (2, 1, 1), (3, 2, 2)]);
    }

    #[test]
    fn test_bidirectional_prunes_each_direction() {
        // 0 -> 1 and 2 -> 0: the second is only seen when expanding incoming edges.
        let mut g = CompactGraph::<crate::container::SortedVecFamily>::new();
        for v in 0..3 {
            g.insert_vertex(v, 0);
        }
        g.insert_edge(0, 1, 0, 1);
        g.insert_edge(2, 0, 0, 2);
        let mut pruned = Vec::new();
        let count = Bfs::new(&g)
            .source(0)
            .bidirectional(true)
            .prune_edge(|n, e| {
                pruned.push((n.id(), e.id()));
                true
            })
            .run(Continue);
        assert_eq!(count, 1);
        assert_eq!(pruned, vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_builder_combines_limit_and_pruner() {
        let g: IndexedGraph = make_chain(10);
        let count = Bfs::new(&g)
            .source(0)
            .max_distance(5)
            .prune_vertex(|v| v.id() == 4)
            .run(Continue);
        assert_eq!(count, 4);
    }

    #[test]
    fn test_adapters() {
        let g: CompactGraph = make_star(3);
        let mut first = None;
        let count = bfs(
            &g,
            [0],
            OnVertex(|v: VertexHandle<'_, CompactGraph>| {
                first.get_or_insert(v.id());
                false
            }),
            NoPrune,
            false,
        );
        assert_eq!(count, 1);
        assert_eq!(first, Some(0));

        let count = bfs(
            &g,
            [0],
            Continue,
            PruneEither(DistanceLimit(5), PruneVertex(|v: VertexHandle<'_, CompactGraph>| v.id() > 1)),
            false,
        );
        assert_eq!(count, 2);
    }

    #[test]
    fn test_dfs_preorder() {
        // 0 -> {1, 2}, 1 -> 3, 2 -> 4
        let mut g: CompactGraph = make_star(2);
        g.insert_vertex(3, 0);
        g.insert_vertex(4, 0);
        g.insert_edge(1, 3, 0, 3);
        g.insert_edge(2, 4, 0, 4);

        let mut order = Vec::new();
        let count = dfs(
            &g,
            [0],
            |v: VertexHandle<'_, CompactGraph>, index: usize, depth: usize| {
                order.push((v.id(), index, depth));
                true
            },
            NoPrune,
            false,
        );
        assert_eq!(count, 5);
        assert_eq!(
            order,
            vec![(0, 0, 0), (1, 1, 1), (3, 2, 2), (2, 3, 1), (4, 4, 2)]
        );
    }

    #[test]
    fn test_dfs_early_stop_and_prune() {
        let g: IndexedGraph = make_chain(6);
        assert_eq!(dfs(&g, [0], Continue, DistanceLimit(2), false), 3);
        let count = dfs(
            &g,
            [0],
            OnIndexed(|_v: VertexHandle<'_, IndexedGraph>, index: usize| index < 1),
            NoPrune,
            false,
        );
        assert_eq!(count, 2);
    }

    #[test]
    fn test_backends_agree() {
        let compact: CompactGraph = make_diamond();
        let indexed: IndexedGraph = make_diamond();
        for bidirectional in [false, true] {
            for source in 0..4 {
                let a = Bfs::new(&compact).source(source).bidirectional(bidirectional).collect_distances();
                let b = Bfs::new(&indexed).source(source).bidirectional(bidirectional).collect_distances();
                assert_eq!(ids_and_distances(a), ids_and_distances(b));
            }
        }
    }
}
