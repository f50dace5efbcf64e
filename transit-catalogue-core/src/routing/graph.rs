//! Directed weighted graph used by the router

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::{EdgeId, Minutes, VertexId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: Minutes,
}

/// Vertices are created up front; edges are append-only and numbered densely
/// in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DirectedWeightedGraph {
    graph: DiGraph<(), Minutes>,
}

impl DirectedWeightedGraph {
    pub fn with_vertex_count(vertex_count: usize) -> Self {
        let mut graph = DiGraph::with_capacity(vertex_count, 0);
        for _ in 0..vertex_count {
            graph.add_node(());
        }
        Self { graph }
    }

    /// # Panics
    ///
    /// If either endpoint is not a vertex of the graph
    pub fn add_edge(&mut self, edge: Edge) -> EdgeId {
        self.graph
            .add_edge(NodeIndex::new(edge.from), NodeIndex::new(edge.to), edge.weight)
            .index()
    }

    pub fn edge(&self, id: EdgeId) -> Option<Edge> {
        let index = EdgeIndex::new(id);
        let (from, to) = self.graph.edge_endpoints(index)?;
        Some(Edge {
            from: from.index(),
            to: to.index(),
            weight: self.graph[index],
        })
    }

    /// All edges in id order
    pub fn edges(&self) -> impl ExactSizeIterator<Item = Edge> + '_ {
        self.graph.raw_edges().iter().map(|edge| Edge {
            from: edge.source().index(),
            to: edge.target().index(),
            weight: edge.weight,
        })
    }

    /// Outgoing edges of a vertex as `(edge id, target, weight)`
    pub(crate) fn outgoing(
        &self,
        vertex: VertexId,
    ) -> impl Iterator<Item = (EdgeId, VertexId, Minutes)> + '_ {
        self.graph
            .edges(NodeIndex::new(vertex))
            .map(|edge| (edge.id().index(), edge.target().index(), *edge.weight()))
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
