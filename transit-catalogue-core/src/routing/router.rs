//! All-pairs shortest paths over a [`DirectedWeightedGraph`]
//!
//! The router runs Dijkstra once per source vertex and keeps, for every
//! reachable target, the best weight and the last edge of the best path.
//! Paths are rebuilt by walking those edges backwards.

use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use log::info;
use rayon::prelude::*;

use super::graph::DirectedWeightedGraph;
use super::state::State;
use crate::{EdgeId, Error, Minutes, VertexId};

/// Relative slack when checking stored path weights
const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Best known path from a fixed source to one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteInternalData {
    pub weight: Minutes,
    /// `None` only for the source itself
    pub prev_edge: Option<EdgeId>,
}

/// `data[from][to]`, `None` when `to` is unreachable from `from`
pub type RoutesInternalData = Vec<Vec<Option<RouteInternalData>>>;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    pub weight: Minutes,
    pub edges: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
pub struct Router {
    routes_internal_data: RoutesInternalData,
}

impl Router {
    /// Precomputes shortest paths between every pair of vertices
    pub fn new(graph: &DirectedWeightedGraph) -> Self {
        let vertex_count = graph.vertex_count();
        info!(
            "Precomputing shortest paths for {vertex_count} vertices and {} edges",
            graph.edge_count()
        );

        let routes_internal_data = (0..vertex_count)
            .into_par_iter()
            .map(|source| shortest_path_tree(graph, source))
            .collect();

        Self {
            routes_internal_data,
        }
    }

    /// Restores a router from a previously computed table
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the table does not describe `graph`
    pub fn from_internal_data(
        graph: &DirectedWeightedGraph,
        routes_internal_data: RoutesInternalData,
    ) -> Result<Self, Error> {
        let vertex_count = graph.vertex_count();
        if routes_internal_data.len() != vertex_count {
            return Err(Error::Format(format!(
                "router table has {} rows for {vertex_count} vertices",
                routes_internal_data.len()
            )));
        }

        for (from, row) in routes_internal_data.iter().enumerate() {
            if row.len() != vertex_count {
                return Err(Error::Format(format!(
                    "router row {from} has {} entries for {vertex_count} vertices",
                    row.len()
                )));
            }
            let source = RouteInternalData {
                weight: 0.0,
                prev_edge: None,
            };
            if row[from] != Some(source) {
                return Err(Error::Format(format!(
                    "router row {from} does not start at its own vertex"
                )));
            }
            for (to, data) in row.iter().enumerate() {
                let Some(data) = data else {
                    continue;
                };
                if to == from {
                    continue;
                }
                let prev_edge = data.prev_edge.ok_or_else(|| {
                    Error::Format(format!("router entry {from} -> {to} has no last edge"))
                })?;
                let edge = graph.edge(prev_edge).ok_or(Error::IndexOutOfRange {
                    kind: "graph edges",
                    index: prev_edge,
                    len: graph.edge_count(),
                })?;
                let Some(previous) = row[edge.from].filter(|_| edge.to == to) else {
                    return Err(Error::Format(format!(
                        "router entry {from} -> {to} points at unrelated edge {prev_edge}"
                    )));
                };
                let expected = previous.weight + edge.weight;
                if (expected - data.weight).abs() > WEIGHT_TOLERANCE * expected.max(1.0) {
                    return Err(Error::Format(format!(
                        "router entry {from} -> {to} has weight {}, its path costs {expected}",
                        data.weight
                    )));
                }
            }
        }

        Ok(Self {
            routes_internal_data,
        })
    }

    pub fn internal_data(&self) -> &RoutesInternalData {
        &self.routes_internal_data
    }

    /// Optimal path between two vertices, `None` if there is none
    pub fn build_route(
        &self,
        graph: &DirectedWeightedGraph,
        from: VertexId,
        to: VertexId,
    ) -> Option<RouteInfo> {
        let row = self.routes_internal_data.get(from)?;
        let data = (*row.get(to)?)?;

        let mut edges = Vec::new();
        let mut prev_edge = data.prev_edge;
        while let Some(edge_id) = prev_edge {
            // a valid path never repeats an edge
            if edges.len() > graph.edge_count() {
                log::error!("Cycle in router table between {from} and {to}");
                return None;
            }
            edges.push(edge_id);
            let edge = graph.edge(edge_id)?;
            prev_edge = row[edge.from].and_then(|data| data.prev_edge);
        }
        edges.reverse();

        Some(RouteInfo {
            weight: data.weight,
            edges,
        })
    }
}

/// Dijkstra from one source over the whole graph
fn shortest_path_tree(
    graph: &DirectedWeightedGraph,
    source: VertexId,
) -> Vec<Option<RouteInternalData>> {
    let vertex_count = graph.vertex_count();
    let mut tree: Vec<Option<RouteInternalData>> = vec![None; vertex_count];
    let mut settled = FixedBitSet::with_capacity(vertex_count);
    let mut heap = BinaryHeap::new();

    tree[source] = Some(RouteInternalData {
        weight: 0.0,
        prev_edge: None,
    });
    heap.push(State {
        cost: 0.0,
        node: source,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if settled.put(node) {
            continue;
        }

        for (edge_id, next, weight) in graph.outgoing(node) {
            if settled.contains(next) {
                continue;
            }
            let next_cost = cost + weight;
            let improves = tree[next].is_none_or(|best| next_cost < best.weight);
            if improves {
                tree[next] = Some(RouteInternalData {
                    weight: next_cost,
                    prev_edge: Some(edge_id),
                });
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    tree
}
