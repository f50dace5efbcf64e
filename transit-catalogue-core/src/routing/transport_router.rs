//! Bus routing graph and itinerary queries
//!
//! Every bus contributes one edge per (boarding stop, alighting stop) pair
//! along its traversal. An edge costs the wait at the boarding stop plus the
//! ride time over all intermediate segments, so a single edge means "wait,
//! then ride N stops on one bus" and transfers fall out of chaining edges.

use log::{debug, info, trace, warn};

use super::graph::{DirectedWeightedGraph, Edge};
use super::router::Router;
use crate::{BusId, Catalogue, Error, Minutes, StopId, VertexId};

/// Weights below this are treated as a trivial (same stop) route
pub const ZERO_WEIGHT_EPSILON: Minutes = 1e-6;
/// km/h to m/min
const KMH_TO_METERS_PER_MINUTE: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutingSettings {
    bus_wait_time: u32,
    bus_velocity: u32,
}

impl RoutingSettings {
    pub const MAX_VALUE: i64 = 1000;

    /// Wait time in minutes and velocity in km/h, both within `0..=1000`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoutingSettings`] for values out of range
    pub fn new(bus_wait_time: i64, bus_velocity: i64) -> Result<Self, Error> {
        let check = |name: &str, value: i64| {
            if (0..=Self::MAX_VALUE).contains(&value) {
                u32::try_from(value).map_err(|e| {
                    Error::InvalidRoutingSettings(format!("{name} = {value}: {e}"))
                })
            } else {
                Err(Error::InvalidRoutingSettings(format!(
                    "{name} = {value}, expected 0..={}",
                    Self::MAX_VALUE
                )))
            }
        };
        Ok(Self {
            bus_wait_time: check("bus_wait_time", bus_wait_time)?,
            bus_velocity: check("bus_velocity", bus_velocity)?,
        })
    }

    /// Minutes spent waiting before each boarding
    pub fn bus_wait_time(&self) -> u32 {
        self.bus_wait_time
    }

    /// Bus speed in km/h
    pub fn bus_velocity(&self) -> u32 {
        self.bus_velocity
    }
}

/// What a graph edge stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeInfo {
    /// Boarding stop
    pub stop: StopId,
    pub bus: BusId,
    /// Number of stops ridden
    pub span_count: u32,
}

/// One boarding: wait at `stop`, then ride `span_count` stops on `bus`
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub stop: StopId,
    pub bus: BusId,
    pub wait_time: Minutes,
    pub ride_time: Minutes,
    pub span_count: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletedRoute {
    pub total_time: Minutes,
    pub lines: Vec<Line>,
}

/// Routing graph over the catalogue and the query engine on top of it.
///
/// The router refers to stops and buses by id only, it never borrows the
/// catalogue beyond a single call.
#[derive(Debug, Clone, Default)]
pub struct TransportRouter {
    settings: RoutingSettings,
    graph: Option<DirectedWeightedGraph>,
    /// Indexed by [`crate::EdgeId`]
    edges: Vec<EdgeInfo>,
    router: Option<Router>,
}

impl TransportRouter {
    pub fn new(settings: RoutingSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Reassembles a router from parts produced elsewhere (a snapshot)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if edge metadata does not match the graph
    pub fn from_parts(
        settings: RoutingSettings,
        graph: DirectedWeightedGraph,
        edges: Vec<EdgeInfo>,
        router: Router,
    ) -> Result<Self, Error> {
        if edges.len() != graph.edge_count() {
            return Err(Error::Format(format!(
                "{} edge descriptions for {} graph edges",
                edges.len(),
                graph.edge_count()
            )));
        }
        Ok(Self {
            settings,
            graph: Some(graph),
            edges,
            router: Some(router),
        })
    }

    pub fn settings(&self) -> RoutingSettings {
        self.settings
    }

    pub fn is_built(&self) -> bool {
        self.graph.is_some() && self.router.is_some()
    }

    pub fn graph(&self) -> Option<&DirectedWeightedGraph> {
        self.graph.as_ref()
    }

    pub fn router(&self) -> Option<&Router> {
        self.router.as_ref()
    }

    /// Edge metadata in edge id order
    pub fn edges_info(&self) -> &[EdgeInfo] {
        &self.edges
    }

    /// Builds the routing graph and precomputes all shortest paths
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphAlreadyBuilt`] when called a second time
    pub fn build(&mut self, catalogue: &Catalogue) -> Result<(), Error> {
        self.build_graph(catalogue)?;
        if let Some(graph) = &self.graph {
            self.router = Some(Router::new(graph));
        }
        Ok(())
    }

    fn build_graph(&mut self, catalogue: &Catalogue) -> Result<(), Error> {
        if self.graph.is_some() {
            return Err(Error::GraphAlreadyBuilt);
        }

        let mut graph = DirectedWeightedGraph::with_vertex_count(catalogue.vertex_count());
        let mut edges = Vec::new();

        if self.settings.bus_velocity == 0 {
            warn!("Bus velocity is 0, buses never arrive and no ride edges are created");
        } else {
            let meters_per_minute =
                f64::from(self.settings.bus_velocity) * KMH_TO_METERS_PER_MINUTE;
            let wait_time = f64::from(self.settings.bus_wait_time);

            for bus in catalogue.buses() {
                if bus.stops.len() < 2 {
                    continue;
                }
                let before = edges.len();
                for (board_pos, &board_stop) in bus.stops.iter().enumerate() {
                    let mut time = wait_time;
                    for alight_pos in board_pos + 1..bus.stops.len() {
                        let prev_stop = bus.stops[alight_pos - 1];
                        let alight_stop = bus.stops[alight_pos];
                        time += f64::from(catalogue.distance(prev_stop, alight_stop))
                            / meters_per_minute;

                        let edge_id = graph.add_edge(Edge {
                            from: board_stop,
                            to: alight_stop,
                            weight: time,
                        });
                        debug_assert_eq!(edge_id, edges.len());
                        #[allow(clippy::cast_possible_truncation)]
                        edges.push(EdgeInfo {
                            stop: board_stop,
                            bus: bus.id,
                            span_count: (alight_pos - board_pos) as u32,
                        });
                    }
                }
                trace!("Bus {} contributed {} edges", bus.name, edges.len() - before);
            }
        }

        info!(
            "Routing graph built: {} vertices, {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        self.graph = Some(graph);
        self.edges = edges;
        Ok(())
    }

    /// Fastest itinerary between two stops
    ///
    /// Returns `Ok(None)` when the target cannot be reached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphNotBuilt`] before [`TransportRouter::build`]
    pub fn compute_route(
        &self,
        from: VertexId,
        to: VertexId,
    ) -> Result<Option<CompletedRoute>, Error> {
        let (Some(graph), Some(router)) = (&self.graph, &self.router) else {
            return Err(Error::GraphNotBuilt);
        };

        let Some(route) = router.build_route(graph, from, to) else {
            debug!("No route from vertex {from} to vertex {to}");
            return Ok(None);
        };

        if route.weight < ZERO_WEIGHT_EPSILON {
            return Ok(Some(CompletedRoute::default()));
        }

        let wait_time = f64::from(self.settings.bus_wait_time);
        let lines = route
            .edges
            .iter()
            .map(|&edge_id| {
                let info = self.edges.get(edge_id).ok_or(Error::IndexOutOfRange {
                    kind: "edge descriptions",
                    index: edge_id,
                    len: self.edges.len(),
                })?;
                let edge = graph.edge(edge_id).ok_or(Error::IndexOutOfRange {
                    kind: "graph edges",
                    index: edge_id,
                    len: graph.edge_count(),
                })?;
                Ok(Line {
                    stop: info.stop,
                    bus: info.bus,
                    wait_time,
                    ride_time: edge.weight - wait_time,
                    span_count: info.span_count,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Some(CompletedRoute {
            total_time: route.weight,
            lines,
        }))
    }
}
