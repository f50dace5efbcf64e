// Routing graph construction and shortest-time itineraries

pub mod graph;
pub mod router;
mod state;
pub mod transport_router;

pub use graph::{DirectedWeightedGraph, Edge};
pub use router::{RouteInfo, RouteInternalData, Router, RoutesInternalData};
pub use transport_router::{
    CompletedRoute, EdgeInfo, Line, RoutingSettings, TransportRouter, ZERO_WEIGHT_EPSILON,
};
