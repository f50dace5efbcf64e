//! Transit catalogue core: stops and bus routes, the routing graph built on top
//! of them, shortest-time itineraries, map rendering and binary snapshots.

pub mod error;
pub mod model;
pub mod persistence;
pub mod prelude;
pub mod query;
pub mod render;
pub mod routing;

pub use error::Error;
pub use model::{Bus, Catalogue, Coordinates, Stop};
pub use query::{QueryAnswer, StatRequest, TransitDatabase};
pub use render::{Color, MapRenderer, RenderSettings};
pub use routing::{CompletedRoute, RoutingSettings, TransportRouter};

/// Index of a stop in insertion order, doubles as the routing graph vertex id
pub type StopId = usize;
/// Graph vertex identifier (same numbering as [`StopId`])
pub type VertexId = usize;
/// Index of a bus route in insertion order
pub type BusId = usize;
/// Index of an edge in the routing graph
pub type EdgeId = usize;
/// Road distance in meters
pub type Meters = u32;
/// Travel time in minutes
pub type Minutes = f64;
