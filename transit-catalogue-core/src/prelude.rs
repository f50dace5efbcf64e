// Re-export key components
pub use crate::model::{Bus, Catalogue, Coordinates, Stop};
pub use crate::persistence::{SnapshotMode, load_snapshot, save_snapshot};
pub use crate::query::{BusStats, ItineraryLeg, QueryAnswer, StatRequest, TransitDatabase};
pub use crate::render::{Color, MapRenderer, RenderSettings};
pub use crate::routing::{CompletedRoute, RoutingSettings, TransportRouter};

// Core types
pub use crate::Error;
pub use crate::{BusId, Meters, Minutes, StopId, VertexId};
