// SVG map of the network

pub mod map_renderer;
pub mod projector;
pub mod settings;
pub mod svg;

pub use map_renderer::MapRenderer;
pub use projector::SphereProjector;
pub use settings::{Color, RenderSettings};
