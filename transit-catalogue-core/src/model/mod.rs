//! Data model of the transit network
//!
//! Contains stops, bus routes and the catalogue that owns them.

pub mod catalogue;
pub mod coordinates;
pub mod domain;

pub use catalogue::Catalogue;
pub use coordinates::{Coordinates, compute_distance};
pub use domain::{Bus, Stop};
