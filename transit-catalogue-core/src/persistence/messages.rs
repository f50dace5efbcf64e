//! Protobuf schema of a snapshot
//!
//! Stops and buses are written in name order and every cross-reference to a
//! stop or a bus is a position in that order. Graph vertices keep their own
//! numbering, which each stop carries as `vertex_id`.

use prost::Message;

/// Top-level snapshot message
#[derive(Clone, PartialEq, Message)]
pub struct Snapshot {
    #[prost(uint32, tag = "1")]
    pub version: u32,

    #[prost(message, optional, tag = "2")]
    pub catalogue: Option<Catalogue>,

    #[prost(message, optional, tag = "3")]
    pub render_settings: Option<RenderSettings>,

    #[prost(message, optional, tag = "4")]
    pub router: Option<Router>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Catalogue {
    /// Sorted by name
    #[prost(message, repeated, tag = "1")]
    pub stops: Vec<Stop>,

    /// Sorted by name
    #[prost(message, repeated, tag = "2")]
    pub buses: Vec<Bus>,

    /// Sorted by (from, to)
    #[prost(message, repeated, tag = "3")]
    pub distances: Vec<Distance>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Stop {
    #[prost(string, tag = "1")]
    pub name: String,

    #[prost(double, tag = "2")]
    pub lat: f64,

    #[prost(double, tag = "3")]
    pub lng: f64,

    #[prost(uint64, tag = "4")]
    pub vertex_id: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct Bus {
    #[prost(string, tag = "1")]
    pub name: String,

    #[prost(bool, tag = "2")]
    pub is_roundtrip: bool,

    /// Declared stops only: a linear route keeps its forward half
    #[prost(uint64, repeated, tag = "3")]
    pub stops: Vec<u64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Distance {
    #[prost(uint64, tag = "1")]
    pub from: u64,

    #[prost(uint64, tag = "2")]
    pub to: u64,

    #[prost(uint32, tag = "3")]
    pub meters: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct RenderSettings {
    #[prost(double, tag = "1")]
    pub width: f64,
    #[prost(double, tag = "2")]
    pub height: f64,
    #[prost(double, tag = "3")]
    pub padding: f64,
    #[prost(double, tag = "4")]
    pub line_width: f64,
    #[prost(double, tag = "5")]
    pub stop_radius: f64,
    #[prost(double, tag = "6")]
    pub bus_label_font_size: f64,
    #[prost(double, tag = "7")]
    pub bus_label_offset_x: f64,
    #[prost(double, tag = "8")]
    pub bus_label_offset_y: f64,
    #[prost(double, tag = "9")]
    pub stop_label_font_size: f64,
    #[prost(double, tag = "10")]
    pub stop_label_offset_x: f64,
    #[prost(double, tag = "11")]
    pub stop_label_offset_y: f64,
    #[prost(message, optional, tag = "12")]
    pub underlayer_color: Option<Color>,
    #[prost(double, tag = "13")]
    pub underlayer_width: f64,
    #[prost(message, repeated, tag = "14")]
    pub color_palette: Vec<Color>,
}

/// Absent `kind` means no paint
#[derive(Clone, PartialEq, Message)]
pub struct Color {
    #[prost(oneof = "color::Kind", tags = "1, 2, 3")]
    pub kind: Option<color::Kind>,
}

pub mod color {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Kind {
        #[prost(string, tag = "1")]
        Named(String),
        #[prost(message, tag = "2")]
        Rgb(super::Rgb),
        #[prost(message, tag = "3")]
        Rgba(super::Rgba),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct Rgb {
    #[prost(uint32, tag = "1")]
    pub red: u32,
    #[prost(uint32, tag = "2")]
    pub green: u32,
    #[prost(uint32, tag = "3")]
    pub blue: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct Rgba {
    #[prost(uint32, tag = "1")]
    pub red: u32,
    #[prost(uint32, tag = "2")]
    pub green: u32,
    #[prost(uint32, tag = "3")]
    pub blue: u32,
    #[prost(double, tag = "4")]
    pub opacity: f64,
}

#[derive(Clone, PartialEq, Message)]
pub struct Router {
    #[prost(message, optional, tag = "1")]
    pub settings: Option<RoutingSettings>,

    /// Present only in snapshots that skip the rebuild on load
    #[prost(message, optional, tag = "2")]
    pub graph: Option<Graph>,
}

#[derive(Clone, PartialEq, Message)]
pub struct RoutingSettings {
    #[prost(uint32, tag = "1")]
    pub bus_wait_time: u32,
    #[prost(uint32, tag = "2")]
    pub bus_velocity: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct Graph {
    #[prost(uint64, tag = "1")]
    pub vertex_count: u64,

    /// In edge id order
    #[prost(message, repeated, tag = "2")]
    pub edges: Vec<Edge>,

    /// Parallel to `edges`
    #[prost(message, repeated, tag = "3")]
    pub edge_infos: Vec<EdgeInfo>,

    /// One row per source vertex
    #[prost(message, repeated, tag = "4")]
    pub routes: Vec<RouteRow>,
}

/// Endpoints are vertex ids
#[derive(Clone, PartialEq, Message)]
pub struct Edge {
    #[prost(uint64, tag = "1")]
    pub from: u64,
    #[prost(uint64, tag = "2")]
    pub to: u64,
    #[prost(double, tag = "3")]
    pub weight: f64,
}

#[derive(Clone, PartialEq, Message)]
pub struct EdgeInfo {
    /// Position in the sorted stop list
    #[prost(uint64, tag = "1")]
    pub stop: u64,
    /// Position in the sorted bus list
    #[prost(uint64, tag = "2")]
    pub bus: u64,
    #[prost(uint32, tag = "3")]
    pub span_count: u32,
}

/// Reachable targets of one source vertex, ordered by target
#[derive(Clone, PartialEq, Message)]
pub struct RouteRow {
    #[prost(message, repeated, tag = "1")]
    pub entries: Vec<RouteEntry>,
}

#[derive(Clone, PartialEq, Message)]
pub struct RouteEntry {
    #[prost(uint64, tag = "1")]
    pub target: u64,
    #[prost(double, tag = "2")]
    pub weight: f64,
    #[prost(uint64, optional, tag = "3")]
    pub prev_edge: Option<u64>,
}
