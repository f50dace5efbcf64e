//! Conversion between in-memory state and snapshot bytes

use geo::Coord;
use log::{debug, info};
use prost::Message;

use super::messages as pb;
use crate::render::{Color, RenderSettings};
use crate::routing::{
    DirectedWeightedGraph, Edge, EdgeInfo, RouteInternalData, Router, RoutesInternalData,
    RoutingSettings, TransportRouter,
};
use crate::{BusId, Catalogue, Coordinates, Error, StopId};

pub const FORMAT_VERSION: u32 = 1;

/// What a snapshot carries besides the catalogue and settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotMode {
    /// The routing graph is rebuilt after loading
    CatalogueOnly,
    /// The graph and the precomputed shortest paths are stored as well
    #[default]
    WithGraph,
}

/// Everything a snapshot restores
#[derive(Debug, Clone)]
pub struct Restored {
    pub catalogue: Catalogue,
    pub render_settings: RenderSettings,
    pub router: TransportRouter,
}

/// Encodes the catalogue, render settings and router into snapshot bytes
///
/// # Errors
///
/// Returns [`Error::GraphNotBuilt`] if `mode` asks for the graph but the
/// router has not been built
pub fn serialize(
    catalogue: &Catalogue,
    render_settings: &RenderSettings,
    router: &TransportRouter,
    mode: SnapshotMode,
) -> Result<Vec<u8>, Error> {
    let positions = Positions::new(catalogue);

    let graph = match mode {
        SnapshotMode::CatalogueOnly => None,
        SnapshotMode::WithGraph => Some(graph_to_message(router, &positions)?),
    };

    let snapshot = pb::Snapshot {
        version: FORMAT_VERSION,
        catalogue: Some(catalogue_to_message(catalogue, &positions)),
        render_settings: Some(render_settings_to_message(render_settings)),
        router: Some(pb::Router {
            settings: Some(routing_settings_to_message(router.settings())),
            graph,
        }),
    };

    let bytes = snapshot.encode_to_vec();
    info!(
        "Snapshot encoded: {} stops, {} buses, {} bytes ({mode:?})",
        catalogue.stop_count(),
        catalogue.bus_count(),
        bytes.len()
    );
    Ok(bytes)
}

/// Decodes snapshot bytes. Without a stored graph the router is rebuilt.
///
/// # Errors
///
/// Returns [`Error::Decode`] for bytes that are not a snapshot,
/// [`Error::Format`] for a version mismatch or inconsistent content and
/// [`Error::IndexOutOfRange`] for dangling cross-references
pub fn deserialize(bytes: &[u8]) -> Result<Restored, Error> {
    let snapshot = pb::Snapshot::decode(bytes)?;
    if snapshot.version != FORMAT_VERSION {
        return Err(Error::Format(format!(
            "snapshot version {}, expected {FORMAT_VERSION}",
            snapshot.version
        )));
    }

    let catalogue = snapshot
        .catalogue
        .map(catalogue_from_message)
        .transpose()?
        .unwrap_or_default();
    let render_settings = snapshot
        .render_settings
        .map(render_settings_from_message)
        .unwrap_or_default();

    let pb::Router { settings, graph } = snapshot.router.unwrap_or_default();
    let settings = settings
        .map(routing_settings_from_message)
        .transpose()?
        .unwrap_or_default();

    let router = match graph {
        Some(graph) => graph_from_message(graph, settings, &catalogue)?,
        None => {
            debug!("Snapshot has no routing graph, rebuilding");
            let mut router = TransportRouter::new(settings);
            router.build(&catalogue)?;
            router
        }
    };

    info!(
        "Snapshot decoded: {} stops, {} buses, {} bytes",
        catalogue.stop_count(),
        catalogue.bus_count(),
        bytes.len()
    );

    Ok(Restored {
        catalogue,
        render_settings,
        router,
    })
}

/// Sorted positions of every stop and bus, indexed by id
struct Positions {
    sorted_stops: Vec<StopId>,
    stop_position: Vec<usize>,
    bus_position: Vec<usize>,
}

impl Positions {
    fn new(catalogue: &Catalogue) -> Self {
        let sorted_stops = catalogue.sorted_stops();
        let mut stop_position = vec![0; sorted_stops.len()];
        for (position, &stop) in sorted_stops.iter().enumerate() {
            stop_position[stop] = position;
        }
        let mut bus_position = vec![0; catalogue.bus_count()];
        for (position, &bus) in catalogue.sorted_bus_ids().iter().enumerate() {
            bus_position[bus] = position;
        }
        Self {
            sorted_stops,
            stop_position,
            bus_position,
        }
    }

    fn stop(&self, id: StopId) -> u64 {
        self.stop_position[id] as u64
    }

    fn bus(&self, id: BusId) -> u64 {
        self.bus_position[id] as u64
    }
}

/// Checked conversion of a stored index
fn checked_index(value: u64, kind: &'static str, len: usize) -> Result<usize, Error> {
    usize::try_from(value)
        .ok()
        .filter(|&index| index < len)
        .ok_or(Error::IndexOutOfRange {
            kind,
            index: usize::try_from(value).unwrap_or(usize::MAX),
            len,
        })
}

fn catalogue_to_message(catalogue: &Catalogue, positions: &Positions) -> pb::Catalogue {
    let stops = positions
        .sorted_stops
        .iter()
        .filter_map(|&id| catalogue.stop(id))
        .map(|stop| pb::Stop {
            name: stop.name.clone(),
            lat: stop.coordinates.lat,
            lng: stop.coordinates.lng,
            vertex_id: stop.vertex_id as u64,
        })
        .collect();

    let buses = catalogue
        .buses()
        .map(|bus| pb::Bus {
            name: bus.name.clone(),
            is_roundtrip: bus.is_roundtrip,
            stops: bus
                .declared_stops()
                .iter()
                .map(|&stop| positions.stop(stop))
                .collect(),
        })
        .collect();

    let mut distances: Vec<pb::Distance> = catalogue
        .distances()
        .map(|((from, to), meters)| pb::Distance {
            from: positions.stop(from),
            to: positions.stop(to),
            meters,
        })
        .collect();
    distances.sort_unstable_by_key(|distance| (distance.from, distance.to));

    pb::Catalogue {
        stops,
        buses,
        distances,
    }
}

fn catalogue_from_message(message: pb::Catalogue) -> Result<Catalogue, Error> {
    let stop_count = message.stops.len();
    if let Some(pair) = message
        .stops
        .windows(2)
        .find(|pair| (&pair[0].name, pair[0].vertex_id) >= (&pair[1].name, pair[1].vertex_id))
    {
        return Err(Error::Format(format!(
            "stop {:?} is stored before {:?}",
            pair[0].name, pair[1].name
        )));
    }
    if let Some(pair) = message.buses.windows(2).find(|pair| pair[0].name >= pair[1].name) {
        return Err(Error::Format(format!(
            "bus {:?} is stored before {:?}",
            pair[0].name, pair[1].name
        )));
    }

    // stops are added in vertex order, every vertex id used exactly once
    let mut by_vertex: Vec<Option<pb::Stop>> = vec![None; stop_count];
    for stop in message.stops {
        let vertex = checked_index(stop.vertex_id, "stop vertices", stop_count)?;
        if by_vertex[vertex].is_some() {
            return Err(Error::Format(format!(
                "vertex id {vertex} is used by more than one stop"
            )));
        }
        by_vertex[vertex] = Some(stop);
    }

    let mut catalogue = Catalogue::new();
    for stop in by_vertex.into_iter().flatten() {
        catalogue.add_stop(stop.name, Coordinates::new(stop.lat, stop.lng));
    }

    let sorted_stops = catalogue.sorted_stops();
    let stop_at = |position: u64| {
        checked_index(position, "stops", sorted_stops.len()).map(|index| sorted_stops[index])
    };

    for distance in message.distances {
        let from = stop_at(distance.from)?;
        let to = stop_at(distance.to)?;
        catalogue.set_distance_by_id(from, to, distance.meters);
    }

    for bus in message.buses {
        let stops = bus
            .stops
            .iter()
            .map(|&position| stop_at(position))
            .collect::<Result<Vec<_>, Error>>()?;
        catalogue.add_bus_by_ids(&bus.name, stops, bus.is_roundtrip)?;
    }

    Ok(catalogue)
}

fn color_to_message(color: &Color) -> pb::Color {
    let kind = match color {
        Color::None => None,
        Color::Named(name) => Some(pb::color::Kind::Named(name.clone())),
        Color::Rgb { red, green, blue } => Some(pb::color::Kind::Rgb(pb::Rgb {
            red: u32::from(*red),
            green: u32::from(*green),
            blue: u32::from(*blue),
        })),
        Color::Rgba {
            red,
            green,
            blue,
            opacity,
        } => Some(pb::color::Kind::Rgba(pb::Rgba {
            red: u32::from(*red),
            green: u32::from(*green),
            blue: u32::from(*blue),
            opacity: *opacity,
        })),
    };
    pb::Color { kind }
}

fn color_from_message(message: pb::Color) -> Color {
    // channels were written from u8
    let channel = |value: u32| u8::try_from(value).unwrap_or(u8::MAX);
    match message.kind {
        None => Color::None,
        Some(pb::color::Kind::Named(name)) => Color::Named(name),
        Some(pb::color::Kind::Rgb(rgb)) => Color::Rgb {
            red: channel(rgb.red),
            green: channel(rgb.green),
            blue: channel(rgb.blue),
        },
        Some(pb::color::Kind::Rgba(rgba)) => Color::Rgba {
            red: channel(rgba.red),
            green: channel(rgba.green),
            blue: channel(rgba.blue),
            opacity: rgba.opacity,
        },
    }
}

fn render_settings_to_message(settings: &RenderSettings) -> pb::RenderSettings {
    pb::RenderSettings {
        width: settings.width,
        height: settings.height,
        padding: settings.padding,
        line_width: settings.line_width,
        stop_radius: settings.stop_radius,
        bus_label_font_size: settings.bus_label_font_size,
        bus_label_offset_x: settings.bus_label_offset.x,
        bus_label_offset_y: settings.bus_label_offset.y,
        stop_label_font_size: settings.stop_label_font_size,
        stop_label_offset_x: settings.stop_label_offset.x,
        stop_label_offset_y: settings.stop_label_offset.y,
        underlayer_color: Some(color_to_message(&settings.underlayer_color)),
        underlayer_width: settings.underlayer_width,
        color_palette: settings.color_palette.iter().map(color_to_message).collect(),
    }
}

fn render_settings_from_message(message: pb::RenderSettings) -> RenderSettings {
    RenderSettings {
        width: message.width,
        height: message.height,
        padding: message.padding,
        line_width: message.line_width,
        stop_radius: message.stop_radius,
        bus_label_font_size: message.bus_label_font_size,
        bus_label_offset: Coord {
            x: message.bus_label_offset_x,
            y: message.bus_label_offset_y,
        },
        stop_label_font_size: message.stop_label_font_size,
        stop_label_offset: Coord {
            x: message.stop_label_offset_x,
            y: message.stop_label_offset_y,
        },
        underlayer_color: message
            .underlayer_color
            .map(color_from_message)
            .unwrap_or_default(),
        underlayer_width: message.underlayer_width,
        color_palette: message
            .color_palette
            .into_iter()
            .map(color_from_message)
            .collect(),
    }
}

fn routing_settings_to_message(settings: RoutingSettings) -> pb::RoutingSettings {
    pb::RoutingSettings {
        bus_wait_time: settings.bus_wait_time(),
        bus_velocity: settings.bus_velocity(),
    }
}

fn routing_settings_from_message(message: pb::RoutingSettings) -> Result<RoutingSettings, Error> {
    RoutingSettings::new(
        i64::from(message.bus_wait_time),
        i64::from(message.bus_velocity),
    )
    .map_err(|e| Error::Format(format!("stored routing settings: {e}")))
}

fn graph_to_message(router: &TransportRouter, positions: &Positions) -> Result<pb::Graph, Error> {
    let (Some(graph), Some(shortest_paths)) = (router.graph(), router.router()) else {
        return Err(Error::GraphNotBuilt);
    };

    let edges = graph
        .edges()
        .map(|edge| pb::Edge {
            from: edge.from as u64,
            to: edge.to as u64,
            weight: edge.weight,
        })
        .collect();

    let edge_infos = router
        .edges_info()
        .iter()
        .map(|info| pb::EdgeInfo {
            stop: positions.stop(info.stop),
            bus: positions.bus(info.bus),
            span_count: info.span_count,
        })
        .collect();

    let routes = shortest_paths
        .internal_data()
        .iter()
        .map(|row| pb::RouteRow {
            entries: row
                .iter()
                .enumerate()
                .filter_map(|(target, data)| {
                    data.map(|data| pb::RouteEntry {
                        target: target as u64,
                        weight: data.weight,
                        prev_edge: data.prev_edge.map(|edge| edge as u64),
                    })
                })
                .collect(),
        })
        .collect();

    Ok(pb::Graph {
        vertex_count: graph.vertex_count() as u64,
        edges,
        edge_infos,
        routes,
    })
}

fn graph_from_message(
    message: pb::Graph,
    settings: RoutingSettings,
    catalogue: &Catalogue,
) -> Result<TransportRouter, Error> {
    let vertex_count = catalogue.vertex_count();
    if message.vertex_count != vertex_count as u64 {
        return Err(Error::Format(format!(
            "graph has {} vertices for {vertex_count} stops",
            message.vertex_count
        )));
    }

    let mut graph = DirectedWeightedGraph::with_vertex_count(vertex_count);
    for edge in message.edges {
        let from = checked_index(edge.from, "graph vertices", vertex_count)?;
        let to = checked_index(edge.to, "graph vertices", vertex_count)?;
        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return Err(Error::Format(format!(
                "edge {from} -> {to} has weight {}",
                edge.weight
            )));
        }
        graph.add_edge(Edge {
            from,
            to,
            weight: edge.weight,
        });
    }

    let sorted_stops = catalogue.sorted_stops();
    let sorted_buses = catalogue.sorted_bus_ids();
    let edges = message
        .edge_infos
        .into_iter()
        .map(|info| {
            let stop = checked_index(info.stop, "stops", sorted_stops.len())?;
            let bus = checked_index(info.bus, "buses", sorted_buses.len())?;
            Ok(EdgeInfo {
                stop: sorted_stops[stop],
                bus: sorted_buses[bus],
                span_count: info.span_count,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let mut table: RoutesInternalData = Vec::with_capacity(message.routes.len());
    for row in message.routes {
        let mut entries = vec![None; vertex_count];
        for entry in row.entries {
            let target = checked_index(entry.target, "graph vertices", vertex_count)?;
            let prev_edge = entry
                .prev_edge
                .map(|edge| checked_index(edge, "graph edges", graph.edge_count()))
                .transpose()?;
            entries[target] = Some(RouteInternalData {
                weight: entry.weight,
                prev_edge,
            });
        }
        table.push(entries);
    }

    let shortest_paths = Router::from_internal_data(&graph, table)?;
    debug!(
        "Restored routing graph with {} edges",
        graph.edge_count()
    );
    TransportRouter::from_parts(settings, graph, edges, shortest_paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database() -> (Catalogue, RenderSettings, TransportRouter) {
        let mut catalogue = Catalogue::new();
        catalogue.add_stop("Zoo", Coordinates::new(55.6, 37.2));
        catalogue.add_stop("Airport", Coordinates::new(55.61, 37.21));
        catalogue.add_stop("Market", Coordinates::new(55.62, 37.19));
        catalogue.set_distance("Zoo", "Airport", 1200).unwrap();
        catalogue.set_distance("Market", "Zoo", 900).unwrap();
        catalogue.add_bus("750", &["Zoo", "Airport", "Market"], false).unwrap();
        catalogue.add_bus("101", &["Market", "Zoo", "Market"], true).unwrap();

        let render_settings = RenderSettings {
            width: 600.0,
            underlayer_color: Color::Rgba {
                red: 255,
                green: 255,
                blue: 255,
                opacity: 0.85,
            },
            color_palette: vec![Color::Named("green".into()), Color::None],
            ..RenderSettings::default()
        };

        let mut router = TransportRouter::new(RoutingSettings::new(6, 40).unwrap());
        router.build(&catalogue).unwrap();
        (catalogue, render_settings, router)
    }

    #[test]
    fn catalogue_survives_round_trip() {
        let (catalogue, render_settings, router) = database();
        let bytes =
            serialize(&catalogue, &render_settings, &router, SnapshotMode::CatalogueOnly).unwrap();
        let restored = deserialize(&bytes).unwrap();

        assert_eq!(restored.render_settings, render_settings);
        assert_eq!(restored.router.settings(), router.settings());
        assert!(restored.router.is_built());
        assert_eq!(restored.catalogue.stops(), catalogue.stops());
        for bus in catalogue.buses() {
            let copy = restored.catalogue.get_bus_info(&bus.name).unwrap();
            assert_eq!(copy.stops, bus.stops);
            assert_eq!(copy.route_length, bus.route_length);
            assert_eq!(copy.unique_stop_count, bus.unique_stop_count);
        }
        assert_eq!(restored.catalogue.get_distance("Airport", "Zoo"), Some(1200));
    }

    #[test]
    fn graph_mode_requires_built_router() {
        let (catalogue, render_settings, _) = database();
        let router = TransportRouter::new(RoutingSettings::default());
        let result = serialize(&catalogue, &render_settings, &router, SnapshotMode::WithGraph);
        assert!(matches!(result, Err(Error::GraphNotBuilt)));
    }

    #[test]
    fn rejects_other_versions() {
        let bytes = pb::Snapshot {
            version: FORMAT_VERSION + 1,
            ..pb::Snapshot::default()
        }
        .encode_to_vec();
        assert!(matches!(deserialize(&bytes), Err(Error::Format(_))));
    }

    #[test]
    fn rejects_dangling_stop_reference() {
        let snapshot = pb::Snapshot {
            version: FORMAT_VERSION,
            catalogue: Some(pb::Catalogue {
                stops: vec![pb::Stop {
                    name: "Only".into(),
                    lat: 1.0,
                    lng: 1.0,
                    vertex_id: 0,
                }],
                buses: vec![pb::Bus {
                    name: "1".into(),
                    is_roundtrip: true,
                    stops: vec![0, 3],
                }],
                distances: Vec::new(),
            }),
            ..pb::Snapshot::default()
        };
        let result = deserialize(&snapshot.encode_to_vec());
        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange { index: 3, len: 1, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_vertex_ids() {
        let stop = |name: &str| pb::Stop {
            name: name.into(),
            lat: 0.0,
            lng: 0.0,
            vertex_id: 0,
        };
        let snapshot = pb::Snapshot {
            version: FORMAT_VERSION,
            catalogue: Some(pb::Catalogue {
                stops: vec![stop("A"), stop("B")],
                ..pb::Catalogue::default()
            }),
            ..pb::Snapshot::default()
        };
        assert!(matches!(
            deserialize(&snapshot.encode_to_vec()),
            Err(Error::Format(_))
        ));
    }

    fn stop_message(name: &str, vertex_id: u64) -> pb::Stop {
        pb::Stop {
            name: name.into(),
            lat: 0.0,
            lng: vertex_id as f64,
            vertex_id,
        }
    }

    fn catalogue_snapshot(catalogue: pb::Catalogue) -> Vec<u8> {
        pb::Snapshot {
            version: FORMAT_VERSION,
            catalogue: Some(catalogue),
            ..pb::Snapshot::default()
        }
        .encode_to_vec()
    }

    #[test]
    fn stored_indices_follow_name_order() {
        // vertex order differs from name order
        let bytes = catalogue_snapshot(pb::Catalogue {
            stops: vec![stop_message("A", 1), stop_message("B", 0)],
            buses: vec![pb::Bus {
                name: "R".into(),
                is_roundtrip: true,
                stops: vec![0, 1, 0],
            }],
            distances: vec![pb::Distance {
                from: 0,
                to: 1,
                meters: 700,
            }],
        });
        let restored = deserialize(&bytes).unwrap();
        let catalogue = &restored.catalogue;

        let bus = catalogue.get_bus_info("R").unwrap();
        let names: Vec<&str> = bus
            .stops
            .iter()
            .map(|&stop| catalogue.stop(stop).unwrap().name.as_str())
            .collect();
        assert_eq!(names, ["A", "B", "A"]);
        assert_eq!(catalogue.get_stop_info("B").unwrap().vertex_id, 0);
        assert_eq!(catalogue.get_distance("A", "B"), Some(700));
    }

    #[test]
    fn rejects_stops_out_of_name_order() {
        let bytes = catalogue_snapshot(pb::Catalogue {
            stops: vec![stop_message("B", 0), stop_message("A", 1)],
            buses: vec![pb::Bus {
                name: "R".into(),
                is_roundtrip: true,
                stops: vec![0, 1],
            }],
            distances: Vec::new(),
        });
        assert!(matches!(deserialize(&bytes), Err(Error::Format(_))));
    }

    #[test]
    fn rejects_buses_out_of_name_order() {
        let bus = |name: &str| pb::Bus {
            name: name.into(),
            is_roundtrip: true,
            stops: vec![0],
        };
        let bytes = catalogue_snapshot(pb::Catalogue {
            stops: vec![stop_message("A", 0)],
            buses: vec![bus("9"), bus("10")],
            distances: Vec::new(),
        });
        assert!(matches!(deserialize(&bytes), Err(Error::Format(_))));
    }

    #[test]
    fn rejects_route_table_without_paths() {
        let (catalogue, render_settings, router) = database();
        let bytes =
            serialize(&catalogue, &render_settings, &router, SnapshotMode::WithGraph).unwrap();
        let mut snapshot = pb::Snapshot::decode(bytes.as_slice()).unwrap();
        let graph = snapshot
            .router
            .as_mut()
            .and_then(|router| router.graph.as_mut())
            .unwrap();
        graph.routes[0].entries = vec![pb::RouteEntry {
            target: 1,
            weight: 42.0,
            prev_edge: None,
        }];
        assert!(matches!(
            deserialize(&snapshot.encode_to_vec()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn stored_routing_settings_out_of_range_are_corruption() {
        let bytes = pb::Snapshot {
            version: FORMAT_VERSION,
            router: Some(pb::Router {
                settings: Some(pb::RoutingSettings {
                    bus_wait_time: 5000,
                    bus_velocity: 40,
                }),
                graph: None,
            }),
            ..pb::Snapshot::default()
        }
        .encode_to_vec();
        let error = deserialize(&bytes).unwrap_err();
        assert!(matches!(error, Error::Format(_)));
        assert!(!error.is_configuration());
    }
}
