#![allow(dead_code)]

use geo::Coord;
use transit_catalogue_core::prelude::*;

/// Small network with a linear route, a loop, a shared stop and an
/// isolated stop
pub fn sample_catalogue() -> Catalogue {
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("Riverside", Coordinates::new(43.587795, 39.716901));
    catalogue.add_stop("Harbour", Coordinates::new(43.581969, 39.719848));
    catalogue.add_stop("Cathedral", Coordinates::new(43.598701, 39.730623));
    catalogue.add_stop("Station", Coordinates::new(43.590317, 39.746833));
    catalogue.add_stop("Orchard", Coordinates::new(43.576524, 39.728651));
    catalogue.add_stop("Depot", Coordinates::new(43.560000, 39.700000));

    catalogue.set_distance("Riverside", "Harbour", 850).unwrap();
    catalogue.set_distance("Harbour", "Riverside", 910).unwrap();
    catalogue.set_distance("Harbour", "Cathedral", 2100).unwrap();
    catalogue.set_distance("Cathedral", "Station", 1700).unwrap();
    catalogue.set_distance("Station", "Orchard", 2300).unwrap();
    catalogue.set_distance("Orchard", "Harbour", 1250).unwrap();

    catalogue
        .add_bus("114", &["Riverside", "Harbour", "Cathedral"], false)
        .unwrap();
    catalogue
        .add_bus("24", &["Harbour", "Station", "Orchard", "Harbour"], true)
        .unwrap();
    catalogue
        .add_bus("3", &["Cathedral", "Station"], false)
        .unwrap();
    catalogue
}

pub fn sample_render_settings() -> RenderSettings {
    RenderSettings {
        width: 1200.0,
        height: 500.0,
        padding: 50.0,
        line_width: 14.0,
        stop_radius: 5.0,
        bus_label_font_size: 20.0,
        bus_label_offset: Coord { x: 7.0, y: 15.0 },
        stop_label_font_size: 18.0,
        stop_label_offset: Coord { x: 7.0, y: -3.0 },
        underlayer_color: Color::Rgba {
            red: 255,
            green: 255,
            blue: 255,
            opacity: 0.85,
        },
        underlayer_width: 3.0,
        color_palette: vec![
            Color::Named("green".into()),
            Color::Rgb {
                red: 255,
                green: 160,
                blue: 0,
            },
            Color::Named("red".into()),
        ],
    }
}

pub fn sample_database() -> TransitDatabase {
    TransitDatabase::build(
        sample_catalogue(),
        sample_render_settings(),
        RoutingSettings::new(6, 40).unwrap(),
    )
    .unwrap()
}
