//! Raw input document as read from JSON
//!
//! These types mirror the document layout one to one and are converted into
//! validated core values before anything else sees them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use geo::Coord;
use serde::Deserialize;
use transit_catalogue_core::query::RequestId;
use transit_catalogue_core::{Color, RenderSettings, RoutingSettings, StatRequest};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct InputDocument {
    pub base_requests: Vec<BaseRequest>,
    pub stat_requests: Vec<RawStatRequest>,
    pub render_settings: Option<RawRenderSettings>,
    pub routing_settings: Option<RawRoutingSettings>,
    pub serialization_settings: Option<SerializationSettings>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        /// Neighbour name -> meters
        #[serde(default)]
        road_distances: BTreeMap<String, u32>,
    },
    Bus {
        name: String,
        stops: Vec<String>,
        is_roundtrip: bool,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum RawStatRequest {
    Stop { id: RequestId, name: String },
    Bus { id: RequestId, name: String },
    Map { id: RequestId },
    Route { id: RequestId, from: String, to: String },
}

impl From<RawStatRequest> for StatRequest {
    fn from(raw: RawStatRequest) -> Self {
        match raw {
            RawStatRequest::Stop { id, name } => StatRequest::Stop { id, name },
            RawStatRequest::Bus { id, name } => StatRequest::Bus { id, name },
            RawStatRequest::Map { id } => StatRequest::Map { id },
            RawStatRequest::Route { id, from, to } => StatRequest::Route { id, from, to },
        }
    }
}

/// A color name, `[r, g, b]` or `[r, g, b, opacity]`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawColor {
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

impl From<RawColor> for Color {
    fn from(raw: RawColor) -> Self {
        match raw {
            RawColor::Named(name) => Color::Named(name),
            RawColor::Rgb(red, green, blue) => Color::Rgb { red, green, blue },
            RawColor::Rgba(red, green, blue, opacity) => Color::Rgba {
                red,
                green,
                blue,
                opacity,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: f64,
    pub bus_label_offset: [f64; 2],
    pub stop_label_font_size: f64,
    pub stop_label_offset: [f64; 2],
    pub underlayer_color: Option<RawColor>,
    pub underlayer_width: f64,
    pub color_palette: Vec<RawColor>,
}

impl From<RawRenderSettings> for RenderSettings {
    fn from(raw: RawRenderSettings) -> Self {
        let offset = |[x, y]: [f64; 2]| Coord { x, y };
        RenderSettings {
            width: raw.width,
            height: raw.height,
            padding: raw.padding,
            line_width: raw.line_width,
            stop_radius: raw.stop_radius,
            bus_label_font_size: raw.bus_label_font_size,
            bus_label_offset: offset(raw.bus_label_offset),
            stop_label_font_size: raw.stop_label_font_size,
            stop_label_offset: offset(raw.stop_label_offset),
            underlayer_color: raw.underlayer_color.map(Color::from).unwrap_or_default(),
            underlayer_width: raw.underlayer_width,
            color_palette: raw.color_palette.into_iter().map(Color::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawRoutingSettings {
    pub bus_wait_time: i64,
    pub bus_velocity: i64,
}

impl TryFrom<RawRoutingSettings> for RoutingSettings {
    type Error = transit_catalogue_core::Error;

    fn try_from(raw: RawRoutingSettings) -> Result<Self, Self::Error> {
        RoutingSettings::new(raw.bus_wait_time, raw.bus_velocity)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerializationSettings {
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_requests() {
        let document: InputDocument = serde_json::from_str(
            r#"{
                "base_requests": [
                    {"type": "Stop", "name": "A", "latitude": 55.6, "longitude": 37.2,
                     "road_distances": {"B": 3900}},
                    {"type": "Bus", "name": "256", "stops": ["A", "B"], "is_roundtrip": false}
                ],
                "stat_requests": [
                    {"id": 1, "type": "Map"},
                    {"id": 2, "type": "Route", "from": "A", "to": "B"}
                ],
                "serialization_settings": {"file": "base.db"}
            }"#,
        )
        .unwrap();

        assert_eq!(document.base_requests.len(), 2);
        let BaseRequest::Stop { road_distances, .. } = &document.base_requests[0] else {
            panic!("expected a stop");
        };
        assert_eq!(road_distances.get("B"), Some(&3900));

        let requests: Vec<StatRequest> = document
            .stat_requests
            .into_iter()
            .map(StatRequest::from)
            .collect();
        assert_eq!(
            requests[1],
            StatRequest::Route {
                id: 2,
                from: "A".into(),
                to: "B".into(),
            }
        );
        assert_eq!(
            document.serialization_settings.unwrap().file,
            PathBuf::from("base.db")
        );
    }

    #[test]
    fn unknown_request_type_is_rejected() {
        let result = serde_json::from_str::<InputDocument>(
            r#"{"stat_requests": [{"id": 1, "type": "Tram", "name": "T1"}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn colors_in_every_form() {
        let settings: RawRenderSettings = serde_json::from_str(
            r#"{
                "underlayer_color": [255, 255, 255, 0.85],
                "color_palette": ["green", [255, 160, 0], "red"],
                "bus_label_offset": [7, 15]
            }"#,
        )
        .unwrap();
        let settings = RenderSettings::from(settings);
        assert_eq!(
            settings.underlayer_color,
            Color::Rgba {
                red: 255,
                green: 255,
                blue: 255,
                opacity: 0.85
            }
        );
        assert_eq!(
            settings.color_palette,
            vec![
                Color::Named("green".into()),
                Color::Rgb {
                    red: 255,
                    green: 160,
                    blue: 0
                },
                Color::Named("red".into()),
            ]
        );
        assert_eq!(settings.bus_label_offset, Coord { x: 7.0, y: 15.0 });
    }

    #[test]
    fn routing_settings_are_range_checked() {
        let raw = RawRoutingSettings {
            bus_wait_time: 6,
            bus_velocity: 1001,
        };
        assert!(RoutingSettings::try_from(raw).is_err());
    }
}
