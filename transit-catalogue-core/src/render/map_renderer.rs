use log::debug;

use super::projector::SphereProjector;
use super::settings::{Color, RenderSettings};
use super::svg::{Document, Element, PathProps, Text};
use crate::{Bus, Catalogue, StopId};

const FONT_FAMILY: &str = "Verdana";
const BUS_LABEL_WEIGHT: &str = "bold";

/// Draws the network as an SVG map.
///
/// Layers, bottom to top: route polylines, route labels, stop circles and
/// stop labels. Routes are drawn in name order and only routes with at least
/// one stop take a palette color.
#[derive(Debug, Clone, Default)]
pub struct MapRenderer {
    settings: RenderSettings,
}

impl MapRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn render(&self, catalogue: &Catalogue) -> String {
        self.render_document(catalogue).to_string()
    }

    pub(crate) fn render_document(&self, catalogue: &Catalogue) -> Document {
        let drawn: Vec<&Bus> = catalogue
            .buses()
            .filter(|bus| !bus.stops.is_empty())
            .collect();

        let projector = SphereProjector::new(
            drawn
                .iter()
                .flat_map(|bus| bus.stops.iter())
                .filter_map(|&stop| catalogue.stop(stop))
                .map(|stop| stop.coordinates),
            self.settings.width,
            self.settings.height,
            self.settings.padding,
        );

        let mut lines = Vec::with_capacity(drawn.len());
        let mut labels = Vec::with_capacity(drawn.len() * 4);

        for (color_index, bus) in drawn.iter().enumerate() {
            let color = self.settings.palette_color(color_index);

            let points = bus
                .stops
                .iter()
                .filter_map(|&stop| catalogue.stop(stop))
                .map(|stop| projector.project(stop.coordinates))
                .collect();
            lines.push(Element::Polyline {
                points,
                props: PathProps::default()
                    .fill(Color::None)
                    .stroke(color.clone(), self.settings.line_width)
                    .rounded(),
            });

            let terminals = bus.stops.first().copied().into_iter().chain(bus.far_terminal());
            for terminal in terminals {
                labels.extend(
                    self.bus_labels(catalogue, &projector, terminal, &bus.name, &color)
                        .into_iter()
                        .flatten(),
                );
            }
        }

        let served = catalogue.stops_in_routes();
        let mut circles = Vec::with_capacity(served.len());
        let mut stop_labels = Vec::with_capacity(served.len() * 2);
        for name in served {
            let Some(stop) = catalogue.get_stop_info(name) else {
                continue;
            };
            let position = projector.project(stop.coordinates);
            circles.push(Element::Circle {
                center: position,
                radius: self.settings.stop_radius,
                props: PathProps::default().fill(Color::Named("white".into())),
            });

            let label = Text {
                position,
                offset: self.settings.stop_label_offset,
                font_size: self.settings.stop_label_font_size,
                font_family: Some(FONT_FAMILY.into()),
                font_weight: None,
                data: stop.name.clone(),
                props: PathProps::default(),
            };
            stop_labels.push(Element::Text(Text {
                props: self.underlayer_props(),
                ..label.clone()
            }));
            stop_labels.push(Element::Text(Text {
                props: PathProps::default().fill(Color::Named("black".into())),
                ..label
            }));
        }

        debug!(
            "Rendering map: {} routes, {} stops",
            lines.len(),
            circles.len()
        );

        let mut document = Document::default();
        document.extend(lines);
        document.extend(labels);
        document.extend(circles);
        document.extend(stop_labels);
        document
    }

    /// Underlayer and colored label for a route terminal
    fn bus_labels(
        &self,
        catalogue: &Catalogue,
        projector: &SphereProjector,
        stop: StopId,
        bus_name: &str,
        color: &Color,
    ) -> Option<[Element; 2]> {
        let stop = catalogue.stop(stop)?;
        let label = Text {
            position: projector.project(stop.coordinates),
            offset: self.settings.bus_label_offset,
            font_size: self.settings.bus_label_font_size,
            font_family: Some(FONT_FAMILY.into()),
            font_weight: Some(BUS_LABEL_WEIGHT.into()),
            data: bus_name.to_owned(),
            props: PathProps::default(),
        };
        Some([
            Element::Text(Text {
                props: self.underlayer_props(),
                ..label.clone()
            }),
            Element::Text(Text {
                props: PathProps::default().fill(color.clone()),
                ..label
            }),
        ])
    }

    fn underlayer_props(&self) -> PathProps {
        PathProps::default()
            .fill(self.settings.underlayer_color.clone())
            .stroke(
                self.settings.underlayer_color.clone(),
                self.settings.underlayer_width,
            )
            .rounded()
    }
}
