use geo::{BoundingRect, Coord, MultiPoint};

use crate::Coordinates;

const EPSILON: f64 = 1e-6;

/// Linear rescale of latitude/longitude into canvas coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct SphereProjector {
    padding: f64,
    min_lon: f64,
    max_lat: f64,
    zoom_coeff: f64,
}

impl SphereProjector {
    pub fn new(
        points: impl IntoIterator<Item = Coordinates>,
        max_width: f64,
        max_height: f64,
        padding: f64,
    ) -> Self {
        let points: MultiPoint<f64> = points.into_iter().map(Coordinates::to_point).collect();
        let Some(bounds) = points.bounding_rect() else {
            return Self {
                padding,
                ..Self::default()
            };
        };

        // x is longitude, y is latitude
        let min_lon = bounds.min().x;
        let max_lon = bounds.max().x;
        let min_lat = bounds.min().y;
        let max_lat = bounds.max().y;

        let width_zoom = (!is_zero(max_lon - min_lon))
            .then(|| (max_width - 2.0 * padding) / (max_lon - min_lon));
        let height_zoom = (!is_zero(max_lat - min_lat))
            .then(|| (max_height - 2.0 * padding) / (max_lat - min_lat));

        let zoom_coeff = match (width_zoom, height_zoom) {
            (Some(width), Some(height)) => width.min(height),
            (Some(zoom), None) | (None, Some(zoom)) => zoom,
            (None, None) => 0.0,
        };

        Self {
            padding,
            min_lon,
            max_lat,
            zoom_coeff,
        }
    }

    pub fn project(&self, coordinates: Coordinates) -> Coord<f64> {
        Coord {
            x: (coordinates.lng - self.min_lon) * self.zoom_coeff + self.padding,
            y: (self.max_lat - coordinates.lat) * self.zoom_coeff + self.padding,
        }
    }
}

fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
