//! Geographic coordinates and great-circle distance

use geo::{Distance, Haversine, Point};

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `geo` points are (x = longitude, y = latitude)
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

impl From<Point<f64>> for Coordinates {
    fn from(point: Point<f64>) -> Self {
        Self {
            lat: point.y(),
            lng: point.x(),
        }
    }
}

/// Great-circle distance in meters
pub fn compute_distance(from: Coordinates, to: Coordinates) -> f64 {
    if from == to {
        return 0.0;
    }
    Haversine.distance(from.to_point(), to.to_point())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn same_point_is_zero() {
        let point = Coordinates::new(55.611087, 37.20829);
        assert_eq!(compute_distance(point, point), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);
        // roughly 111.2 km on a sphere of mean earth radius
        assert_relative_eq!(compute_distance(a, b), 111_195.0, max_relative = 1e-3);
        assert_relative_eq!(compute_distance(a, b), compute_distance(b, a));
    }
}
