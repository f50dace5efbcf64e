//! Stops and bus routes owned by the catalogue

use crate::{BusId, Meters, StopId, VertexId};

use super::Coordinates;

/// Named location, immutable once added to the catalogue
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub coordinates: Coordinates,
    /// Assigned in insertion order, used directly as the graph vertex
    pub vertex_id: VertexId,
}

/// Bus route with its expanded traversal and derived statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    pub id: BusId,
    pub name: String,
    pub is_roundtrip: bool,
    /// Effective traversal. Linear routes are already expanded to A-B-C-B-A.
    pub stops: Vec<StopId>,
    pub unique_stop_count: usize,
    pub route_length: Meters,
    pub curvature: f64,
}

impl Bus {
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Stops as originally declared: the whole loop for a roundtrip,
    /// the forward half for a linear route.
    pub fn declared_stops(&self) -> &[StopId] {
        if self.is_roundtrip || self.stops.is_empty() {
            &self.stops
        } else {
            &self.stops[..self.stops.len() / 2 + 1]
        }
    }

    /// Turnaround stop of a linear route, if it differs from the first one
    pub fn far_terminal(&self) -> Option<StopId> {
        if self.is_roundtrip {
            return None;
        }
        let first = *self.stops.first()?;
        let last = *self.declared_stops().last()?;
        (first != last).then_some(last)
    }
}

/// Expands a linear route into its forward-then-reverse traversal
pub(crate) fn expand_linear(stops: &[StopId]) -> Vec<StopId> {
    let mut expanded = Vec::with_capacity(stops.len() * 2);
    expanded.extend_from_slice(stops);
    if let Some((_, head)) = stops.split_last() {
        expanded.extend(head.iter().rev());
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus(stops: Vec<StopId>, is_roundtrip: bool) -> Bus {
        Bus {
            id: 0,
            name: "1".to_string(),
            is_roundtrip,
            stops,
            unique_stop_count: 0,
            route_length: 0,
            curvature: 0.0,
        }
    }

    #[test]
    fn linear_expansion() {
        assert_eq!(expand_linear(&[0, 1, 2]), vec![0, 1, 2, 1, 0]);
        assert_eq!(expand_linear(&[4]), vec![4]);
        assert!(expand_linear(&[]).is_empty());
    }

    #[test]
    fn declared_stops_of_linear_route() {
        let linear = bus(expand_linear(&[0, 1, 2]), false);
        assert_eq!(linear.declared_stops(), &[0, 1, 2]);
        assert_eq!(linear.far_terminal(), Some(2));

        let single = bus(expand_linear(&[3]), false);
        assert_eq!(single.declared_stops(), &[3]);
        assert_eq!(single.far_terminal(), None);
    }

    #[test]
    fn roundtrip_has_no_far_terminal() {
        let ring = bus(vec![0, 1, 2, 0], true);
        assert_eq!(ring.declared_stops(), &[0, 1, 2, 0]);
        assert_eq!(ring.far_terminal(), None);
    }
}
