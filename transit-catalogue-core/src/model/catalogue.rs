//! Catalogue of stops and bus routes

use std::collections::BTreeSet;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use log::{debug, warn};

use super::coordinates::compute_distance;
use super::domain::expand_linear;
use super::{Bus, Coordinates, Stop};
use crate::{BusId, Error, Meters, StopId};

/// Owns every stop and bus route of the network.
///
/// Entities are only ever appended. Stops are numbered in insertion order and
/// those numbers are the routing graph vertices. Buses are additionally kept
/// in a name-sorted index that defines the canonical order used by the
/// renderer, the graph builder and snapshots.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    stop_index: HashMap<String, StopId>,
    buses: Vec<Bus>,
    /// Bus ids ordered by name
    sorted_buses: Vec<BusId>,
    buses_on_stop: HashMap<StopId, HashSet<BusId>>,
    distances: HashMap<(StopId, StopId), Meters>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stop and returns its vertex id. Duplicate names are not checked.
    pub fn add_stop(&mut self, name: impl Into<String>, coordinates: Coordinates) -> StopId {
        let id = self.stops.len();
        let name = name.into();
        self.stop_index.insert(name.clone(), id);
        self.stops.push(Stop {
            name,
            coordinates,
            vertex_id: id,
        });
        id
    }

    /// Adds a bus route. A name that is already present is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStop`] if the route references a stop that was
    /// not added before. The catalogue is left unchanged in that case.
    pub fn add_bus<S: AsRef<str>>(
        &mut self,
        name: &str,
        stop_names: &[S],
        is_roundtrip: bool,
    ) -> Result<(), Error> {
        let position = match self.sorted_bus_search(name) {
            Ok(_) => {
                debug!("Bus {name} is already in the catalogue, skipping");
                return Ok(());
            }
            Err(position) => position,
        };

        let declared = stop_names
            .iter()
            .map(|stop_name| {
                let stop_name = stop_name.as_ref();
                self.stop_id(stop_name)
                    .ok_or_else(|| Error::UnknownStop(stop_name.to_string()))
            })
            .collect::<Result<Vec<StopId>, Error>>()?;

        self.insert_bus(position, name, declared, is_roundtrip);
        Ok(())
    }

    /// Adds a bus route from already resolved stop ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] for a stop id outside the catalogue
    pub(crate) fn add_bus_by_ids(
        &mut self,
        name: &str,
        declared: Vec<StopId>,
        is_roundtrip: bool,
    ) -> Result<(), Error> {
        if let Some(&bad) = declared.iter().find(|&&stop| stop >= self.stops.len()) {
            return Err(Error::IndexOutOfRange {
                kind: "stops",
                index: bad,
                len: self.stops.len(),
            });
        }
        match self.sorted_bus_search(name) {
            Ok(_) => debug!("Bus {name} is already in the catalogue, skipping"),
            Err(position) => self.insert_bus(position, name, declared, is_roundtrip),
        }
        Ok(())
    }

    fn insert_bus(
        &mut self,
        position: usize,
        name: &str,
        declared: Vec<StopId>,
        is_roundtrip: bool,
    ) {
        let id = self.buses.len();
        self.sorted_buses.insert(position, id);

        let unique_stop_count = declared.iter().collect::<HashSet<_>>().len();
        let stops = if is_roundtrip {
            declared
        } else {
            expand_linear(&declared)
        };

        let route_length = self.route_length(&stops);
        let curvature = self.curvature(route_length, &stops);

        for &stop in &stops {
            self.buses_on_stop.entry(stop).or_default().insert(id);
        }

        self.buses.push(Bus {
            id,
            name: name.to_string(),
            is_roundtrip,
            stops,
            unique_stop_count,
            route_length,
            curvature,
        });
    }

    /// Records the road distance for one direction between two stops
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStop`] if either stop is missing
    pub fn set_distance(&mut self, from: &str, to: &str, distance: Meters) -> Result<(), Error> {
        let from_id = self
            .stop_id(from)
            .ok_or_else(|| Error::UnknownStop(from.to_string()))?;
        let to_id = self
            .stop_id(to)
            .ok_or_else(|| Error::UnknownStop(to.to_string()))?;
        self.set_distance_by_id(from_id, to_id, distance);
        Ok(())
    }

    pub(crate) fn set_distance_by_id(&mut self, from: StopId, to: StopId, distance: Meters) {
        self.distances.insert((from, to), distance);
    }

    /// Road distance between two stops by name, `None` if a stop is unknown
    pub fn get_distance(&self, from: &str, to: &str) -> Option<Meters> {
        Some(self.distance(self.stop_id(from)?, self.stop_id(to)?))
    }

    /// Road distance: the recorded value for this direction, else the
    /// recorded value for the opposite direction, else the rounded
    /// great-circle distance.
    ///
    /// # Panics
    ///
    /// If a stop id is not part of the catalogue
    pub fn distance(&self, from: StopId, to: StopId) -> Meters {
        if let Some(&distance) = self.distances.get(&(from, to)) {
            return distance;
        }
        if let Some(&distance) = self.distances.get(&(to, from)) {
            return distance;
        }
        let great_circle =
            compute_distance(self.stops[from].coordinates, self.stops[to].coordinates);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = great_circle.round() as Meters;
        rounded
    }

    /// Recorded distance entries, in no particular order
    pub fn distances(&self) -> impl Iterator<Item = ((StopId, StopId), Meters)> + '_ {
        self.distances.iter().map(|(&key, &value)| (key, value))
    }

    pub fn get_bus_info(&self, name: &str) -> Option<&Bus> {
        self.sorted_bus_search(name)
            .ok()
            .map(|position| &self.buses[self.sorted_buses[position]])
    }

    pub fn get_stop_info(&self, name: &str) -> Option<&Stop> {
        self.stop_id(name).map(|id| &self.stops[id])
    }

    /// Names of the buses serving a stop, sorted.
    /// `None` means there is no such stop, an empty set means nothing stops there.
    pub fn get_buses_on_stop(&self, name: &str) -> Option<BTreeSet<&str>> {
        let stop = self.stop_id(name)?;
        Some(
            self.buses_on_stop
                .get(&stop)
                .map(|buses| {
                    buses
                        .iter()
                        .map(|&bus| self.buses[bus].name.as_str())
                        .collect()
                })
                .unwrap_or_default(),
        )
    }

    pub fn stop_id(&self, name: &str) -> Option<StopId> {
        self.stop_index.get(name).copied()
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    pub fn bus(&self, id: BusId) -> Option<&Bus> {
        self.buses.get(id)
    }

    /// Stops in insertion (vertex id) order
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Buses in canonical name order
    pub fn buses(&self) -> impl ExactSizeIterator<Item = &Bus> + '_ {
        self.sorted_buses.iter().map(|&id| &self.buses[id])
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.stops.len()
    }

    /// Stop names in canonical (name) order
    pub fn get_sorted_stop_names(&self) -> Vec<&str> {
        self.sorted_stops()
            .into_iter()
            .map(|id| self.stops[id].name.as_str())
            .collect()
    }

    /// Stop ids ordered by stop name
    pub fn sorted_stops(&self) -> Vec<StopId> {
        let mut ids = (0..self.stops.len()).collect::<Vec<_>>();
        ids.sort_by(|&lhs, &rhs| self.stops[lhs].name.cmp(&self.stops[rhs].name));
        ids
    }

    /// Bus ids ordered by bus name
    pub fn sorted_bus_ids(&self) -> &[BusId] {
        &self.sorted_buses
    }

    /// Names of the stops served by at least one bus, sorted
    pub fn stops_in_routes(&self) -> BTreeSet<&str> {
        self.buses_on_stop
            .iter()
            .filter(|(_, buses)| !buses.is_empty())
            .map(|(&stop, _)| self.stops[stop].name.as_str())
            .collect()
    }

    fn sorted_bus_search(&self, name: &str) -> Result<usize, usize> {
        self.sorted_buses
            .binary_search_by(|&id| self.buses[id].name.as_str().cmp(name))
    }

    fn route_length(&self, stops: &[StopId]) -> Meters {
        stops
            .iter()
            .tuple_windows()
            .map(|(&from, &to)| self.distance(from, to))
            .sum()
    }

    /// Road length over the sum of per-segment great-circle distances
    fn curvature(&self, route_length: Meters, stops: &[StopId]) -> f64 {
        let geo_length: f64 = stops
            .iter()
            .tuple_windows()
            .map(|(&from, &to)| {
                compute_distance(self.stops[from].coordinates, self.stops[to].coordinates)
            })
            .sum();
        if geo_length > 0.0 {
            f64::from(route_length) / geo_length
        } else {
            if route_length > 0 {
                warn!("Route of {route_length} m has zero geographic length, curvature set to 0");
            }
            0.0
        }
    }
}
