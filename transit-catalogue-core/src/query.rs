//! Typed stat requests and their answers
//!
//! [`TransitDatabase`] owns everything a query may touch. Answers refer to
//! stops and buses by name so they can be formatted without the catalogue.

use log::debug;
use serde::Serialize;

use crate::persistence::{self, SnapshotMode};
use crate::render::{MapRenderer, RenderSettings};
use crate::routing::{RoutingSettings, TransportRouter};
use crate::{Bus, Catalogue, Error, Minutes};

pub type RequestId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatRequest {
    Stop { id: RequestId, name: String },
    Bus { id: RequestId, name: String },
    Map { id: RequestId },
    Route { id: RequestId, from: String, to: String },
}

impl StatRequest {
    pub fn id(&self) -> RequestId {
        match self {
            StatRequest::Stop { id, .. }
            | StatRequest::Bus { id, .. }
            | StatRequest::Map { id }
            | StatRequest::Route { id, .. } => *id,
        }
    }
}

/// Derived statistics of a bus route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BusStats {
    pub curvature: f64,
    pub route_length: u32,
    pub stop_count: usize,
    pub unique_stop_count: usize,
}

impl From<&Bus> for BusStats {
    fn from(bus: &Bus) -> Self {
        Self {
            curvature: bus.curvature,
            route_length: bus.route_length,
            stop_count: bus.stop_count(),
            unique_stop_count: bus.unique_stop_count,
        }
    }
}

/// One boarding of an itinerary
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryLeg {
    pub stop_name: String,
    pub bus_name: String,
    pub wait_time: Minutes,
    pub ride_time: Minutes,
    pub span_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryAnswer {
    NotFound {
        id: RequestId,
    },
    StopInfo {
        id: RequestId,
        /// Sorted bus names
        buses: Vec<String>,
    },
    BusInfo {
        id: RequestId,
        stats: BusStats,
    },
    MapInfo {
        id: RequestId,
        map: String,
    },
    RouteInfo {
        id: RequestId,
        total_time: Minutes,
        items: Vec<ItineraryLeg>,
    },
}

impl QueryAnswer {
    pub fn id(&self) -> RequestId {
        match self {
            QueryAnswer::NotFound { id }
            | QueryAnswer::StopInfo { id, .. }
            | QueryAnswer::BusInfo { id, .. }
            | QueryAnswer::MapInfo { id, .. }
            | QueryAnswer::RouteInfo { id, .. } => *id,
        }
    }
}

/// Catalogue, map renderer and router of one network
#[derive(Debug, Clone)]
pub struct TransitDatabase {
    catalogue: Catalogue,
    renderer: MapRenderer,
    router: TransportRouter,
}

impl TransitDatabase {
    pub fn new(
        catalogue: Catalogue,
        render_settings: RenderSettings,
        router: TransportRouter,
    ) -> Self {
        Self {
            catalogue,
            renderer: MapRenderer::new(render_settings),
            router,
        }
    }

    /// Builds the routing graph for a freshly loaded catalogue
    ///
    /// # Errors
    ///
    /// Propagates graph construction errors
    pub fn build(
        catalogue: Catalogue,
        render_settings: RenderSettings,
        routing_settings: RoutingSettings,
    ) -> Result<Self, Error> {
        let mut router = TransportRouter::new(routing_settings);
        router.build(&catalogue)?;
        Ok(Self::new(catalogue, render_settings, router))
    }

    /// Restores a database from snapshot bytes
    ///
    /// # Errors
    ///
    /// See [`persistence::deserialize`]
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, Error> {
        let restored = persistence::deserialize(bytes)?;
        Ok(Self::new(
            restored.catalogue,
            restored.render_settings,
            restored.router,
        ))
    }

    /// # Errors
    ///
    /// See [`persistence::serialize`]
    pub fn to_snapshot(&self, mode: SnapshotMode) -> Result<Vec<u8>, Error> {
        persistence::serialize(
            &self.catalogue,
            self.renderer.settings(),
            &self.router,
            mode,
        )
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn render_settings(&self) -> &RenderSettings {
        self.renderer.settings()
    }

    pub fn router(&self) -> &TransportRouter {
        &self.router
    }

    /// Answers one request. Unknown names produce [`QueryAnswer::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphNotBuilt`] for a route request before the router
    /// is built
    pub fn answer(&self, request: &StatRequest) -> Result<QueryAnswer, Error> {
        let id = request.id();
        let answer = match request {
            StatRequest::Stop { name, .. } => match self.catalogue.get_buses_on_stop(name) {
                Some(buses) => QueryAnswer::StopInfo {
                    id,
                    buses: buses.into_iter().map(str::to_owned).collect(),
                },
                None => QueryAnswer::NotFound { id },
            },
            StatRequest::Bus { name, .. } => match self.catalogue.get_bus_info(name) {
                Some(bus) => QueryAnswer::BusInfo {
                    id,
                    stats: bus.into(),
                },
                None => QueryAnswer::NotFound { id },
            },
            StatRequest::Map { .. } => QueryAnswer::MapInfo {
                id,
                map: self.renderer.render(&self.catalogue),
            },
            StatRequest::Route { from, to, .. } => self.route(id, from, to)?,
        };
        debug!("Answered request {id}");
        Ok(answer)
    }

    /// Answers requests in order
    ///
    /// # Errors
    ///
    /// Stops at the first failing request
    pub fn answer_all(&self, requests: &[StatRequest]) -> Result<Vec<QueryAnswer>, Error> {
        requests.iter().map(|request| self.answer(request)).collect()
    }

    fn route(&self, id: RequestId, from: &str, to: &str) -> Result<QueryAnswer, Error> {
        let (Some(from), Some(to)) = (
            self.catalogue.get_stop_info(from),
            self.catalogue.get_stop_info(to),
        ) else {
            return Ok(QueryAnswer::NotFound { id });
        };

        let Some(route) = self.router.compute_route(from.vertex_id, to.vertex_id)? else {
            return Ok(QueryAnswer::NotFound { id });
        };

        let items = route
            .lines
            .into_iter()
            .map(|line| {
                let stop = self.catalogue.stop(line.stop).ok_or(Error::IndexOutOfRange {
                    kind: "stops",
                    index: line.stop,
                    len: self.catalogue.stop_count(),
                })?;
                let bus = self.catalogue.bus(line.bus).ok_or(Error::IndexOutOfRange {
                    kind: "buses",
                    index: line.bus,
                    len: self.catalogue.bus_count(),
                })?;
                Ok(ItineraryLeg {
                    stop_name: stop.name.clone(),
                    bus_name: bus.name.clone(),
                    wait_time: line.wait_time,
                    ride_time: line.ride_time,
                    span_count: line.span_count,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(QueryAnswer::RouteInfo {
            id,
            total_time: route.total_time,
            items,
        })
    }
}
