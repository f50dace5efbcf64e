use tracing::{debug, info, warn};
use transit_catalogue_core::{Catalogue, Coordinates, RenderSettings, RoutingSettings};

use crate::Error;
use crate::document::{BaseRequest, InputDocument};

/// Fills a catalogue from base requests: stops first, then road distances,
/// then buses, so every reference is resolvable regardless of input order.
pub fn build_catalogue(requests: &[BaseRequest]) -> Result<Catalogue, Error> {
    let mut catalogue = Catalogue::new();

    for request in requests {
        if let BaseRequest::Stop {
            name,
            latitude,
            longitude,
            ..
        } = request
        {
            catalogue.add_stop(name.as_str(), Coordinates::new(*latitude, *longitude));
        }
    }

    for request in requests {
        if let BaseRequest::Stop {
            name,
            road_distances,
            ..
        } = request
        {
            for (neighbour, &meters) in road_distances {
                catalogue.set_distance(name, neighbour, meters)?;
            }
        }
    }

    for request in requests {
        if let BaseRequest::Bus {
            name,
            stops,
            is_roundtrip,
        } = request
        {
            catalogue.add_bus(name, stops, *is_roundtrip)?;
            debug!(bus = %name, stops = stops.len(), "added bus");
        }
    }

    info!(
        stops = catalogue.stop_count(),
        buses = catalogue.bus_count(),
        "catalogue loaded"
    );
    Ok(catalogue)
}

impl InputDocument {
    pub fn render_settings(&self) -> RenderSettings {
        self.render_settings
            .clone()
            .map(RenderSettings::from)
            .unwrap_or_default()
    }

    /// Validated routing settings, defaults (no waiting, standing buses)
    /// when the section is absent
    pub fn routing_settings(&self) -> Result<RoutingSettings, Error> {
        match self.routing_settings {
            Some(raw) => Ok(RoutingSettings::try_from(raw)?),
            None => {
                warn!("no routing_settings in the input document, using defaults");
                Ok(RoutingSettings::default())
            }
        }
    }

    pub fn snapshot_path(&self) -> Result<&std::path::Path, Error> {
        self.serialization_settings
            .as_ref()
            .map(|settings| settings.file.as_path())
            .ok_or(Error::Missing("serialization_settings.file"))
    }
}
