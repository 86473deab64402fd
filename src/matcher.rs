//! Matches catalog stations against a route line.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::catalog::StationCatalog;
use crate::geometry::{self, METERS_PER_DEGREE};
use crate::polyline::Polyline;

/// Maximum station-to-route distance considered "on the route".
pub const DEFAULT_MAX_DISTANCE_M: f64 = 100_000.0;

/// A catalog station within tolerance of the route, annotated with its
/// position along the line.
///
/// Created per request and discarded after optimization. The carried
/// coordinates are the station's projection onto the route, not its
/// catalog position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateStation {
    /// Distance along the route from its start, truncated to whole meters.
    pub arc_distance_m: u64,
    pub price: f64,
    pub name: String,
    pub address: String,
    /// Latitude of the projected point on the route.
    pub lat: f64,
    /// Longitude of the projected point on the route.
    pub lng: f64,
}

/// Filters the catalog down to stations within `max_distance_m` of the
/// line and annotates each survivor with its arc distance.
///
/// The result is sorted ascending by arc distance (an invariant the
/// optimizer relies on); equal arc distances keep catalog order. Lines
/// with fewer than two points yield no candidates.
pub fn match_stations(
    line: &Polyline,
    catalog: &StationCatalog,
    max_distance_m: f64,
) -> Vec<CandidateStation> {
    let points = line.points();

    let mut candidates: Vec<CandidateStation> = catalog
        .stations()
        .par_iter()
        .filter_map(|station| {
            let projection = geometry::project_onto_polyline(points, (station.lng, station.lat))?;
            if projection.offset_deg * METERS_PER_DEGREE > max_distance_m {
                return None;
            }
            Some(CandidateStation {
                arc_distance_m: (projection.arc_deg * METERS_PER_DEGREE) as u64,
                price: station.price,
                name: station.name.clone(),
                address: station.address.clone(),
                lat: projection.point.1,
                lng: projection.point.0,
            })
        })
        .collect();

    candidates.sort_by_key(|candidate| candidate.arc_distance_m);
    debug!(candidates = candidates.len(), "stations matched against route");
    candidates
}
