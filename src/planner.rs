//! Request pipeline: decode the route, match stations, pick stops.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::StationCatalog;
use crate::matcher::{self, CandidateStation};
use crate::optimizer::{self, Infeasible};
use crate::polyline::{self, DecodeError};
use crate::traits::{DirectionsProvider, RouteError};

/// Pipeline failures. Each maps to a distinct externally visible
/// category in the calling layer; none is ever silently swallowed.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Route(#[from] RouteError),
    /// Geometries with fewer than two points cannot support projection.
    #[error("route geometry has fewer than two points")]
    DegenerateRoute,
    #[error(transparent)]
    Infeasible(#[from] Infeasible),
}

/// Final trip plan handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPlan {
    pub stops: Vec<CandidateStation>,
    pub total_cost: f64,
    pub total_distance_m: f64,
}

/// Owns the immutable station catalog and runs the per-request pipeline.
///
/// Each `plan` call is a pure function of its inputs, so one planner can
/// serve concurrent requests; reloading the catalog means building a
/// fresh planner and swapping it in, never mutating this one.
#[derive(Debug, Clone)]
pub struct TripPlanner {
    catalog: StationCatalog,
}

impl TripPlanner {
    pub fn new(catalog: StationCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    /// Plans fuel stops for an already-routed trip.
    ///
    /// A decode failure discards the whole route before matching begins.
    pub fn plan(
        &self,
        encoded_geometry: &str,
        total_distance_m: f64,
    ) -> Result<TripPlan, PlanError> {
        let line = polyline::decode(encoded_geometry, false)?;
        if line.len() < 2 {
            return Err(PlanError::DegenerateRoute);
        }

        let candidates =
            matcher::match_stations(&line, &self.catalog, matcher::DEFAULT_MAX_DISTANCE_M);
        let itinerary = optimizer::optimize(&candidates, total_distance_m)?;

        debug!(
            stops = itinerary.stops.len(),
            total_cost = itinerary.total_cost,
            "trip planned"
        );
        Ok(TripPlan {
            stops: itinerary.stops,
            total_cost: itinerary.total_cost,
            total_distance_m,
        })
    }

    /// Routes `start` to `end` through `provider`, then plans fuel stops
    /// for the returned leg.
    pub fn plan_between<P: DirectionsProvider>(
        &self,
        provider: &P,
        start: (f64, f64),
        end: (f64, f64),
    ) -> Result<TripPlan, PlanError> {
        let leg = provider.directions(start, end)?;
        self.plan(&leg.geometry, leg.distance_m)
    }
}
