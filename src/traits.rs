//! Seam traits for external collaborators.
//!
//! Concrete adapters live in their own modules; tests substitute fakes.

use thiserror::Error;

/// One routed leg between two coordinates, as returned by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    /// Encoded polyline geometry of the route.
    pub geometry: String,
    /// Total route distance in meters.
    pub distance_m: f64,
    /// Total route duration in seconds.
    pub duration_s: f64,
}

/// Errors from the routing-provider boundary.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("routing request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("routing provider returned no usable route")]
    NoRoute,
}

/// Turn-by-turn routing provider.
///
/// Coordinates are (lng, lat) in decimal degrees.
pub trait DirectionsProvider {
    fn directions(&self, start: (f64, f64), end: (f64, f64)) -> Result<RouteLeg, RouteError>;
}
