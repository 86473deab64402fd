//! OpenRouteService HTTP adapter for the directions seam.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::{DirectionsProvider, RouteError, RouteLeg};

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    pub profile: String,
    pub timeout_secs: u64,
    /// Snap radius forwarded to the provider: waypoints bind to the
    /// nearest road within this many meters.
    pub snap_radius_m: f64,
}

impl OrsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: String::new(),
            profile: "driving-car".to_string(),
            timeout_secs: 10,
            snap_radius_m: 5000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl DirectionsProvider for OrsClient {
    fn directions(&self, start: (f64, f64), end: (f64, f64)) -> Result<RouteLeg, RouteError> {
        let url = format!(
            "{}/v2/directions/{}",
            self.config.base_url, self.config.profile
        );
        let request = DirectionsRequest {
            coordinates: vec![vec![start.0, start.1], vec![end.0, end.1]],
            radiuses: vec![self.config.snap_radius_m; 2],
        };

        let response: DirectionsResponse = self
            .client
            .post(url)
            .header("Authorization", &self.config.api_key)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or(RouteError::NoRoute)?;

        debug!(
            distance_m = route.summary.distance,
            duration_s = route.summary.duration,
            "route received from provider"
        );
        Ok(RouteLeg {
            geometry: route.geometry,
            distance_m: route.summary.distance,
            duration_s: route.summary.duration,
        })
    }
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: Vec<Vec<f64>>,
    radiuses: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<OrsRoute>,
}

#[derive(Debug, Deserialize)]
struct OrsRoute {
    geometry: String,
    summary: OrsSummary,
}

#[derive(Debug, Deserialize)]
struct OrsSummary {
    distance: f64,
    duration: f64,
}
