//! End-to-end pipeline tests: encoded geometry in, trip plan out.
//!
//! Uses a synthetic west-to-east route along the 32.9° parallel and a
//! fake directions provider in place of the hosted routing service.

use fuel_stop_planner::catalog::{StationCatalog, StationRecord};
use fuel_stop_planner::planner::{PlanError, TripPlanner};
use fuel_stop_planner::polyline::{encode, TrackPoint};
use fuel_stop_planner::traits::{DirectionsProvider, RouteError, RouteLeg};

// ============================================================================
// Test Infrastructure
// ============================================================================

fn station(name: &str, lng: f64, lat: f64, price: f64) -> StationRecord {
    StationRecord {
        name: name.to_string(),
        address: format!("{name} Interchange"),
        price,
        lng,
        lat,
    }
}

/// Straight 8-degree route: roughly 890 km, so one refueling stop.
fn route_points() -> Vec<TrackPoint> {
    vec![
        TrackPoint::new(-107.0, 32.9),
        TrackPoint::new(-103.0, 32.9),
        TrackPoint::new(-99.0, 32.9),
    ]
}

const ROUTE_DISTANCE_M: f64 = 889_559.0;

fn test_catalog() -> StationCatalog {
    StationCatalog::new(vec![
        // ~2° along the route, slightly north of it.
        station("alpha", -105.0, 32.95, 3.2),
        // On the line, ~6° along.
        station("bravo", -101.0, 32.9, 3.6),
        // ~1.1° off the line: outside the 100 km tolerance.
        station("charlie", -99.5, 34.0, 2.5),
    ])
}

fn planner() -> TripPlanner {
    TripPlanner::new(test_catalog())
}

struct FakeProvider {
    leg: RouteLeg,
}

impl DirectionsProvider for FakeProvider {
    fn directions(&self, _start: (f64, f64), _end: (f64, f64)) -> Result<RouteLeg, RouteError> {
        Ok(self.leg.clone())
    }
}

struct UnroutableProvider;

impl DirectionsProvider for UnroutableProvider {
    fn directions(&self, _start: (f64, f64), _end: (f64, f64)) -> Result<RouteLeg, RouteError> {
        Err(RouteError::NoRoute)
    }
}

// ============================================================================
// Planning
// ============================================================================

#[test]
fn plans_a_stop_on_a_long_route() {
    let encoded = encode(&route_points(), false);
    let plan = planner().plan(&encoded, ROUTE_DISTANCE_M).unwrap();

    // Cheapest in-window station wins; charlie is too far off the route.
    let names: Vec<_> = plan.stops.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["alpha"]);
    assert!(plan.total_cost > 0.0);
    assert_eq!(plan.total_distance_m, ROUTE_DISTANCE_M);

    // The stop carries its projection onto the route, not its own
    // position: alpha sits at 32.95, the line at 32.9.
    let alpha = &plan.stops[0];
    assert_eq!(alpha.lat, 32.9);
    assert_eq!(alpha.lng, -105.0);
    assert_eq!(alpha.arc_distance_m, 222_389);
}

#[test]
fn short_trip_returns_an_empty_plan() {
    let encoded = encode(&route_points(), false);
    let plan = planner().plan(&encoded, 124_468.7).unwrap();

    assert!(plan.stops.is_empty());
    assert_eq!(plan.total_cost, 0.0);
    assert_eq!(plan.total_distance_m, 124_468.7);
}

#[test]
fn planning_is_deterministic() {
    let encoded = encode(&route_points(), false);
    let first = planner().plan(&encoded, ROUTE_DISTANCE_M).unwrap();
    let second = planner().plan(&encoded, ROUTE_DISTANCE_M).unwrap();
    assert_eq!(first, second);
}

#[test]
fn plan_serializes_for_the_presentation_layer() {
    let encoded = encode(&route_points(), false);
    let plan = planner().plan(&encoded, ROUTE_DISTANCE_M).unwrap();

    let payload = serde_json::to_value(&plan).unwrap();
    assert_eq!(payload["total_distance_m"], ROUTE_DISTANCE_M);
    assert_eq!(payload["stops"][0]["name"], "alpha");
    assert_eq!(payload["stops"][0]["arc_distance_m"], 222_389);
    assert!(payload["stops"][0]["price"].is_number());
    assert!(payload["stops"][0]["lat"].is_number());
    assert!(payload["stops"][0]["lng"].is_number());
}

// ============================================================================
// Failure categories
// ============================================================================

#[test]
fn decode_failure_aborts_before_matching() {
    let err = planner().plan("_p~iF", ROUTE_DISTANCE_M).unwrap_err();
    assert!(matches!(err, PlanError::Decode(_)));
}

#[test]
fn empty_geometry_is_rejected() {
    let err = planner().plan("", ROUTE_DISTANCE_M).unwrap_err();
    assert!(matches!(err, PlanError::DegenerateRoute));
}

#[test]
fn single_point_geometry_is_rejected() {
    let encoded = encode(&[TrackPoint::new(-107.0, 32.9)], false);
    let err = planner().plan(&encoded, ROUTE_DISTANCE_M).unwrap_err();
    assert!(matches!(err, PlanError::DegenerateRoute));
}

#[test]
fn long_route_with_no_reachable_station_is_infeasible() {
    let empty = TripPlanner::new(StationCatalog::default());
    let encoded = encode(&route_points(), false);
    let err = empty.plan(&encoded, ROUTE_DISTANCE_M).unwrap_err();
    assert!(matches!(err, PlanError::Infeasible(_)));
}

// ============================================================================
// Provider seam
// ============================================================================

#[test]
fn plan_between_uses_the_provider_leg() {
    let provider = FakeProvider {
        leg: RouteLeg {
            geometry: encode(&route_points(), false),
            distance_m: ROUTE_DISTANCE_M,
            duration_s: 32_000.0,
        },
    };

    let plan = planner()
        .plan_between(&provider, (-107.0, 32.9), (-99.0, 32.9))
        .unwrap();
    let names: Vec<_> = plan.stops.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["alpha"]);
}

#[test]
fn provider_failure_surfaces_as_a_route_error() {
    let err = planner()
        .plan_between(&UnroutableProvider, (-107.0, 32.9), (-99.0, 32.9))
        .unwrap_err();
    assert!(matches!(err, PlanError::Route(RouteError::NoRoute)));
}
