//! Greedy range-constrained fuel-stop selection.

use serde::Serialize;
use thiserror::Error;

use crate::matcher::CandidateStation;

// Policy constants. Business rules rather than physics; their exact
// effect is load-bearing for downstream consumers.

/// Vehicle range on a full tank: 500 miles, in meters.
pub const MAX_RANGE_M: f64 = 804_672.0;

/// Assumed fuel economy, miles per gallon.
pub const FUEL_ECONOMY_MPG: f64 = 10.0;

/// Meters-to-miles conversion factor.
pub const METERS_TO_MILES: f64 = 0.000_621_371_192;

/// Selected stops plus the accumulated fuel spend for the whole trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    /// Chosen stops in travel order (ascending arc distance).
    pub stops: Vec<CandidateStation>,
    /// Total fuel cost in USD. Raw f64 accumulation, never rounded
    /// mid-computation.
    pub total_cost: f64,
}

/// No station exists inside some forward window; the trip cannot be
/// completed within the vehicle's range. All-or-nothing: no partial
/// itinerary accompanies this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no fuel station within vehicle range along the route")]
pub struct Infeasible;

/// Picks the cheapest feasible refueling stops for a route.
///
/// `candidates` must be sorted ascending by `arc_distance_m`, which the
/// matcher guarantees. The walk advances in range-sized windows
/// `(position, position + MAX_RANGE_M]`, each time stopping at the
/// cheapest station in the window. Fuel for a leg is priced at the
/// station the vehicle is driving to; the final partial leg is priced at
/// the last stop visited. Equal prices resolve to the nearer station.
pub fn optimize(
    candidates: &[CandidateStation],
    total_distance_m: f64,
) -> Result<Itinerary, Infeasible> {
    if total_distance_m <= MAX_RANGE_M {
        return Ok(Itinerary {
            stops: Vec::new(),
            total_cost: 0.0,
        });
    }

    let mut stops: Vec<CandidateStation> = Vec::new();
    let mut total_cost = 0.0_f64;
    let mut position = 0.0_f64;

    while position + MAX_RANGE_M < total_distance_m {
        // Strict `<` on price keeps the first (nearest) of equally priced
        // stations in the window.
        let mut cheapest: Option<&CandidateStation> = None;
        for candidate in candidates {
            let arc = candidate.arc_distance_m as f64;
            if arc <= position || arc > position + MAX_RANGE_M {
                continue;
            }
            if cheapest.is_none_or(|best| candidate.price < best.price) {
                cheapest = Some(candidate);
            }
        }
        let Some(next_stop) = cheapest else {
            return Err(Infeasible);
        };

        let leg_m = next_stop.arc_distance_m as f64 - position;
        let leg_miles = leg_m * METERS_TO_MILES;
        total_cost += (leg_miles / FUEL_ECONOMY_MPG) * next_stop.price;

        position = next_stop.arc_distance_m as f64;
        stops.push(next_stop.clone());
    }

    let remaining_m = total_distance_m - position;
    if remaining_m > 0.0 {
        if let Some(last) = stops.last() {
            let remaining_miles = remaining_m * METERS_TO_MILES;
            total_cost += (remaining_miles / FUEL_ECONOMY_MPG) * last.price;
        }
    }

    Ok(Itinerary { stops, total_cost })
}
