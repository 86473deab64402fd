//! Planar degree-space geometry for matching points against a route.
//!
//! Distances are computed in the path's native coordinate system
//! (decimal degrees) and scaled to meters with a fixed spherical factor.
//! This flat approximation holds at highway-route scale; it is not valid
//! near the poles or across very wide longitude spans, and it must not be
//! swapped for a great-circle formula: downstream expected outputs are
//! pinned to this exact arithmetic.

use crate::polyline::TrackPoint;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of arc on the sphere (2πR / 360).
pub const METERS_PER_DEGREE: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS_M / 360.0;

/// Result of projecting a point orthogonally onto a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Nearest point on the line, (lng, lat).
    pub point: (f64, f64),
    /// Perpendicular distance from the query point to the line, in degrees.
    pub offset_deg: f64,
    /// Distance along the line from its start to the projection, in degrees.
    pub arc_deg: f64,
}

/// Projects `target` onto the segment chain defined by `points`.
///
/// Returns `None` for chains with fewer than two points. When several
/// segments are equally close, the earliest one along the line wins.
pub fn project_onto_polyline(points: &[TrackPoint], target: (f64, f64)) -> Option<Projection> {
    if points.len() < 2 {
        return None;
    }

    let mut best: Option<Projection> = None;
    let mut traversed = 0.0;

    for pair in points.windows(2) {
        let a = (pair[0].lng, pair[0].lat);
        let b = (pair[1].lng, pair[1].lat);
        let (nearest, along) = project_onto_segment(target, a, b);
        let offset = planar_distance(target, nearest);

        if best.is_none_or(|current| offset < current.offset_deg) {
            best = Some(Projection {
                point: nearest,
                offset_deg: offset,
                arc_deg: traversed + along,
            });
        }

        traversed += planar_distance(a, b);
    }

    best
}

/// Nearest point on segment `a`-`b` to `target`, plus the distance from
/// `a` to that point. Degenerate segments collapse to `a`.
fn project_onto_segment(target: (f64, f64), a: (f64, f64), b: (f64, f64)) -> ((f64, f64), f64) {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return (a, 0.0);
    }

    let t = ((target.0 - a.0) * dx + (target.1 - a.1) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let nearest = (a.0 + t * dx, a.1 + t * dy);
    (nearest, planar_distance(a, nearest))
}

fn planar_distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    (dx * dx + dy * dy).sqrt()
}
