//! Route geometry as decoded coordinate sequences, plus the compact
//! polyline codec.
//!
//! Routes arrive from the routing provider as encoded polyline strings
//! (5-bit groups, zig-zag deltas, ASCII offset 63). Internal processing
//! works on decoded points; encoding back to the compact form happens at
//! API boundaries, not within the planning core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scale factor applied to latitude/longitude values in the encoding.
const COORD_SCALE: f64 = 1e-5;

/// Scale factor applied to elevation values in the encoding.
const ELEVATION_SCALE: f64 = 1e-2;

/// A single route point, longitude before latitude (x before y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lng: f64,
    pub lat: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub elevation: Option<f64>,
}

impl TrackPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            lng,
            lat,
            elevation: None,
        }
    }

    pub fn with_elevation(lng: f64, lat: f64, elevation: f64) -> Self {
        Self {
            lng,
            lat,
            elevation: Some(elevation),
        }
    }
}

/// A polyline representing a route geometry as decoded coordinates.
///
/// Produced once by [`decode`] and read-only afterwards. Order is
/// significant: points follow the direction of travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<TrackPoint>,
}

impl Polyline {
    /// Creates a new polyline from decoded coordinate points.
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<TrackPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Errors for malformed encoded polylines.
///
/// Any decode error discards the whole route; a truncated path is never
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DecodeError {
    /// The input ended in the middle of a coordinate chunk.
    #[error("encoded polyline truncated at byte {0}")]
    Truncated(usize),
    /// A decoded coordinate fell outside the valid lat/lng range.
    #[error("decoded coordinate out of range: lng {lng}, lat {lat}")]
    OutOfRange { lng: f64, lat: f64 },
}

/// Decodes an encoded polyline string into a [`Polyline`].
///
/// Latitude/longitude deltas are scaled by 1e-5 and rounded to six
/// decimal places; elevation deltas (when `include_elevation` is set) are
/// scaled by 1e-2 and rounded to one decimal place. An empty string
/// decodes to an empty polyline; callers that need a projectable line
/// must reject anything with fewer than two points.
pub fn decode(encoded: &str, include_elevation: bool) -> Result<Polyline, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut elevation: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat += next_delta(bytes, &mut index)?;
        lng += next_delta(bytes, &mut index)?;

        let lng_deg = round_to(lng as f64 * COORD_SCALE, 1e6);
        let lat_deg = round_to(lat as f64 * COORD_SCALE, 1e6);
        if !(-90.0..=90.0).contains(&lat_deg) || !(-180.0..=180.0).contains(&lng_deg) {
            return Err(DecodeError::OutOfRange {
                lng: lng_deg,
                lat: lat_deg,
            });
        }

        if include_elevation {
            elevation += next_delta(bytes, &mut index)?;
            points.push(TrackPoint::with_elevation(
                lng_deg,
                lat_deg,
                round_to(elevation as f64 * ELEVATION_SCALE, 1e1),
            ));
        } else {
            points.push(TrackPoint::new(lng_deg, lat_deg));
        }
    }

    Ok(Polyline::new(points))
}

/// Encodes coordinates into the compact polyline representation.
///
/// Inverse of [`decode`] up to the 1e-5 coordinate grid (1e-2 for
/// elevation).
pub fn encode(points: &[TrackPoint], include_elevation: bool) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;
    let mut prev_elevation: i64 = 0;

    for point in points {
        let lat = (point.lat / COORD_SCALE).round() as i64;
        let lng = (point.lng / COORD_SCALE).round() as i64;
        write_delta(lat - prev_lat, &mut out);
        write_delta(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;

        if include_elevation {
            let elevation = (point.elevation.unwrap_or(0.0) / ELEVATION_SCALE).round() as i64;
            write_delta(elevation - prev_elevation, &mut out);
            prev_elevation = elevation;
        }
    }

    out
}

/// Reads one variable-length signed delta starting at `*index`.
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let mut value: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = i64::from(*bytes.get(*index).ok_or(DecodeError::Truncated(*index))?) - 63;
        *index += 1;
        // Bits past the accumulator width can only come from garbage
        // input; the coordinate range check culls such points.
        if shift < i64::BITS {
            value |= (byte & 0x1f) << shift;
        }
        shift += 5;
        if byte < 0x20 {
            break;
        }
    }

    // Zig-zag: odd values carry negative deltas.
    if value & 1 != 0 {
        Ok(!(value >> 1))
    } else {
        Ok(value >> 1)
    }
}

fn write_delta(delta: i64, out: &mut String) {
    let mut value = (delta << 1) ^ (delta >> 63);
    while value >= 0x20 {
        out.push((((value & 0x1f) | 0x20) as u8 + 63) as char);
        value >>= 5;
    }
    out.push((value as u8 + 63) as char);
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_reference_string() {
        let line = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@", false).unwrap();
        assert_eq!(
            line.points(),
            &[
                TrackPoint::new(-120.2, 38.5),
                TrackPoint::new(-120.95, 40.7),
                TrackPoint::new(-126.453, 43.252),
            ]
        );
    }

    #[test]
    fn encodes_reference_points() {
        let points = vec![
            TrackPoint::new(-120.2, 38.5),
            TrackPoint::new(-120.95, 40.7),
            TrackPoint::new(-126.453, 43.252),
        ];
        assert_eq!(encode(&points, false), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn decoding_is_deterministic() {
        let first = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@", false).unwrap();
        let second = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@", false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_string_decodes_to_empty_polyline() {
        let line = decode("", false).unwrap();
        assert!(line.is_empty());
    }

    #[test]
    fn truncated_input_is_an_error() {
        // Only the latitude chunk of the first point is present.
        assert_eq!(decode("_p~iF", false), Err(DecodeError::Truncated(5)));
    }

    #[test]
    fn truncated_chunk_is_an_error() {
        // A continuation bit with nothing after it.
        assert_eq!(decode("_", false), Err(DecodeError::Truncated(1)));
    }

    #[test]
    fn out_of_range_latitude_is_an_error() {
        let encoded = encode(&[TrackPoint::new(0.0, 91.0)], false);
        assert!(matches!(
            decode(&encoded, false),
            Err(DecodeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn out_of_range_longitude_is_an_error() {
        let encoded = encode(&[TrackPoint::new(-180.5, 10.0)], false);
        assert!(matches!(
            decode(&encoded, false),
            Err(DecodeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn round_trips_on_the_encoding_grid() {
        let points = vec![
            TrackPoint::new(-99.22488, 32.92599),
            TrackPoint::new(-100.22488, 32.92599),
            TrackPoint::new(-100.31005, 33.00001),
        ];
        let line = decode(&encode(&points, false), false).unwrap();
        assert_eq!(line.points(), &points[..]);
    }

    #[test]
    fn decodes_elevation_when_requested() {
        let points = vec![
            TrackPoint::with_elevation(-120.2, 38.5, 1200.5),
            TrackPoint::with_elevation(-120.95, 40.7, 987.3),
        ];
        let line = decode(&encode(&points, true), true).unwrap();
        assert_eq!(line.points(), &points[..]);
    }

    #[test]
    fn elevation_is_absent_by_default() {
        let line = decode("_p~iF~ps|U", false).unwrap();
        assert_eq!(line.points()[0].elevation, None);
    }
}
