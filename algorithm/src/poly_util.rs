// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Polygon and polyline predicates on the sphere.

use crate::error::{GeometryError, GeometryResult};
use crate::geo_math::{
    EARTH_RADIUS, clamp, compute_distance_between, hav, hav_distance, hav_from_sin, inverse_mercator,
    mercator, sin_from_hav, sin_sum_from_hav, wrap_lng,
};
use common::position::GeoPoint;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::debug;

/// Tolerance in meters used by the edge and path tests when none is given.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Offset in degrees applied to the closing point of a polygon while it is simplified.
const CLOSING_POINT_OFFSET: f64 = 1e-11;

/// Above this haversine the between-endpoints test of a great circle segment
/// needs the along-track check to stay accurate.
const LONG_SEGMENT_HAV: f64 = 0.74;

/// Returns `tan` of the latitude at which the great circle through
/// `(lat1, 0)` and `(lat2, lng2)` crosses longitude `lng3`.
fn tan_lat_gc(lat1: f64, lat2: f64, lng2: f64, lng3: f64) -> f64 {
    (lat1.tan() * (lng2 - lng3).sin() + lat2.tan() * lng3.sin()) / lng2.sin()
}

/// Returns the Mercator y at which the rhumb line through `(lat1, 0)` and
/// `(lat2, lng2)` crosses longitude `lng3`.
fn mercator_lat_rhumb(lat1: f64, lat2: f64, lng2: f64, lng3: f64) -> f64 {
    (mercator(lat1) * (lng2 - lng3) + mercator(lat2) * lng3) / lng2
}

/// Tests whether the segment from `(lat1, 0)` to `(lat2, lng2)` crosses the
/// meridian of `(lat3, lng3)` south of it. Longitudes are relative to the
/// first vertex.
fn intersects(lat1: f64, lat2: f64, lng2: f64, lat3: f64, lng3: f64, geodesic: bool) -> bool {
    // Both ends on the same side of lng3.
    if (lng3 >= 0.0 && lng3 >= lng2) || (lng3 < 0.0 && lng3 < lng2) {
        return false;
    }
    if lat3 <= -FRAC_PI_2 {
        return false;
    }
    if lat1 <= -FRAC_PI_2 || lat2 <= -FRAC_PI_2 || lat1 >= FRAC_PI_2 || lat2 >= FRAC_PI_2 {
        return false;
    }
    if lng2 <= -PI {
        return false;
    }
    let linear_lat = (lat1 * (lng2 - lng3) + lat2 * lng3) / lng2;
    if lat1 >= 0.0 && lat2 >= 0.0 && lat3 < linear_lat {
        return false;
    }
    if lat1 <= 0.0 && lat2 <= 0.0 && lat3 >= linear_lat {
        return true;
    }
    if lat3 >= FRAC_PI_2 {
        return true;
    }
    if geodesic {
        lat3.tan() >= tan_lat_gc(lat1, lat2, lng2, lng3)
    } else {
        mercator(lat3) >= mercator_lat_rhumb(lat1, lat2, lng2, lng3)
    }
}

/// Computes whether `point` lies inside `polygon`.
///
/// The polygon is always treated as closed, whether or not the last point
/// repeats the first. Edges are great circle arcs if `geodesic` is set and
/// rhumb lines otherwise. A point on a vertex is inside; the poles never are.
pub fn contains_location(point: &GeoPoint, polygon: &[GeoPoint], geodesic: bool) -> bool {
    let Some(prev) = polygon.last() else {
        return false;
    };
    let lat3 = point.lat_rad();
    let lng3 = point.lng_rad();
    if lat3.abs() >= FRAC_PI_2 {
        return false;
    }
    let mut lat1 = prev.lat_rad();
    let mut lng1 = prev.lng_rad();
    let mut crossings = 0_usize;
    for vertex in polygon {
        let d_lng3 = wrap_lng(lng3 - lng1);
        if lat3 == lat1 && d_lng3 == 0.0 {
            return true;
        }
        let lat2 = vertex.lat_rad();
        let lng2 = vertex.lng_rad();
        if intersects(lat1, lat2, wrap_lng(lng2 - lng1), lat3, d_lng3, geodesic) {
            crossings += 1;
        }
        lat1 = lat2;
        lng1 = lng2;
    }
    crossings % 2 != 0
}

/// Computes whether `point` lies within `tolerance` meters of an edge of the
/// closed `polygon`.
pub fn is_location_on_edge(
    point: &GeoPoint,
    polygon: &[GeoPoint],
    geodesic: bool,
    tolerance: f64,
) -> bool {
    is_location_on_edge_or_path(point, polygon, true, geodesic, tolerance)
}

/// Computes whether `point` lies within `tolerance` meters of the open
/// `polyline`.
pub fn is_location_on_path(
    point: &GeoPoint,
    polyline: &[GeoPoint],
    geodesic: bool,
    tolerance: f64,
) -> bool {
    is_location_on_edge_or_path(point, polyline, false, geodesic, tolerance)
}

fn is_location_on_edge_or_path(
    point: &GeoPoint,
    poly: &[GeoPoint],
    closed: bool,
    geodesic: bool,
    tolerance: f64,
) -> bool {
    let Some(prev) = (if closed { poly.last() } else { poly.first() }) else {
        return false;
    };
    let tolerance = tolerance / EARTH_RADIUS;
    let hav_tolerance = hav(tolerance);
    let lat3 = point.lat_rad();
    let lng3 = point.lng_rad();
    let mut lat1 = prev.lat_rad();
    let mut lng1 = prev.lng_rad();
    if geodesic {
        for vertex in poly {
            let lat2 = vertex.lat_rad();
            let lng2 = vertex.lng_rad();
            if is_on_segment_gc(lat1, lng1, lat2, lng2, lat3, lng3, hav_tolerance) {
                return true;
            }
            lat1 = lat2;
            lng1 = lng2;
        }
        return false;
    }

    let min_acceptable = lat3 - tolerance;
    let max_acceptable = lat3 + tolerance;
    let mut y1 = mercator(lat1);
    let y3 = mercator(lat3);
    for vertex in poly {
        let lat2 = vertex.lat_rad();
        let lng2 = vertex.lng_rad();
        let y2 = mercator(lat2);
        if lat1.max(lat2) >= min_acceptable && lat1.min(lat2) <= max_acceptable {
            let projection = RhumbProjection::new(lng1, y1, lng2, y2);
            let on_segment = projection
                .candidates(lat3, y3, lng3)
                .any(|candidate| candidate.hav_distance < hav_tolerance);
            if on_segment {
                return true;
            }
        }
        lat1 = lat2;
        lng1 = lng2;
        y1 = y2;
    }
    false
}

/// Closest point of one rhumb segment to a query point, in Mercator space.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RhumbCandidate {
    pub lat: f64,
    pub lng: f64,
    pub hav_distance: f64,
}

/// A rhumb segment from `(lng1, y1)` to `(lng2, y2)` in Mercator space with
/// longitudes taken relative to the start vertex.
pub(crate) struct RhumbProjection {
    lng1: f64,
    y1: f64,
    x2: f64,
    dy: f64,
}

impl RhumbProjection {
    pub(crate) fn new(lng1: f64, y1: f64, lng2: f64, y2: f64) -> Self {
        RhumbProjection {
            lng1,
            y1,
            x2: wrap_lng(lng2 - lng1),
            dy: y2 - y1,
        }
    }

    /// Projects the query point onto the segment for the three longitude
    /// unwraps `x`, `x + 2π` and `x - 2π`, so segments crossing the
    /// antimeridian are handled.
    pub(crate) fn candidates(
        &self,
        lat3: f64,
        y3: f64,
        lng3: f64,
    ) -> impl Iterator<Item = RhumbCandidate> + '_ {
        let x3_base = wrap_lng(lng3 - self.lng1);
        [x3_base, x3_base + TAU, x3_base - TAU]
            .into_iter()
            .map(move |x3| {
                let len2 = self.x2 * self.x2 + self.dy * self.dy;
                let t = if len2 <= 0.0 {
                    0.0
                } else {
                    clamp((x3 * self.x2 + (y3 - self.y1) * self.dy) / len2, 0.0, 1.0)
                };
                let x_closest = t * self.x2;
                let y_closest = self.y1 + t * self.dy;
                let lat_closest = inverse_mercator(y_closest);
                RhumbCandidate {
                    lat: lat_closest,
                    lng: self.lng1 + x_closest,
                    hav_distance: hav_distance(lat3, lat_closest, x3 - x_closest),
                }
            })
    }
}

/// Sine of the angle between the bearings 1→3 and 1→2.
///
/// Degenerate input, where either bearing is undefined, yields `1.0` so the
/// caller treats the point as off the segment's line.
fn sin_delta_bearing(lat1: f64, lng1: f64, lat2: f64, lng2: f64, lat3: f64, lng3: f64) -> f64 {
    let sin_lat1 = lat1.sin();
    let cos_lat2 = lat2.cos();
    let cos_lat3 = lat3.cos();
    let lat31 = lat3 - lat1;
    let lng31 = lng3 - lng1;
    let lat21 = lat2 - lat1;
    let lng21 = lng2 - lng1;
    let a = lng31.sin() * cos_lat3;
    let c = lng21.sin() * cos_lat2;
    let b = lat31.sin() + 2.0 * sin_lat1 * cos_lat3 * hav(lng31);
    let d = lat21.sin() + 2.0 * sin_lat1 * cos_lat2 * hav(lng21);
    let denom = (a * a + b * b) * (c * c + d * d);
    if denom <= 0.0 {
        1.0
    } else {
        (a * d - b * c) / denom.sqrt()
    }
}

/// Tests whether point 3 lies on the great circle segment 1→2 within
/// `hav_tolerance`.
///
/// All coordinates are in radians. The point qualifies if it is close to
/// either endpoint, or if its cross-track distance is within tolerance and
/// its along-track position falls between the endpoints.
pub fn is_on_segment_gc(
    lat1: f64,
    lng1: f64,
    lat2: f64,
    lng2: f64,
    lat3: f64,
    lng3: f64,
    hav_tolerance: f64,
) -> bool {
    let hav_dist13 = hav_distance(lat1, lat3, lng1 - lng3);
    if hav_dist13 <= hav_tolerance {
        return true;
    }
    let hav_dist23 = hav_distance(lat2, lat3, lng2 - lng3);
    if hav_dist23 <= hav_tolerance {
        return true;
    }
    let sin_bearing = sin_delta_bearing(lat1, lng1, lat2, lng2, lat3, lng3);
    let sin_dist13 = sin_from_hav(hav_dist13);
    let hav_cross_track = hav_from_sin(sin_dist13 * sin_bearing);
    if hav_cross_track > hav_tolerance {
        return false;
    }
    let hav_dist12 = hav_distance(lat1, lat2, lng1 - lng2);
    let term = hav_dist12 + hav_cross_track * (1.0 - 2.0 * hav_dist12);
    if hav_dist13 > term || hav_dist23 > term {
        return false;
    }
    if hav_dist12 < LONG_SEGMENT_HAV {
        return true;
    }
    let cos_cross_track = 1.0 - 2.0 * hav_cross_track;
    let hav_along_track13 = (hav_dist13 - hav_cross_track) / cos_cross_track;
    let hav_along_track23 = (hav_dist23 - hav_cross_track) / cos_cross_track;
    sin_sum_from_hav(hav_along_track13, hav_along_track23) > 0.0
}

/// Projection parameter of `p` onto the line `start`→`end`, computed in
/// plain latitude/longitude space. `None` for a zero-length segment.
fn line_parameter(p: &GeoPoint, start: &GeoPoint, end: &GeoPoint) -> Option<f64> {
    let s0lat = p.lat_rad();
    let s0lng = p.lng_rad();
    let s1lat = start.lat_rad();
    let s1lng = start.lng_rad();
    let s2s1lat = end.lat_rad() - s1lat;
    let s2s1lng = end.lng_rad() - s1lng;
    let len2 = s2s1lat * s2s1lat + s2s1lng * s2s1lng;
    if len2 <= 0.0 {
        return None;
    }
    Some(((s0lat - s1lat) * s2s1lat + (s0lng - s1lng) * s2s1lng) / len2)
}

/// Distance in meters from `p` to the segment `start`→`end`.
///
/// The foot point is found with a planar projection in latitude/longitude
/// space, which is only accurate for short segments. Outside the segment the
/// distance to the nearer endpoint is returned.
pub fn distance_to_line(p: &GeoPoint, start: &GeoPoint, end: &GeoPoint) -> f64 {
    let Some(u) = line_parameter(p, start, end) else {
        return compute_distance_between(p, end);
    };
    if u <= 0.0 {
        return compute_distance_between(p, start);
    }
    if u >= 1.0 {
        return compute_distance_between(p, end);
    }
    // Offsets from `start`, measured as if they were positions.
    let sa = GeoPoint::new(p.latitude - start.latitude, p.longitude - start.longitude);
    let sb = GeoPoint::new(
        u * (end.latitude - start.latitude),
        u * (end.longitude - start.longitude),
    );
    compute_distance_between(&sa, &sb)
}

/// Foot point of `p` on the segment `start`→`end`, using the same planar
/// projection as [`distance_to_line`].
pub fn point_intersection_to_line(p: &GeoPoint, start: &GeoPoint, end: &GeoPoint) -> GeoPoint {
    let Some(u) = line_parameter(p, start, end) else {
        return *start;
    };
    if u <= 0.0 {
        return *start;
    }
    if u >= 1.0 {
        return *end;
    }
    GeoPoint::new(
        start.latitude + u * (end.latitude - start.latitude),
        start.longitude + u * (end.longitude - start.longitude),
    )
}

/// Returns `true` if the first point equals the last one.
pub fn is_closed_polygon(points: &[GeoPoint]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

/// Simplifies a polyline or polygon with the Douglas-Peucker algorithm.
///
/// Points deviating less than `tolerance` meters (see [`distance_to_line`])
/// from the simplified line are dropped. The first and last point are always
/// kept. For a closed polygon the closing point is kept verbatim.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidArgument`] if `points` is empty or
/// `tolerance` is not greater than zero.
pub fn simplify(points: &[GeoPoint], tolerance: f64) -> GeometryResult<Vec<GeoPoint>> {
    let n = points.len();
    if n < 1 {
        return Err(GeometryError::InvalidArgument(
            "polyline must have at least 1 point",
        ));
    }
    if tolerance.is_nan() || tolerance <= 0.0 {
        return Err(GeometryError::InvalidArgument(
            "tolerance must be greater than zero",
        ));
    }

    let mut working = points.to_vec();
    if n > 1 && is_closed_polygon(points) {
        // Keeps the closing point from collapsing onto the first one.
        let last = points[n - 1];
        working[n - 1] = GeoPoint::new(
            last.latitude + CLOSING_POINT_OFFSET,
            last.longitude + CLOSING_POINT_OFFSET,
        );
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    if n > 2 {
        let mut stack = vec![(0, n - 1)];
        while let Some((first, last)) = stack.pop() {
            let mut max_dist = 0.0;
            let mut max_idx = first;
            for idx in first + 1..last {
                let dist = distance_to_line(&working[idx], &working[first], &working[last]);
                if dist > max_dist {
                    max_dist = dist;
                    max_idx = idx;
                }
            }
            if max_dist > tolerance {
                keep[max_idx] = true;
                stack.push((first, max_idx));
                stack.push((max_idx, last));
            }
        }
    }

    let simplified: Vec<GeoPoint> = points
        .iter()
        .zip(keep)
        .filter_map(|(point, keep)| keep.then_some(*point))
        .collect();
    debug!("Simplified {} points to {}", n, simplified.len());
    Ok(simplified)
}
