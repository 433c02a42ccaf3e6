// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Nearest point on a path.
//!
//! The geodesic search is incremental: it starts at a hint, usually the
//! vertex of the previous match, and walks along the path only as long as
//! the distance to the query keeps shrinking. Repeated queries along a long
//! route therefore touch a handful of vertices each.

use crate::error::{GeometryError, GeometryResult};
use crate::geo_math::{EARTH_RADIUS, arc_hav, compute_distance_between, hav, mercator, wrap};
use crate::poly_util::{
    RhumbProjection, distance_to_line, is_on_segment_gc, point_intersection_to_line,
};
use common::position::GeoPoint;
use common::route::{RoutePoint, SearchDirection};
use tracing::trace;

/// Snaps `point` onto `path`.
///
/// With `geodesic` set, the search starts at `search_hint` (or the first
/// vertex if the hint is absent or out of range) and walks towards the nearer
/// neighbour. Every vertex whose incoming segment passes within `tolerance`
/// meters of `point` is a candidate. The walk stops at the first vertex that
/// is farther away than the best candidate, and the match is then refined
/// onto the closer of the two edges adjacent to that candidate.
///
/// Without `geodesic`, every segment is projected in Mercator space and the
/// closest foot point within tolerance wins.
///
/// Returns `Ok(None)` when nothing on the path is within tolerance.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidArgument`] if `path` is empty.
pub fn project_onto_path(
    point: &GeoPoint,
    path: &[GeoPoint],
    closed: bool,
    geodesic: bool,
    tolerance: f64,
    search_hint: Option<usize>,
) -> GeometryResult<Option<RoutePoint>> {
    if path.is_empty() {
        return Err(GeometryError::InvalidArgument(
            "path must have at least 1 point",
        ));
    }
    let hav_tolerance = hav(tolerance / EARTH_RADIUS);
    let result = if geodesic {
        walk_geodesic(point, path, closed, hav_tolerance, search_hint)
    } else {
        scan_rhumb(point, path, closed, hav_tolerance)
    };
    Ok(result)
}

fn step(index: usize, direction: SearchDirection, last: usize) -> Option<usize> {
    match direction {
        SearchDirection::Forward if index < last => Some(index + 1),
        SearchDirection::Backward if index > 0 => Some(index - 1),
        _ => None,
    }
}

fn step_back(index: usize, direction: SearchDirection, last: usize) -> Option<usize> {
    match direction {
        SearchDirection::Forward if index > 0 => Some(index - 1),
        SearchDirection::Backward if index < last => Some(index + 1),
        _ => None,
    }
}

/// Vertex the walk came from when it reaches `index`.
fn trailing_vertex(
    path: &[GeoPoint],
    index: usize,
    direction: SearchDirection,
    closed: bool,
) -> GeoPoint {
    let last = path.len() - 1;
    match step_back(index, direction, last) {
        Some(previous) => path[previous],
        None if closed => match direction {
            SearchDirection::Forward => path[last],
            SearchDirection::Backward => path[0],
        },
        None => path[index],
    }
}

fn next_vertex(path: &[GeoPoint], index: usize, direction: SearchDirection) -> Option<GeoPoint> {
    step(index, direction, path.len() - 1).map(|next| path[next])
}

fn initial_direction(point: &GeoPoint, path: &[GeoPoint], start: usize) -> SearchDirection {
    let last = path.len() - 1;
    if start == 0 {
        SearchDirection::Forward
    } else if start == last {
        SearchDirection::Backward
    } else {
        let to_previous = compute_distance_between(point, &path[start - 1]);
        let to_next = compute_distance_between(point, &path[start + 1]);
        if to_previous < to_next {
            SearchDirection::Backward
        } else {
            SearchDirection::Forward
        }
    }
}

fn walk_geodesic(
    point: &GeoPoint,
    path: &[GeoPoint],
    closed: bool,
    hav_tolerance: f64,
    search_hint: Option<usize>,
) -> Option<RoutePoint> {
    let last = path.len() - 1;
    let start = search_hint.filter(|hint| *hint <= last).unwrap_or(0);
    let direction = initial_direction(point, path, start);
    let lat3 = point.lat_rad();
    let lng3 = point.lng_rad();

    let mut best: Option<(usize, f64)> = None;
    let mut index = start;
    loop {
        let vertex = &path[index];
        let dist = compute_distance_between(point, vertex);
        if let Some((best_index, best_dist)) = best
            && best_dist < dist
        {
            trace!("Path walk from {} stopped at {}", start, index);
            return Some(refine(point, path, best_index, direction));
        }
        if dist == 0.0 {
            return Some(RoutePoint::new(
                *vertex,
                index,
                direction,
                next_vertex(path, index, direction),
            ));
        }
        let previous = trailing_vertex(path, index, direction, closed);
        if is_on_segment_gc(
            previous.lat_rad(),
            previous.lng_rad(),
            vertex.lat_rad(),
            vertex.lng_rad(),
            lat3,
            lng3,
            hav_tolerance,
        ) {
            best = Some((index, dist));
        }
        match step(index, direction, last) {
            Some(next) => index = next,
            None => break,
        }
    }
    best.map(|(best_index, _)| refine(point, path, best_index, direction))
}

/// Projects `point` onto the closer edge adjacent to vertex `index`.
fn refine(point: &GeoPoint, path: &[GeoPoint], index: usize, direction: SearchDirection) -> RoutePoint {
    let last = path.len() - 1;
    let vertex = &path[index];
    let other = if last == 0 {
        vertex
    } else if index == 0 {
        &path[1]
    } else if index == last {
        &path[last - 1]
    } else {
        let to_previous = distance_to_line(point, vertex, &path[index - 1]);
        let to_next = distance_to_line(point, vertex, &path[index + 1]);
        if to_previous < to_next || to_next.is_nan() {
            &path[index - 1]
        } else {
            &path[index + 1]
        }
    };
    RoutePoint::new(
        point_intersection_to_line(point, vertex, other),
        index,
        direction,
        next_vertex(path, index, direction),
    )
}

fn scan_rhumb(
    point: &GeoPoint,
    path: &[GeoPoint],
    closed: bool,
    hav_tolerance: f64,
) -> Option<RoutePoint> {
    let last = path.len() - 1;
    let tolerance = arc_hav(hav_tolerance);
    let lat3 = point.lat_rad();
    let lng3 = point.lng_rad();
    let y3 = mercator(lat3);

    let mut edges: Vec<(usize, usize)> = (0..last).map(|index| (index, index + 1)).collect();
    if closed || last == 0 {
        edges.insert(0, (last, 0));
    }

    // (hav distance, start vertex, end vertex, lat, lng) of the closest foot point.
    let mut best: Option<(f64, usize, usize, f64, f64)> = None;
    for (from, to) in edges {
        let lat1 = path[from].lat_rad();
        let lat2 = path[to].lat_rad();
        if lat1.max(lat2) < lat3 - tolerance || lat1.min(lat2) > lat3 + tolerance {
            continue;
        }
        let projection = RhumbProjection::new(
            path[from].lng_rad(),
            mercator(lat1),
            path[to].lng_rad(),
            mercator(lat2),
        );
        for candidate in projection.candidates(lat3, y3, lng3) {
            if candidate.hav_distance > hav_tolerance {
                continue;
            }
            if best.is_none_or(|(hav_distance, ..)| candidate.hav_distance < hav_distance) {
                best = Some((candidate.hav_distance, from, to, candidate.lat, candidate.lng));
            }
        }
    }

    best.map(|(_, from, to, lat, lng)| {
        let matched = GeoPoint::new(lat.to_degrees(), wrap(lng.to_degrees(), -180.0, 180.0));
        let next_point = (from != to).then(|| path[to]);
        RoutePoint::new(matched, from, SearchDirection::Forward, next_point)
    })
}
