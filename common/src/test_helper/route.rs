// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{
    position::{Fix, GeoPoint},
    route::{Route, Segment, TravelMode},
};
use chrono::DateTime;

/// Spacing between the vertices of [`get_route`] in degrees of longitude (about 55.6 m).
pub const ROUTE_POINT_SPACING: f64 = 0.0005;

/// Number of vertices of each segment of [`get_route`], the shared boundary vertex excluded.
pub const POINTS_PER_SEGMENT: usize = 10;

pub fn get_route_as_json<'a>() -> &'a str {
    include_str!("../../../assets/routes/equator.json")
}

/// Points running east along the equator.
pub fn get_route_points(count: usize) -> Vec<GeoPoint> {
    (0..count)
        .map(|i| GeoPoint::new(0.0, i as f64 * ROUTE_POINT_SPACING))
        .collect()
}

/// A three segment route along the equator.
///
/// Each segment spans [`POINTS_PER_SEGMENT`] spacings, so the start of the
/// next segment is about 556 m away from the start of the current one.
pub fn get_route() -> Route {
    let points = get_route_points(3 * POINTS_PER_SEGMENT + 1);
    let segments = vec![
        Segment::new(0, 10, "Head east on Equator Road"),
        Segment::new(10, 20, "Continue onto Meridian Avenue"),
        Segment::new(20, 30, "Arrive at destination"),
    ];
    Route::new(points, segments, TravelMode::Driving)
        .unwrap_or_else(|e| panic!("Failed to build test route. Reason: {e}"))
}

/// A device fix at the given coordinates with a fixed timestamp.
pub fn get_fix(latitude: f64, longitude: f64) -> Fix {
    Fix::new(latitude, longitude, 5.0, DateTime::UNIX_EPOCH)
}
