// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use approx::assert_abs_diff_eq;
use common::position::GeoPoint;
use common::route::{Route, RouteError, RoutePoint, SearchDirection, Segment, TravelMode};
use common::test_helper::route::{get_route, get_route_as_json, get_route_points};

#[test]
pub fn deserialize_route_from_json() {
    let route = Route::from_json(get_route_as_json())
        .unwrap_or_else(|e| panic!("Failed to deserialize the raw json. Reason: {e}"));
    let expected = get_route();

    assert_eq!(route.segments(), expected.segments());
    assert_eq!(route.travel_mode(), TravelMode::Driving);
    assert_eq!(route.points().len(), expected.points().len());
    for (lhs, rhs) in route.points().iter().zip(expected.points()) {
        assert_abs_diff_eq!(lhs.longitude, rhs.longitude, epsilon = 1e-12);
        assert_abs_diff_eq!(lhs.latitude, rhs.latitude, epsilon = 1e-12);
    }
    assert!(!route.is_ended());
}

#[test]
pub fn route_without_points_is_rejected() {
    let route = Route::new(vec![], vec![], TravelMode::Walking);
    assert_eq!(route, Err(RouteError::NoPoints));
}

#[test]
pub fn gaps_between_segments_are_rejected() {
    let route = Route::new(
        get_route_points(6),
        vec![Segment::new(0, 2, "first"), Segment::new(4, 5, "second")],
        TravelMode::Biking,
    );
    assert_eq!(route, Err(RouteError::Discontiguous { index: 1 }));
}

#[test]
pub fn segments_must_reach_the_last_point() {
    let route = Route::new(
        get_route_points(6),
        vec![Segment::new(0, 2, "first"), Segment::new(3, 4, "second")],
        TravelMode::Biking,
    );
    assert_eq!(
        route,
        Err(RouteError::SegmentOutOfBounds {
            index: 1,
            end: 4,
            len: 6
        })
    );
}

#[test]
pub fn inverted_segment_is_rejected() {
    let route = Route::new(
        get_route_points(3),
        vec![Segment::new(0, 2, "first"), Segment::new(2, 1, "second")],
        TravelMode::Driving,
    );
    assert!(matches!(route, Err(RouteError::InvertedSegment { index: 1, .. })));
}

#[test]
pub fn boundary_vertex_belongs_to_the_starting_segment() {
    let route = get_route();
    assert_eq!(route.segment_index_of(0), Some(0));
    assert_eq!(route.segment_index_of(9), Some(0));
    assert_eq!(route.segment_index_of(10), Some(1));
    assert_eq!(route.segment_index_of(30), Some(2));
    assert_eq!(route.segment_index_of(31), None);
    assert_eq!(route.segment_start_point(1), Some(&route.points()[10]));
}

#[test]
pub fn origin_can_be_moved_and_reset() {
    let mut route = get_route();
    route.set_origin(GeoPoint::new(1.0, 1.0));
    assert_eq!(route.origin(), GeoPoint::new(1.0, 1.0));
    route.reset_origin();
    assert_eq!(route.origin(), route.start_point());
    assert_eq!(route.destination(), *route.points().last().unwrap());
}

#[test]
pub fn route_point_survives_json() {
    let point = RoutePoint::new(
        GeoPoint::new(0.0, 0.001),
        2,
        SearchDirection::Backward,
        Some(GeoPoint::new(0.0, 0.0005)),
    )
    .with_segment(1)
    .with_proximity(false, true);
    let json = point.to_json().unwrap();
    assert_eq!(RoutePoint::from_json(&json).unwrap(), point);
}
