// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::error::GeometryError;
use crate::geo_math::compute_distance_between;
use crate::poly_util::*;
use approx::assert_relative_eq;
use common::position::GeoPoint;

fn square() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 10.0),
        GeoPoint::new(10.0, 10.0),
        GeoPoint::new(10.0, 0.0),
        GeoPoint::new(0.0, 0.0),
    ]
}

#[test]
fn point_inside_square() {
    let polygon = square();
    let inside = GeoPoint::new(5.0, 5.0);
    assert!(contains_location(&inside, &polygon, true));
    assert!(contains_location(&inside, &polygon, false));
}

#[test]
fn point_outside_square() {
    let polygon = square();
    let outside = GeoPoint::new(20.0, 20.0);
    assert!(!contains_location(&outside, &polygon, true));
    assert!(!contains_location(&outside, &polygon, false));
}

#[test]
fn vertex_is_inside() {
    let polygon = square();
    assert!(contains_location(&GeoPoint::new(10.0, 10.0), &polygon, true));
    assert!(contains_location(&GeoPoint::new(10.0, 10.0), &polygon, false));
}

#[test]
fn open_polygon_is_closed_implicitly() {
    let polygon = &square()[..4];
    assert!(contains_location(&GeoPoint::new(5.0, 5.0), polygon, true));
}

#[test]
fn poles_and_empty_polygons_contain_nothing() {
    let polygon = square();
    assert!(!contains_location(&GeoPoint::new(90.0, 0.0), &polygon, true));
    assert!(!contains_location(&GeoPoint::new(-90.0, 0.0), &polygon, false));
    assert!(!contains_location(&GeoPoint::new(5.0, 5.0), &[], true));
}

#[test]
fn point_on_path() {
    let path = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)];
    let query = GeoPoint::new(0.0, 0.5);
    assert!(is_location_on_path(&query, &path, true, 1.0));
    assert!(is_location_on_path(&query, &path, false, 1.0));
}

#[test]
fn point_beside_path() {
    let path = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)];
    // About 111 m north of the path.
    let query = GeoPoint::new(0.001, 0.5);
    assert!(!is_location_on_path(&query, &path, true, 1.0));
    assert!(!is_location_on_path(&query, &path, false, 1.0));
    assert!(is_location_on_path(&query, &path, true, 200.0));
    assert!(is_location_on_path(&query, &path, false, 200.0));
}

#[test]
fn point_beyond_path_end() {
    let path = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)];
    let query = GeoPoint::new(0.0, 1.1);
    assert!(!is_location_on_path(&query, &path, true, DEFAULT_TOLERANCE));
    assert!(!is_location_on_path(&query, &path, false, DEFAULT_TOLERANCE));
    assert!(!is_location_on_path(&query, &[], true, DEFAULT_TOLERANCE));
}

#[test]
fn path_across_the_antimeridian() {
    let path = vec![GeoPoint::new(0.0, 179.5), GeoPoint::new(0.0, -179.5)];
    let query = GeoPoint::new(0.0, 180.0);
    assert!(is_location_on_path(&query, &path, true, 1.0));
    assert!(is_location_on_path(&query, &path, false, 1.0));
}

#[test]
fn point_on_closing_edge() {
    let polygon = &square()[..4];
    // The edge from (10, 0) back to (0, 0) only exists when the polygon is closed.
    let query = GeoPoint::new(5.0, 0.0);
    assert!(is_location_on_edge(&query, polygon, true, 1.0));
    assert!(is_location_on_edge(&query, polygon, false, 1.0));
    assert!(!is_location_on_path(&query, polygon, true, 1.0));
    assert!(!is_location_on_edge(&GeoPoint::new(5.0, 5.0), polygon, true, DEFAULT_TOLERANCE));
}

#[test]
fn great_circle_segment_test() {
    let lat1 = 0.0_f64.to_radians();
    let lng1 = 0.0_f64.to_radians();
    let lat2 = 0.0_f64.to_radians();
    let lng2 = 90.0_f64.to_radians();
    let tolerance = crate::geo_math::hav(1e-6);
    assert!(is_on_segment_gc(lat1, lng1, lat2, lng2, 0.0, 45.0_f64.to_radians(), tolerance));
    assert!(!is_on_segment_gc(lat1, lng1, lat2, lng2, 0.0, 135.0_f64.to_radians(), tolerance));
    assert!(!is_on_segment_gc(lat1, lng1, lat2, lng2, 0.1, 45.0_f64.to_radians(), tolerance));
    // Degenerate segment, only the endpoint matches.
    assert!(is_on_segment_gc(lat1, lng1, lat1, lng1, lat1, lng1, tolerance));
    assert!(!is_on_segment_gc(lat1, lng1, lat1, lng1, 0.0, 0.01, tolerance));
}

#[test]
fn long_great_circle_segment() {
    // More than 0.74 in haversine terms, about 138 degrees.
    let lng2 = 138.0_f64.to_radians();
    let tolerance = crate::geo_math::hav(1e-6);
    assert!(is_on_segment_gc(0.0, 0.0, 0.0, lng2, 0.0, 100.0_f64.to_radians(), tolerance));
    assert!(!is_on_segment_gc(0.0, 0.0, 0.0, lng2, 0.0, 150.0_f64.to_radians(), tolerance));
}

#[test]
fn distance_to_segment() {
    let start = GeoPoint::new(0.0, 0.0);
    let end = GeoPoint::new(0.0, 0.01);
    let above_middle = GeoPoint::new(0.001, 0.005);
    assert_relative_eq!(
        distance_to_line(&above_middle, &start, &end),
        compute_distance_between(&GeoPoint::new(0.001, 0.0), &GeoPoint::new(0.0, 0.0)),
        epsilon = 1e-6
    );
    assert_eq!(
        point_intersection_to_line(&above_middle, &start, &end),
        GeoPoint::new(0.0, 0.005)
    );

    let before_start = GeoPoint::new(0.0, -0.001);
    assert_relative_eq!(
        distance_to_line(&before_start, &start, &end),
        compute_distance_between(&before_start, &start)
    );
    assert_eq!(point_intersection_to_line(&before_start, &start, &end), start);

    let after_end = GeoPoint::new(0.0005, 0.012);
    assert_relative_eq!(
        distance_to_line(&after_end, &start, &end),
        compute_distance_between(&after_end, &end)
    );
    assert_eq!(point_intersection_to_line(&after_end, &start, &end), end);
}

#[test]
fn distance_to_zero_length_segment() {
    let vertex = GeoPoint::new(1.0, 1.0);
    let query = GeoPoint::new(1.001, 1.0);
    let distance = distance_to_line(&query, &vertex, &vertex);
    assert!(!distance.is_nan());
    assert_relative_eq!(distance, compute_distance_between(&query, &vertex));
    assert_eq!(point_intersection_to_line(&query, &vertex, &vertex), vertex);
}

#[test]
fn closed_polygon_detection() {
    assert!(is_closed_polygon(&square()));
    assert!(!is_closed_polygon(&square()[..4]));
    assert!(is_closed_polygon(&[GeoPoint::new(1.0, 2.0)]));
    assert!(!is_closed_polygon(&[]));
}

#[test]
fn simplify_closed_square() {
    let polygon = vec![
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 0.005),
        GeoPoint::new(0.0, 0.01),
        GeoPoint::new(0.01, 0.01),
        GeoPoint::new(0.01, 0.0),
        GeoPoint::new(0.0, 0.0),
    ];
    let simplified = simplify(&polygon, 1.0).unwrap();
    assert_eq!(
        simplified,
        vec![polygon[0], polygon[2], polygon[3], polygon[4], polygon[5]]
    );
    assert!(is_closed_polygon(&simplified));
}

#[test]
fn simplify_straight_line() {
    let line: Vec<GeoPoint> = (0..20)
        .map(|i| GeoPoint::new(0.0, i as f64 * 0.001))
        .collect();
    let simplified = simplify(&line, 0.5).unwrap();
    assert_eq!(simplified, vec![line[0], line[19]]);
}

#[test]
fn simplify_keeps_short_input() {
    let single = vec![GeoPoint::new(3.0, 4.0)];
    assert_eq!(simplify(&single, 1.0).unwrap(), single);
    let pair = vec![GeoPoint::new(3.0, 4.0), GeoPoint::new(3.0, 4.0)];
    assert_eq!(simplify(&pair, 1.0).unwrap(), pair);
}

#[test]
fn simplify_rejects_invalid_arguments() {
    let line = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)];
    assert!(matches!(
        simplify(&line, 0.0),
        Err(GeometryError::InvalidArgument(_))
    ));
    assert!(matches!(
        simplify(&line, -1.0),
        Err(GeometryError::InvalidArgument(_))
    ));
    assert!(matches!(
        simplify(&[], 1.0),
        Err(GeometryError::InvalidArgument(_))
    ));
}
