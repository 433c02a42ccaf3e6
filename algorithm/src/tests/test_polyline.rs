// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::error::GeometryError;
use crate::polyline::{decode, encode};
use approx::assert_abs_diff_eq;
use common::position::GeoPoint;
use common::test_helper::route::get_route;

fn reference_points() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(38.5, -120.2),
        GeoPoint::new(40.7, -120.95),
        GeoPoint::new(43.252, -126.453),
    ]
}

#[test]
fn decode_reference_polyline() {
    let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
    assert_eq!(points.len(), 3);
    for (decoded, expected) in points.iter().zip(reference_points()) {
        assert_abs_diff_eq!(decoded.latitude, expected.latitude, epsilon = 1e-9);
        assert_abs_diff_eq!(decoded.longitude, expected.longitude, epsilon = 1e-9);
    }
}

#[test]
fn empty_input() {
    assert_eq!(encode(&[]), "");
    assert_eq!(decode("").unwrap(), Vec::<GeoPoint>::new());
}

#[test]
fn route_survives_encoding() {
    let route = get_route();
    let decoded = decode(&encode(route.points())).unwrap();
    assert_eq!(decoded.len(), route.points().len());
    for (decoded, expected) in decoded.iter().zip(route.points()) {
        assert_abs_diff_eq!(decoded.latitude, expected.latitude, epsilon = 1e-5);
        assert_abs_diff_eq!(decoded.longitude, expected.longitude, epsilon = 1e-5);
    }
}

#[test]
fn off_grid_points_are_quantized() {
    let points = vec![GeoPoint::new(52.0258333, 11.279166666), GeoPoint::new(-33.8688197, 151.2092955)];
    let decoded = decode(&encode(&points)).unwrap();
    assert_abs_diff_eq!(decoded[0].latitude, 52.02583, epsilon = 1e-9);
    assert_abs_diff_eq!(decoded[0].longitude, 11.27917, epsilon = 1e-9);
    assert_abs_diff_eq!(decoded[1].latitude, -33.86882, epsilon = 1e-9);
    assert_abs_diff_eq!(decoded[1].longitude, 151.2093, epsilon = 1e-9);
}

#[test]
fn truncated_group_is_rejected() {
    // '_' carries the continuation bit.
    let result = decode("_p~iF~ps|U_");
    assert_eq!(
        result,
        Err(GeometryError::MalformedInput {
            position: 11,
            reason: "unterminated group"
        })
    );
}

#[test]
fn latitude_without_longitude_is_rejected() {
    let result = decode("_p~iF");
    assert_eq!(
        result,
        Err(GeometryError::MalformedInput {
            position: 5,
            reason: "latitude without longitude"
        })
    );
}

#[test]
fn foreign_bytes_are_rejected() {
    assert!(matches!(
        decode("_p~iF ps|U"),
        Err(GeometryError::MalformedInput { position: 5, .. })
    ));
    assert!(matches!(
        decode("_p~iF~ps|Uä"),
        Err(GeometryError::MalformedInput { position: 10, .. })
    ));
}

#[test]
fn overlong_group_is_rejected() {
    let overlong = "~".repeat(14) + "?";
    assert!(matches!(
        decode(&overlong),
        Err(GeometryError::MalformedInput {
            reason: "value overflows 64 bits",
            ..
        })
    ));
}

#[test]
fn coordinate_sum_overflow_is_rejected() {
    // Twelve full chunks and a final 7 decode to a delta of -2^62.
    let huge_delta = "~".repeat(12) + "F";
    let encoded = format!("{huge_delta}?{huge_delta}?{huge_delta}?");
    assert!(matches!(
        decode(&encoded),
        Err(GeometryError::MalformedInput {
            reason: "coordinate overflows 64 bits",
            position: 41,
        })
    ));
}
