// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::geo_math::*;
use approx::assert_relative_eq;
use common::position::GeoPoint;
use std::f64::consts::PI;

#[test]
fn wrap_keeps_values_in_range() {
    assert_eq!(wrap(0.5, -1.0, 1.0), 0.5);
    assert_eq!(wrap(1.0, -1.0, 1.0), -1.0);
    assert_relative_eq!(wrap(1.5, -1.0, 1.0), -0.5);
    assert_relative_eq!(wrap(-3.5, -1.0, 1.0), 0.5);
    assert_eq!(wrap_lng(PI), -PI);
    assert_relative_eq!(wrap_lng(3.0 * PI / 2.0), -PI / 2.0);
}

#[test]
fn clamp_and_modulo() {
    assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
    assert_eq!(clamp(-2.0, 0.0, 1.0), 0.0);
    assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
    assert_relative_eq!(modulo(-1.0, 3.0), 2.0);
    assert_relative_eq!(modulo(7.0, 3.0), 1.0);
}

#[test]
fn mercator_is_inverted() {
    for lat in [-1.2, -0.5, 0.0, 0.3, 1.4] {
        assert_relative_eq!(inverse_mercator(mercator(lat)), lat, epsilon = 1e-12);
    }
    assert_eq!(mercator(0.0), 0.0);
}

#[test]
fn haversine_helpers_are_consistent() {
    let angle = 0.4;
    assert_relative_eq!(arc_hav(hav(angle)), angle, epsilon = 1e-12);
    assert_relative_eq!(sin_from_hav(hav(angle)), angle.sin(), epsilon = 1e-12);
    assert_relative_eq!(hav_from_sin(angle.sin()), hav(angle), epsilon = 1e-12);
    assert_relative_eq!(
        sin_sum_from_hav(hav(0.2), hav(0.3)),
        (0.5_f64).sin(),
        epsilon = 1e-12
    );
}

#[test]
fn one_degree_along_the_equator() {
    let from = GeoPoint::new(0.0, 0.0);
    let to = GeoPoint::new(0.0, 1.0);
    assert_relative_eq!(
        compute_distance_between(&from, &to),
        EARTH_RADIUS * PI / 180.0,
        epsilon = 1e-6
    );
    assert_eq!(compute_distance_between(&from, &from), 0.0);
}

#[test]
fn heading_in_degrees() {
    let origin = GeoPoint::new(0.0, 0.0);
    assert_relative_eq!(compute_heading(&origin, &GeoPoint::new(1.0, 0.0)), 0.0, epsilon = 1e-9);
    assert_relative_eq!(compute_heading(&origin, &GeoPoint::new(0.0, 1.0)), 90.0, epsilon = 1e-9);
    assert_relative_eq!(compute_heading(&origin, &GeoPoint::new(0.0, -1.0)), -90.0, epsilon = 1e-9);
    assert_relative_eq!(compute_heading(&origin, &GeoPoint::new(-1.0, 0.0)), -180.0, epsilon = 1e-9);
}
