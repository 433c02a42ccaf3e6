// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Scalar spherical trigonometry.
//!
//! All angles are in radians unless a function states otherwise. Distances
//! on the sphere are expressed as the haversine of the central angle; multiply
//! the arc by [`EARTH_RADIUS`] to obtain meters.

use common::position::GeoPoint;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Mean earth radius in meters.
pub const EARTH_RADIUS: f64 = 6_371_009.0;

/// Restricts `x` to `[low, high]`.
pub fn clamp(x: f64, low: f64, high: f64) -> f64 {
    if x < low {
        low
    } else if x > high {
        high
    } else {
        x
    }
}

/// Non-negative remainder of `x / m`.
pub fn modulo(x: f64, m: f64) -> f64 {
    ((x % m) + m) % m
}

/// Wraps `n` into `[min, max)`.
///
/// Values already inside the range are returned untouched, so an exact `max`
/// maps to `min` but everything else keeps its bit pattern.
pub fn wrap(n: f64, min: f64, max: f64) -> f64 {
    if n >= min && n < max {
        n
    } else {
        modulo(n - min, max - min) + min
    }
}

/// Wraps a longitude difference into `[-π, π)`.
pub fn wrap_lng(delta: f64) -> f64 {
    wrap(delta, -PI, PI)
}

/// Mercator y for latitude `lat`.
pub fn mercator(lat: f64) -> f64 {
    (lat * 0.5 + FRAC_PI_4).tan().ln()
}

/// Latitude for Mercator y.
pub fn inverse_mercator(y: f64) -> f64 {
    2.0 * y.exp().atan() - FRAC_PI_2
}

/// Haversine, `sin²(x / 2)`.
pub fn hav(x: f64) -> f64 {
    let sin_half = (x * 0.5).sin();
    sin_half * sin_half
}

/// Inverse haversine, defined on `[0, 1]`.
pub fn arc_hav(x: f64) -> f64 {
    2.0 * x.sqrt().asin()
}

/// `sin(arc_hav(x))`.
pub fn sin_from_hav(h: f64) -> f64 {
    2.0 * (h * (1.0 - h)).sqrt()
}

/// `hav(asin(x))`.
pub fn hav_from_sin(x: f64) -> f64 {
    let x2 = x * x;
    x2 / (1.0 + (1.0 - x2).sqrt()) * 0.5
}

/// `sin(arc_hav(x) + arc_hav(y))`.
pub fn sin_sum_from_hav(x: f64, y: f64) -> f64 {
    let a = (x * (1.0 - x)).sqrt();
    let b = (y * (1.0 - y)).sqrt();
    2.0 * (a + b - 2.0 * (a * y + b * x))
}

/// Haversine of the central angle between two points given by their
/// latitudes and longitude difference.
pub fn hav_distance(lat1: f64, lat2: f64, d_lng: f64) -> f64 {
    hav(lat1 - lat2) + hav(d_lng) * lat1.cos() * lat2.cos()
}

/// Central angle in radians between two points.
pub fn compute_angle_between(from: &GeoPoint, to: &GeoPoint) -> f64 {
    arc_hav(hav_distance(
        from.lat_rad(),
        to.lat_rad(),
        from.lng_rad() - to.lng_rad(),
    ))
}

/// Great circle distance in meters between two points.
pub fn compute_distance_between(from: &GeoPoint, to: &GeoPoint) -> f64 {
    compute_angle_between(from, to) * EARTH_RADIUS
}

/// Initial great circle bearing from `from` to `to` in degrees, `[-180, 180)`.
pub fn compute_heading(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let from_lat = from.lat_rad();
    let to_lat = to.lat_rad();
    let d_lng = to.lng_rad() - from.lng_rad();
    let heading = (d_lng.sin() * to_lat.cos())
        .atan2(from_lat.cos() * to_lat.sin() - from_lat.sin() * to_lat.cos() * d_lng.cos());
    wrap(heading.to_degrees(), -180.0, 180.0)
}
