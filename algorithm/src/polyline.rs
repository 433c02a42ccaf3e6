// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Encoded polyline format.
//!
//! Byte compatible with the published polyline algorithm used by web map
//! services: coordinates are quantized to 1e-5 degrees, delta encoded
//! against the previous point, zig-zag signed and written as 5-bit groups
//! offset by 63 with `0x20` as continuation bit.

use crate::error::{GeometryError, GeometryResult};
use common::position::GeoPoint;

const PRECISION: f64 = 1e5;
const CHAR_OFFSET: i64 = 63;
const CONTINUATION: i64 = 0x20;
const CHUNK_MASK: i64 = 0x1f;

/// Encodes a sequence of points into a polyline string.
///
/// # Example
///
/// ```rust
/// use algorithm::polyline::encode;
/// use common::position::GeoPoint;
///
/// let points = vec![
///     GeoPoint::new(38.5, -120.2),
///     GeoPoint::new(40.7, -120.95),
///     GeoPoint::new(43.252, -126.453),
/// ];
/// assert_eq!(encode(&points), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// ```
pub fn encode(points: &[GeoPoint]) -> String {
    let mut result = String::new();
    let mut last_lat = 0_i64;
    let mut last_lng = 0_i64;
    for point in points {
        let lat = quantize(point.latitude);
        let lng = quantize(point.longitude);
        encode_value(lat - last_lat, &mut result);
        encode_value(lng - last_lng, &mut result);
        last_lat = lat;
        last_lng = lng;
    }
    result
}

/// Decodes a polyline string into points.
///
/// # Errors
///
/// Returns [`GeometryError::MalformedInput`] if the string ends inside a
/// group or between a latitude and its longitude, contains a byte outside the
/// polyline alphabet or encodes a value or a coordinate sum that does not
/// fit into 64 bits.
pub fn decode(encoded: &str) -> GeometryResult<Vec<GeoPoint>> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat = 0_i64;
    let mut lng = 0_i64;
    while index < bytes.len() {
        lat = accumulate(lat, decode_value(bytes, &mut index)?, index)?;
        if index >= bytes.len() {
            return Err(GeometryError::MalformedInput {
                position: index,
                reason: "latitude without longitude",
            });
        }
        lng = accumulate(lng, decode_value(bytes, &mut index)?, index)?;
        points.push(GeoPoint::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }
    Ok(points)
}

/// Applies a decoded delta to the running coordinate.
fn accumulate(coordinate: i64, delta: i64, position: usize) -> GeometryResult<i64> {
    coordinate
        .checked_add(delta)
        .ok_or(GeometryError::MalformedInput {
            position,
            reason: "coordinate overflows 64 bits",
        })
}

/// Rounds half up, the way the reference encoder does.
fn quantize(degrees: f64) -> i64 {
    (degrees * PRECISION + 0.5).floor() as i64
}

fn encode_value(value: i64, result: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= CONTINUATION {
        result.push(to_char((CONTINUATION | (v & CHUNK_MASK)) + CHAR_OFFSET));
        v >>= 5;
    }
    result.push(to_char(v + CHAR_OFFSET));
}

fn to_char(code: i64) -> char {
    // Codes are always within 63..=126.
    char::from(code as u8)
}

fn decode_value(bytes: &[u8], index: &mut usize) -> GeometryResult<i64> {
    let mut result = 0_i64;
    let mut shift = 0_u32;
    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(GeometryError::MalformedInput {
                position: *index,
                reason: "unterminated group",
            });
        };
        if !(63..=126).contains(&byte) {
            return Err(GeometryError::MalformedInput {
                position: *index,
                reason: "byte outside the polyline alphabet",
            });
        }
        if shift > 60 {
            return Err(GeometryError::MalformedInput {
                position: *index,
                reason: "value overflows 64 bits",
            });
        }
        let chunk = i64::from(byte) - CHAR_OFFSET;
        *index += 1;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        if chunk < CONTINUATION {
            break;
        }
    }
    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}
