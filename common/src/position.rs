// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::route::RoutePoint;
use crate::serde::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude.
///
/// Latitude values range from -90.0 to 90.0, and longitude values range
/// from -180.0 to 180.0. Callers normalize coordinates before handing them
/// to the geometry functions, which work in radians internally.
///
/// # Example
///
/// ```rust
/// use common::position::GeoPoint;
///
/// let point = GeoPoint::new(52.5200, 13.4050);
/// assert_eq!(point.latitude, 52.5200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new [`GeoPoint`] from decimal degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    /// Latitude in radians.
    pub fn lat_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    /// Longitude in radians.
    pub fn lng_rad(&self) -> f64 {
        self.longitude.to_radians()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Tells where a [`Fix`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixSource {
    /// Reported by an external location provider.
    Device,

    /// Synthesized by the route simulation playback.
    Simulation,

    /// Coordinates were replaced by the matched point on the route.
    RouteMatched,
}

/// A raw location reading as delivered by a location source.
///
/// Only latitude, longitude and the timestamp take part in route matching.
/// Accuracy, bearing and speed are carried along unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    latitude: f64,
    longitude: f64,
    accuracy: f64,
    bearing: Option<f64>,
    speed: Option<f64>,
    #[serde(with = "timestamp")]
    timestamp: DateTime<Utc>,
    source: FixSource,
}

impl Fix {
    /// Creates a new [`Fix`] reported by a device.
    ///
    /// # Arguments
    ///
    /// * `latitude` – Latitude in decimal degrees.
    /// * `longitude` – Longitude in decimal degrees.
    /// * `accuracy` – Estimated horizontal accuracy in meters.
    /// * `timestamp` – Time of the reading in UTC.
    pub fn new(latitude: f64, longitude: f64, accuracy: f64, timestamp: DateTime<Utc>) -> Self {
        Fix {
            latitude,
            longitude,
            accuracy,
            bearing: None,
            speed: None,
            timestamp,
            source: FixSource::Device,
        }
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_source(mut self, source: FixSource) -> Self {
        self.source = source;
        self
    }

    /// Returns a copy of this fix moved onto `point` and tagged as route matched.
    pub fn snapped_to(&self, point: &GeoPoint) -> Self {
        Fix {
            latitude: point.latitude,
            longitude: point.longitude,
            source: FixSource::RouteMatched,
            ..self.clone()
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn bearing(&self) -> Option<f64> {
        self.bearing
    }

    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source(&self) -> FixSource {
        self.source
    }

    /// Returns the coordinates of this fix.
    pub fn to_geo_point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// The outcome of feeding a [`Fix`] through the route tracker.
///
/// `fix` is the (possibly snapped) reading, `route_point` the match it was
/// snapped to. `repeated` is set when the match is identical to the previous
/// one so consumers can suppress duplicate logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedFix {
    pub fix: Fix,
    pub route_point: Option<RoutePoint>,
    pub repeated: bool,
}

impl MatchedFix {
    /// Wraps a fix that was not matched against any route.
    pub fn unmatched(fix: Fix) -> Self {
        MatchedFix {
            fix,
            route_point: None,
            repeated: false,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.route_point.is_some()
    }
}
