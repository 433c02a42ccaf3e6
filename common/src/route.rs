// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::position::GeoPoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling a [`Route`].
#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("route must contain at least one point")]
    NoPoints,

    #[error("segment {index} has start {start} after end {end}")]
    InvertedSegment {
        index: usize,
        start: usize,
        end: usize,
    },

    #[error("segment {index} ends at point {end} but the route has {len} points")]
    SegmentOutOfBounds { index: usize, end: usize, len: usize },

    #[error("segment {index} does not continue the previous segment")]
    Discontiguous { index: usize },

    #[error("failed to parse route: {0}")]
    Json(String),
}

pub type RouteResult<T> = Result<T, RouteError>;

/// How the route is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Biking,
}

/// One leg of a [`Route`] with the instruction that announces it.
///
/// `start_point_index` and `end_point_index` are inclusive indices into the
/// point sequence of the owning route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_point_index: usize,
    pub end_point_index: usize,
    pub instruction: String,
}

impl Segment {
    pub fn new(start_point_index: usize, end_point_index: usize, instruction: &str) -> Self {
        Segment {
            start_point_index,
            end_point_index,
            instruction: instruction.to_string(),
        }
    }

    /// Returns `true` if the route vertex `point_index` lies on this segment.
    pub fn contains(&self, point_index: usize) -> bool {
        point_index >= self.start_point_index && point_index <= self.end_point_index
    }

    /// The point this segment starts at.
    pub fn start_point<'a>(&self, points: &'a [GeoPoint]) -> Option<&'a GeoPoint> {
        points.get(self.start_point_index)
    }
}

/// A planned route as produced by a routing service.
///
/// The point sequence and the segments are fixed once the route is built. A
/// re-route replaces the whole value. Only the origin (which follows the agent
/// while it is off the route) and the `ended` flag change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    points: Vec<GeoPoint>,
    segments: Vec<Segment>,
    origin: GeoPoint,
    destination: GeoPoint,
    travel_mode: TravelMode,
    #[serde(default)]
    ended: bool,
}

impl Route {
    /// Builds a route from its geometry and legs.
    ///
    /// The origin starts at the first point and the destination is the last
    /// point. Segments must be ordered, each one starting at or right after
    /// the end of its predecessor, the first starting at point 0 and the last
    /// ending at the final point.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if `points` is empty or the segments do not
    /// cover the points contiguously.
    pub fn new(
        points: Vec<GeoPoint>,
        segments: Vec<Segment>,
        travel_mode: TravelMode,
    ) -> RouteResult<Self> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(RouteError::NoPoints);
        };
        let route = Route {
            origin: *first,
            destination: *last,
            points,
            segments,
            travel_mode,
            ended: false,
        };
        route.validate()?;
        Ok(route)
    }

    /// Parses and validates a route from JSON.
    pub fn from_json(json: &str) -> RouteResult<Self> {
        let route: Route =
            serde_json::from_str(json).map_err(|e| RouteError::Json(e.to_string()))?;
        route.validate()?;
        Ok(route)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn validate(&self) -> RouteResult<()> {
        if self.points.is_empty() {
            return Err(RouteError::NoPoints);
        }
        let len = self.points.len();
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.start_point_index > segment.end_point_index {
                return Err(RouteError::InvertedSegment {
                    index,
                    start: segment.start_point_index,
                    end: segment.end_point_index,
                });
            }
            if segment.end_point_index >= len {
                return Err(RouteError::SegmentOutOfBounds {
                    index,
                    end: segment.end_point_index,
                    len,
                });
            }
            let expected_start = match index {
                0 => 0..=0,
                _ => {
                    let previous_end = self.segments[index - 1].end_point_index;
                    previous_end..=previous_end + 1
                }
            };
            if !expected_start.contains(&segment.start_point_index) {
                return Err(RouteError::Discontiguous { index });
            }
        }
        if let Some(last) = self.segments.last()
            && last.end_point_index != len - 1
        {
            return Err(RouteError::SegmentOutOfBounds {
                index: self.segments.len() - 1,
                end: last.end_point_index,
                len,
            });
        }
        Ok(())
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn destination(&self) -> GeoPoint {
        self.destination
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.travel_mode
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn set_ended(&mut self, ended: bool) {
        self.ended = ended;
    }

    /// First point of the route geometry.
    pub fn start_point(&self) -> GeoPoint {
        self.points[0]
    }

    /// Moves the origin used for the next route recalculation.
    pub fn set_origin(&mut self, origin: GeoPoint) {
        self.origin = origin;
    }

    /// Puts the origin back onto the first point of the route.
    pub fn reset_origin(&mut self) {
        self.origin = self.start_point();
    }

    /// Index of the last route vertex.
    pub fn last_point_index(&self) -> usize {
        self.points.len() - 1
    }

    /// Finds the segment that owns the route vertex `point_index`.
    ///
    /// A vertex shared by two segments belongs to the segment that starts
    /// there.
    pub fn segment_index_of(&self, point_index: usize) -> Option<usize> {
        self.segments
            .iter()
            .rposition(|segment| segment.contains(point_index))
    }

    /// Returns the start point of segment `index`.
    pub fn segment_start_point(&self, index: usize) -> Option<&GeoPoint> {
        self.segments
            .get(index)
            .and_then(|segment| segment.start_point(&self.points))
    }
}

/// Walking direction of the incremental path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// The result of snapping a location onto a route polyline.
///
/// A `RoutePoint` is an immutable value. The tracker derives the next one
/// from it instead of mutating it, carrying the proximity flags forward
/// while the agent stays on the same segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// The snapped location, lying on the route polyline.
    pub matched_point: GeoPoint,

    /// Index of the route vertex the match advanced from.
    pub point_index: usize,

    /// Direction the search was walking when it found the match.
    pub direction: SearchDirection,

    /// Adjacent vertex in the direction of travel, if any.
    pub next_point: Option<GeoPoint>,

    /// Index of the segment owning `point_index`.
    pub segment_index: usize,

    /// Set once the agent came within 100 m of the next segment's start.
    pub passed_100m: bool,

    /// Set once the agent came within 500 m of the next segment's start.
    pub passed_500m: bool,
}

impl RoutePoint {
    pub fn new(
        matched_point: GeoPoint,
        point_index: usize,
        direction: SearchDirection,
        next_point: Option<GeoPoint>,
    ) -> Self {
        RoutePoint {
            matched_point,
            point_index,
            direction,
            next_point,
            segment_index: 0,
            passed_100m: false,
            passed_500m: false,
        }
    }

    pub fn with_segment(self, segment_index: usize) -> Self {
        RoutePoint {
            segment_index,
            ..self
        }
    }

    pub fn with_proximity(self, passed_100m: bool, passed_500m: bool) -> Self {
        RoutePoint {
            passed_100m,
            passed_500m,
            ..self
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Parameters handed to the routing service when the agent left the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecalculationRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub travel_mode: TravelMode,

    /// `true` if the request replaces an already followed route.
    pub update: bool,
}
