// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::geo_math::compute_distance_between;
use algorithm::projector::project_onto_path;
use common::position::{Fix, GeoPoint, MatchedFix};
use common::route::{RecalculationRequest, Route, RoutePoint};
use module_core::{Event, EventKind};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Distance to the next segment start at which the short range cue fires.
const NEAR_CUE_DISTANCE: f64 = 100.0;

/// Distance to the next segment start at which the long range cue fires.
const FAR_CUE_DISTANCE: f64 = 500.0;

/// Tunables of the [`RouteTracker`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Maximum distance in meters between a fix and the route for the fix to match.
    pub match_tolerance: f64,

    /// Distance in meters an unmatched fix must be away from the route origin
    /// to move the origin and count as a miss.
    pub origin_shift: f64,

    /// Consecutive misses after which a route recalculation is requested.
    pub recalculation_threshold: u32,

    /// Time between two synthesized fixes of the simulation playback.
    pub simulation_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            match_tolerance: 40.0,
            origin_shift: 20.0,
            recalculation_threshold: 3,
            simulation_interval: Duration::from_secs(1),
        }
    }
}

/// Matches fixes against a route and derives navigation events from the matches.
///
/// A `RouteTracker` is owned by a single task. It publishes instruction
/// texts, route end and recalculation requests on the event bus sender it
/// was created with.
#[derive(Debug)]
pub struct RouteTracker {
    sender: tokio::sync::broadcast::Sender<Event>,
    config: TrackerConfig,
    route: Option<Route>,
    last_match: Option<RoutePoint>,
    recalculation_misses: u32,
    following: bool,
    simulating: bool,
}

impl RouteTracker {
    /// Creates an idle tracker without a route.
    ///
    /// # Arguments
    /// * `sender` – Event bus sender used for instructions, route end and
    ///   recalculation requests.
    /// * `config` – Tolerances and timings, see [`TrackerConfig`].
    pub fn new(sender: tokio::sync::broadcast::Sender<Event>, config: TrackerConfig) -> Self {
        RouteTracker {
            sender,
            config,
            route: None,
            last_match: None,
            recalculation_misses: 0,
            following: false,
            simulating: false,
        }
    }

    /// Returns the configuration the tracker was created with.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Returns the tracked route, if any.
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Returns the most recent match.
    ///
    /// Seeds the next path search and detects repeated matches.
    pub fn last_match(&self) -> Option<&RoutePoint> {
        self.last_match.as_ref()
    }

    /// Returns the number of counted misses since the last match.
    pub fn recalculation_misses(&self) -> u32 {
        self.recalculation_misses
    }

    /// Returns `true` while the route is being followed.
    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Returns `true` while a simulation playback is active.
    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    /// Replaces the tracked route and forgets everything matched so far.
    pub fn set_route(&mut self, route: Route) {
        info!(
            "Route set with {} points and {} segments",
            route.points().len(),
            route.segments().len()
        );
        self.route = Some(route);
        self.last_match = None;
        self.recalculation_misses = 0;
    }

    /// Drops the route and all match state.
    pub fn clear_route(&mut self) {
        if self.route.take().is_some() {
            info!("Route cleared");
        }
        self.last_match = None;
        self.recalculation_misses = 0;
        self.following = false;
    }

    /// Starts following the route. Returns `false` if there is no route to follow.
    pub fn start_following(&mut self) -> bool {
        if self.route.is_none() {
            warn!("Can't follow without a route");
            return false;
        }
        self.following = true;
        true
    }

    /// Stops following. The route and match state stay untouched.
    pub fn stop_following(&mut self) {
        self.following = false;
    }

    /// Switches into simulation mode.
    ///
    /// Announces the first instruction of the route and returns the points to
    /// play back. Returns `None` if there is no route or a simulation is
    /// already running.
    pub fn start_simulation(&mut self) -> Option<Vec<GeoPoint>> {
        if self.simulating {
            debug!("Simulation already running");
            return None;
        }
        let Some(route) = self.route.as_ref() else {
            warn!("Can't simulate without a route");
            return None;
        };
        let points = route.points().to_vec();
        let first_instruction = route
            .segments()
            .first()
            .map(|segment| segment.instruction.clone());

        self.simulating = true;
        self.last_match = None;
        if let Some(instruction) = first_instruction {
            self.notify(EventKind::RouteDescriptionEvent(instruction));
        }
        self.notify(EventKind::SimulateRouteStartStopEvent(true));
        info!("Simulation started with {} points", points.len());
        Some(points)
    }

    /// Leaves simulation mode and puts the route origin back to its start.
    ///
    /// Returns `false` if no simulation was running.
    pub fn stop_simulation(&mut self) -> bool {
        if !self.simulating {
            return false;
        }
        self.simulating = false;
        self.following = false;
        if let Some(route) = self.route.as_mut() {
            route.reset_origin();
        }
        self.notify(EventKind::SimulateRouteStartStopEvent(false));
        info!("Simulation stopped");
        true
    }

    /// Snaps `fix` onto the route.
    ///
    /// Without a route the fix is returned unmodified. A matched fix carries
    /// the matched coordinates and the [`RoutePoint`] it was snapped to.
    pub fn match_location(&mut self, fix: &Fix) -> MatchedFix {
        let Some(route) = self.route.as_ref() else {
            return MatchedFix::unmatched(fix.clone());
        };
        let location = fix.to_geo_point();
        let hint = self.last_match.as_ref().map(|last| last.point_index);
        let projection = project_onto_path(
            &location,
            route.points(),
            false,
            true,
            self.config.match_tolerance,
            hint,
        );
        match projection {
            Ok(Some(route_point)) => self.handle_match(fix, route_point),
            Ok(None) => {
                self.handle_miss(&location);
                MatchedFix::unmatched(fix.clone())
            }
            Err(e) => {
                error!("Failed to project fix onto route. Error: {}", e);
                MatchedFix::unmatched(fix.clone())
            }
        }
    }

    fn handle_match(&mut self, fix: &Fix, route_point: RoutePoint) -> MatchedFix {
        self.recalculation_misses = 0;
        let Some(route) = self.route.as_mut() else {
            return MatchedFix::unmatched(fix.clone());
        };
        let segment_index = route.segment_index_of(route_point.point_index).unwrap_or(0);
        let mut route_point = route_point.with_segment(segment_index);

        if route_point.point_index == route.last_point_index()
            && !self.simulating
            && !route.is_ended()
        {
            info!("End of route reached");
            route.set_ended(true);
            self.following = false;
            self.notify(EventKind::RequestStartStopEvent(false));
        }

        let mut repeated = false;
        if let Some(previous) = self.last_match.take() {
            repeated = previous.matched_point == route_point.matched_point;
            route_point = if repeated {
                route_point.with_proximity(previous.passed_100m, previous.passed_500m)
            } else {
                self.announce(&previous, route_point)
            };
        }

        let matched = MatchedFix {
            fix: fix.snapped_to(&route_point.matched_point),
            route_point: Some(route_point.clone()),
            repeated,
        };
        self.last_match = Some(route_point);
        matched
    }

    /// Emits the instruction for a segment change or an approaching segment
    /// start and returns `current` with the proximity flags it must carry.
    fn announce(&self, previous: &RoutePoint, current: RoutePoint) -> RoutePoint {
        let Some(route) = self.route.as_ref() else {
            return current;
        };
        let segments = route.segments();
        if previous.segment_index != current.segment_index {
            if let Some(segment) = segments.get(current.segment_index) {
                self.notify(EventKind::RouteDescriptionEvent(segment.instruction.clone()));
            }
            return current;
        }

        let mut passed_100m = previous.passed_100m;
        let mut passed_500m = previous.passed_500m;
        let next_index = current.segment_index + 1;
        if let Some(next) = segments.get(next_index)
            && let Some(next_start) = route.segment_start_point(next_index)
        {
            let distance = compute_distance_between(&current.matched_point, next_start);
            if distance <= NEAR_CUE_DISTANCE {
                if !passed_100m {
                    passed_100m = true;
                    passed_500m = true;
                    self.notify(EventKind::RouteDescriptionEvent(next.instruction.clone()));
                }
            } else if distance <= FAR_CUE_DISTANCE && !passed_500m {
                passed_500m = true;
                self.notify(EventKind::RouteDescriptionEvent(format!(
                    "In 500 meters, {}",
                    next.instruction
                )));
            }
        }
        current.with_proximity(passed_100m, passed_500m)
    }

    fn handle_miss(&mut self, location: &GeoPoint) {
        let Some(route) = self.route.as_mut() else {
            return;
        };
        let shifted = compute_distance_between(&route.origin(), location) > self.config.origin_shift;
        if !shifted {
            return;
        }
        route.set_origin(*location);
        if self.simulating {
            return;
        }
        self.recalculation_misses += 1;
        debug!(
            "Fix off route, {} of {} misses",
            self.recalculation_misses, self.config.recalculation_threshold
        );
        if self.recalculation_misses >= self.config.recalculation_threshold {
            let request = RecalculationRequest {
                origin: route.origin(),
                destination: route.destination(),
                travel_mode: route.travel_mode(),
                update: true,
            };
            info!("Requesting route recalculation from {:?}", request.origin);
            self.recalculation_misses = 0;
            self.notify(EventKind::RequestRouteRecalculationEvent(Arc::new(request)));
        }
    }

    fn notify(&self, kind: EventKind) {
        let _ = self.sender.send(Event { kind });
    }
}
