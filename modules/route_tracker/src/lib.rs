// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use async_trait::async_trait;
use common::position::Fix;
use common::route::Route;
use module_core::{Event, EventKind, Module, ModuleCtx};
use simulation::{Playback, PlaybackMessage};
use std::sync::Arc;
use tracing::{debug, error, trace};

pub mod simulation;
pub mod tracker;

pub use tracker::{RouteTracker, TrackerConfig};

/// Connects a [`RouteTracker`] to the event bus.
///
/// Raw fixes arriving as [`EventKind::LocationEvent`] are matched and
/// republished as [`EventKind::LocationMatchedEvent`]. While a simulation is
/// running, raw fixes are ignored and the synthesized ones take their place.
pub struct RouteTrackerModule {
    ctx: ModuleCtx,
    tracker: RouteTracker,
    playback: Option<Playback>,
}

impl RouteTrackerModule {
    /// Creates the module with the default [`TrackerConfig`].
    pub fn new(ctx: ModuleCtx) -> Self {
        RouteTrackerModule::new_with_config(ctx, TrackerConfig::default())
    }

    /// Creates the module with custom tolerances and playback interval.
    ///
    /// # Arguments
    /// * `ctx` – Context of the event bus the module runs on.
    /// * `config` – Settings handed to the [`RouteTracker`].
    pub fn new_with_config(ctx: ModuleCtx, config: TrackerConfig) -> Self {
        let tracker = RouteTracker::new(ctx.sender.clone(), config);
        RouteTrackerModule {
            ctx,
            tracker,
            playback: None,
        }
    }

    fn publish_match(&mut self, fix: &Fix) {
        let matched = self.tracker.match_location(fix);
        if matched.repeated {
            trace!("Repeated match at {:?}", matched.fix.to_geo_point());
        }
        let _ = self
            .ctx
            .publish_event(EventKind::LocationMatchedEvent(Arc::new(matched)));
    }

    fn start_simulation(&mut self) {
        if let Some(points) = self.tracker.start_simulation() {
            let interval = self.tracker.config().simulation_interval;
            self.playback = Some(Playback::start(points, interval));
        }
    }

    fn stop_simulation(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.cancel();
        }
        self.tracker.stop_simulation();
    }

    /// Returns `false` once the module shall terminate.
    fn handle_event(&mut self, event: Event) -> bool {
        match event.kind {
            EventKind::QuitEvent => {
                self.playback = None;
                return false;
            }
            EventKind::LocationEvent(fix) => {
                if self.tracker.is_simulating() {
                    trace!("Ignoring device fix while simulating");
                } else {
                    self.publish_match(&fix);
                }
            }
            EventKind::SetRouteEvent(route) => {
                self.stop_simulation();
                self.tracker.set_route(Route::clone(&route));
            }
            EventKind::ClearRouteEvent => {
                self.stop_simulation();
                self.tracker.clear_route();
            }
            EventKind::FollowRouteEvent(follow) => {
                if follow {
                    self.tracker.start_following();
                } else {
                    self.tracker.stop_following();
                }
            }
            EventKind::SimulateRouteEvent(true) => self.start_simulation(),
            EventKind::SimulateRouteEvent(false) => self.stop_simulation(),
            _ => (),
        }
        true
    }

    fn handle_playback(&mut self, message: PlaybackMessage) {
        match message {
            PlaybackMessage::Fix(fix) => {
                if self.tracker.is_simulating() {
                    self.publish_match(&fix);
                }
            }
            PlaybackMessage::Finished => {
                debug!("Playback finished");
                self.playback = None;
                self.tracker.stop_simulation();
            }
        }
    }
}

async fn next_playback_message(playback: &mut Option<Playback>) -> Option<PlaybackMessage> {
    match playback {
        Some(playback) => playback.recv().await,
        None => std::future::pending().await,
    }
}

#[async_trait]
impl Module for RouteTrackerModule {
    async fn run(&mut self) -> Result<(), ()> {
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => run = self.handle_event(event),
                        Err(e) => error!("Failed to receive event. Error: {}", e),
                    }
                }
                Some(message) = next_playback_message(&mut self.playback) => {
                    self.handle_playback(message);
                }
            }
        }
        Ok(())
    }
}
