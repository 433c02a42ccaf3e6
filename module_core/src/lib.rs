// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::{Fix, MatchedFix};
use common::route::{RecalculationRequest, Route};
use std::sync::Arc;
use strum::IntoDiscriminant;
use strum_macros::EnumDiscriminants;
use tracing::debug;

/// Message passed between modules over the [`EventBus`].
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub kind: EventKind,
}

impl Event {
    /// Returns the payload-free discriminant of this event.
    pub fn event_type(&self) -> EventKindType {
        self.kind.discriminant()
    }
}

/// A thread-safe, reference-counted pointer to a raw [`Fix`].
pub type FixPtr = Arc<Fix>;

/// A thread-safe, reference-counted pointer to a [`MatchedFix`].
pub type MatchedFixPtr = Arc<MatchedFix>;

/// A thread-safe, reference-counted pointer to a [`Route`].
///
/// Routes can carry thousands of points, sharing them avoids copying the
/// geometry for every subscriber.
pub type RoutePtr = Arc<Route>;

/// A thread-safe, reference-counted pointer to a [`RecalculationRequest`].
pub type RecalculationRequestPtr = Arc<RecalculationRequest>;

/// Everything that travels over the [`EventBus`].
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKindType), derive(Hash))]
pub enum EventKind {
    /// Indicates that a module shall terminate.
    QuitEvent,

    /// A raw location fix reported by a location source.
    LocationEvent(FixPtr),

    /// A fix after it went through the route tracker.
    ///
    /// Published for every fix the tracker handles, matched or not.
    LocationMatchedEvent(MatchedFixPtr),

    /// Replaces the tracked route.
    SetRouteEvent(RoutePtr),

    /// Drops the tracked route and all match state.
    ClearRouteEvent,

    /// Enables or disables following the tracked route.
    FollowRouteEvent(bool),

    /// Enables or disables the route simulation playback.
    SimulateRouteEvent(bool),

    /// Turn-by-turn instruction text to announce.
    RouteDescriptionEvent(String),

    /// Reports that the simulation playback started (`true`) or stopped (`false`).
    SimulateRouteStartStopEvent(bool),

    /// Asks the location source to start or stop. `false` is sent once the
    /// end of the route is reached.
    RequestStartStopEvent(bool),

    /// Asks the routing service for a new route after the agent left the
    /// current one.
    RequestRouteRecalculationEvent(RecalculationRequestPtr),

    /// The routing service accepted a request and is working on it.
    RoutingStartedEvent(RecalculationRequestPtr),

    /// The routing service gave up on a request.
    RoutingErrorEvent(String),
}

/// Borrows the payload of an [`EventKind`] variant.
///
/// Evaluates to `Some(&payload)` if `$kind` is the given variant and `None`
/// otherwise.
///
/// ```rust
/// use module_core::{EventKind, payload_ref};
///
/// let kind = EventKind::RouteDescriptionEvent("Turn left".to_string());
/// assert_eq!(
///     payload_ref!(kind, EventKind::RouteDescriptionEvent).map(String::as_str),
///     Some("Turn left")
/// );
/// assert!(payload_ref!(kind, EventKind::FollowRouteEvent).is_none());
/// ```
#[macro_export]
macro_rules! payload_ref {
    ($kind:expr, $variant:path) => {
        match &$kind {
            $variant(payload) => Some(payload),
            _ => None,
        }
    };
}

/// In-process broadcast bus connecting the location source, the route
/// tracker, the routing module and whoever listens to their output.
///
/// Every subscriber sees every event published after it subscribed. Slow
/// subscribers lose the oldest events once 100 are queued.
pub struct EventBus {
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a bus buffering up to 100 events per subscriber.
    pub fn new() -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(100);
        EventBus { sender }
    }

    /// Returns a receiver for all events published from now on.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes `event` to all subscribers. Without subscribers the event
    /// is dropped.
    pub fn publish(&self, event: &Event) {
        let _ = self.sender.send(event.clone());
    }

    /// Creates a [`ModuleCtx`] subscribed to this bus.
    pub fn context(&self) -> ModuleCtx {
        ModuleCtx::new(self)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A long running participant of the [`EventBus`].
#[async_trait::async_trait]
pub trait Module {
    /// Runs the event loop until a [`EventKind::QuitEvent`] arrives.
    async fn run(&mut self) -> Result<(), ()>;
}

/// Sender and receiver of one module.
pub struct ModuleCtx {
    /// Publishes events to every subscriber of the bus.
    pub sender: tokio::sync::broadcast::Sender<Event>,

    /// Receives the events published after the context was created,
    /// including the module's own.
    pub receiver: tokio::sync::broadcast::Receiver<Event>,
}

impl ModuleCtx {
    /// Creates a context bound to `event_bus`.
    ///
    /// # Arguments
    /// * `event_bus` – The bus to publish to and subscribe on.
    pub fn new(event_bus: &EventBus) -> Self {
        ModuleCtx {
            sender: event_bus.sender.clone(),
            receiver: event_bus.subscribe(),
        }
    }

    /// Publishes an event of the given kind.
    ///
    /// Fails only if no receiver is subscribed to the bus.
    pub fn publish_event(
        &self,
        kind: EventKind,
    ) -> Result<(), tokio::sync::broadcast::error::SendError<Event>> {
        debug!("Publishing {:?}", EventKindType::from(&kind));
        self.sender.send(Event { kind }).map(|_| ())
    }
}

pub mod test_helper;
