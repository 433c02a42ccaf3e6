// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::geo_math::compute_distance_between;
use async_trait::async_trait;
use common::route::{RecalculationRequest, Route};
use module_core::{Event, EventKind, Module, ModuleCtx, RecalculationRequestPtr};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub mod router;

pub use router::{Router, RoutingError, RoutingResult, StaticRouter};

/// Retry policy of the [`RoutingModule`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    /// Number of times a request is sent before giving up.
    pub max_attempts: u32,

    /// Pause between two attempts.
    pub retry_delay: Duration,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig {
            max_attempts: 5,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Length of the route geometry in meters.
pub fn route_length(route: &Route) -> f64 {
    route
        .points()
        .windows(2)
        .map(|pair| compute_distance_between(&pair[0], &pair[1]))
        .sum()
}

/// Picks the shortest of the alternatives.
fn shortest(routes: Vec<Route>) -> Option<Route> {
    routes
        .into_iter()
        .map(|route| (route_length(&route), route))
        .min_by(|(lhs, _), (rhs, _)| lhs.total_cmp(rhs))
        .map(|(_, route)| route)
}

/// Asks `router` for a route, retrying failures and empty answers.
///
/// Returns the error of the last attempt once `config.max_attempts` attempts
/// failed.
pub async fn request_route(
    router: &dyn Router,
    request: &RecalculationRequest,
    config: &RoutingConfig,
) -> RoutingResult<Route> {
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let result = router
            .route(request)
            .await
            .and_then(|routes| shortest(routes).ok_or(RoutingError::NoRoute));
        match result {
            Ok(route) => return Ok(route),
            Err(e) if attempt < max_attempts => {
                warn!(
                    "Routing attempt {} of {} failed. Error: {}",
                    attempt, max_attempts, e
                );
                tokio::time::sleep(config.retry_delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Answers route recalculation requests from the event bus.
///
/// Each request is reported with [`EventKind::RoutingStartedEvent`] and
/// answered with either [`EventKind::SetRouteEvent`] or, once all attempts
/// failed, [`EventKind::RoutingErrorEvent`]. A new request supersedes one
/// still in flight.
pub struct RoutingModule {
    ctx: ModuleCtx,
    router: Arc<dyn Router>,
    config: RoutingConfig,
    pending: Option<JoinHandle<()>>,
}

impl RoutingModule {
    /// # Arguments
    /// * `ctx` – Context of the event bus the module runs on.
    /// * `router` – Collaborator answering the requests.
    /// * `config` – Retry policy.
    pub fn new(ctx: ModuleCtx, router: Arc<dyn Router>, config: RoutingConfig) -> Self {
        RoutingModule {
            ctx,
            router,
            config,
            pending: None,
        }
    }

    fn handle_request(&mut self, request: RecalculationRequestPtr) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let _ = self
            .ctx
            .publish_event(EventKind::RoutingStartedEvent(request.clone()));
        let router = self.router.clone();
        let config = self.config.clone();
        let sender = self.ctx.sender.clone();
        self.pending = Some(tokio::spawn(async move {
            let kind = match request_route(router.as_ref(), &request, &config).await {
                Ok(route) => {
                    info!("Route with {} points received", route.points().len());
                    EventKind::SetRouteEvent(Arc::new(route))
                }
                Err(e) => {
                    error!("Routing failed. Error: {}", e);
                    EventKind::RoutingErrorEvent(e.to_string())
                }
            };
            let _ = sender.send(Event { kind });
        }));
    }
}

#[async_trait]
impl Module for RoutingModule {
    async fn run(&mut self) -> Result<(), ()> {
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => match event.kind {
                            EventKind::QuitEvent => run = false,
                            EventKind::RequestRouteRecalculationEvent(request) => {
                                self.handle_request(request)
                            }
                            _ => (),
                        },
                        Err(e) => error!("Failed to receive event. Error: {}", e),
                    }
                }
            }
        }
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        Ok(())
    }
}
