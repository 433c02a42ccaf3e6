// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use async_trait::async_trait;
use common::route::{RecalculationRequest, Route, RouteError};
use thiserror::Error;

/// Errors reported by a [`Router`].
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing service unavailable: {0}")]
    Unavailable(String),

    #[error("no route between origin and destination")]
    NoRoute,

    #[error("routing service returned an invalid route: {0}")]
    InvalidRoute(#[from] RouteError),
}

pub type RoutingResult<T> = Result<T, RoutingError>;

/// A route planning service.
///
/// Implementations answer a request with one or more alternative routes.
#[async_trait]
pub trait Router: Send + Sync {
    /// Returns the route alternatives from `request.origin` to
    /// `request.destination`. An empty list counts as a failed attempt.
    async fn route(&self, request: &RecalculationRequest) -> RoutingResult<Vec<Route>>;
}

/// A [`Router`] that answers every request with the same preloaded routes.
#[derive(Debug, Clone)]
pub struct StaticRouter {
    routes: Vec<Route>,
}

impl StaticRouter {
    /// Creates a router that answers every request with `routes`.
    pub fn new(routes: Vec<Route>) -> Self {
        StaticRouter { routes }
    }
}

#[async_trait]
impl Router for StaticRouter {
    async fn route(&self, _request: &RecalculationRequest) -> RoutingResult<Vec<Route>> {
        Ok(self.routes.clone())
    }
}
