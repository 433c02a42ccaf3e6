// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::{poly_util::simplify, polyline};
use async_trait::async_trait;
use clap::{CommandFactory, Parser};
use common::position::GeoPoint;
use common::route::{Route, Segment, TravelMode};
use module_core::{Event, EventBus, EventKind, Module, ModuleCtx};
use route_tracker::{RouteTrackerModule, TrackerConfig};
use routing::{RoutingConfig, RoutingModule, StaticRouter};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route as JSON document.
    #[arg(short, long)]
    route: Option<String>,
    /// CSV file with longitude,latitude rows.
    #[arg(short = 'c', long)]
    points_file: Option<String>,
    /// Encoded polyline.
    #[arg(short, long)]
    polyline: Option<String>,
    /// Simplification tolerance in meters for CSV and polyline input.
    #[arg(short, long)]
    simplify: Option<f64>,
    /// Playback interval in milliseconds.
    #[arg(short, long, default_value_t = 1000)]
    interval: u64,
    /// Match tolerance in meters.
    #[arg(short, long, default_value_t = 40.0)]
    tolerance: f64,
}

fn read_points_from_file(file_path: &str) -> Result<Vec<GeoPoint>, ()> {
    let mut rdr = csv::Reader::from_path(file_path).map_err(|e| {
        error!("Failed to open {}. Error: {}", file_path, e);
    })?;
    let mut points = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| error!("Failed to read record. Error: {}", e))?;
        let longitude = parse_column(&record, 0)?;
        let latitude = parse_column(&record, 1)?;
        points.push(GeoPoint::new(latitude, longitude));
    }
    debug!("length of points: {}", points.len());
    Ok(points)
}

fn parse_column(record: &csv::StringRecord, column: usize) -> Result<f64, ()> {
    let field = record.get(column).ok_or_else(|| {
        error!("Record {:?} has no column {}", record.position(), column);
    })?;
    f64::from_str(field.trim()).map_err(|e| {
        error!("Invalid coordinate {}. Error: {}", field, e);
    })
}

fn read_route_from_file(file_path: &str) -> Result<Route, ()> {
    let json = std::fs::read_to_string(file_path).map_err(|e| {
        error!("Failed to read {}. Error: {}", file_path, e);
    })?;
    Route::from_json(&json).map_err(|e| {
        error!("Invalid route in {}. Error: {}", file_path, e);
    })
}

fn route_from_points(points: Vec<GeoPoint>, tolerance: Option<f64>) -> Result<Route, ()> {
    let points = match tolerance {
        Some(tolerance) => {
            let simplified = simplify(&points, tolerance).map_err(|e| {
                error!("Failed to simplify points. Error: {}", e);
            })?;
            info!("Simplified {} points to {}", points.len(), simplified.len());
            simplified
        }
        None => points,
    };
    let last = points.len().saturating_sub(1);
    let segments = vec![Segment::new(0, last, "Follow the route")];
    Route::new(points, segments, TravelMode::default()).map_err(|e| {
        error!("Failed to build route. Error: {}", e);
    })
}

fn load_route(cli: &Cli) -> Result<Route, ()> {
    if let Some(route_file) = &cli.route {
        if cli.simplify.is_some() {
            warn!("--simplify only applies to CSV and polyline input, ignoring it");
        }
        read_route_from_file(route_file)
    } else if let Some(points_file) = &cli.points_file {
        route_from_points(read_points_from_file(points_file)?, cli.simplify)
    } else if let Some(encoded) = &cli.polyline {
        let points = polyline::decode(encoded).map_err(|e| {
            error!("Failed to decode polyline. Error: {}", e);
        })?;
        route_from_points(points, cli.simplify)
    } else {
        error!("No route specified. Use --route, --points-file or --polyline");
        let _ = Cli::command().print_help();
        Err(())
    }
}

/// Prints what the tracker reports and quits once the playback stopped.
struct EventLogger {
    ctx: ModuleCtx,
}

impl EventLogger {
    fn new(ctx: ModuleCtx) -> Self {
        EventLogger { ctx }
    }

    /// Returns `false` once the module shall terminate.
    fn handle_event(&self, event: Event) -> bool {
        match event.kind {
            EventKind::QuitEvent => return false,
            EventKind::RouteDescriptionEvent(description) => info!("{}", description),
            EventKind::LocationMatchedEvent(matched) => match &matched.route_point {
                Some(route_point) => info!(
                    "Matched {:.6},{:.6} at point {} of segment {}",
                    matched.fix.latitude(),
                    matched.fix.longitude(),
                    route_point.point_index,
                    route_point.segment_index
                ),
                None => info!(
                    "Off route at {:.6},{:.6}",
                    matched.fix.latitude(),
                    matched.fix.longitude()
                ),
            },
            EventKind::RequestRouteRecalculationEvent(request) => info!(
                "Recalculation requested from {:?} to {:?}",
                request.origin, request.destination
            ),
            EventKind::RoutingErrorEvent(e) => error!("Routing failed. Error: {}", e),
            EventKind::RequestStartStopEvent(false) => info!("Destination reached"),
            EventKind::SimulateRouteStartStopEvent(false) => {
                info!("Simulation finished");
                let _ = self.ctx.publish_event(EventKind::QuitEvent);
            }
            _ => (),
        }
        true
    }
}

#[async_trait]
impl Module for EventLogger {
    async fn run(&mut self) -> Result<(), ()> {
        let mut run = true;
        while run {
            match self.ctx.receiver.recv().await {
                Ok(event) => run = self.handle_event(event),
                Err(e) => error!("Failed to receive event. Error: {}", e),
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let route = load_route(&cli)?;
    let eb = EventBus::default();
    let config = TrackerConfig {
        match_tolerance: cli.tolerance,
        simulation_interval: Duration::from_millis(cli.interval),
        ..TrackerConfig::default()
    };
    let mut tracker = RouteTrackerModule::new_with_config(eb.context(), config);
    let router = Arc::new(StaticRouter::new(vec![route.clone()]));
    let mut routing = RoutingModule::new(eb.context(), router, RoutingConfig::default());
    let mut logger = EventLogger::new(eb.context());

    let quit_ctx = eb.context();
    ctrlc::set_handler(move || {
        let _ = quit_ctx.publish_event(EventKind::QuitEvent);
    })
    .map_err(|e| error!("Failed to install Ctrl-C handler. Error: {}", e))?;

    let route = Arc::new(route);
    eb.publish(&Event {
        kind: EventKind::SetRouteEvent(route),
    });
    eb.publish(&Event {
        kind: EventKind::FollowRouteEvent(true),
    });
    eb.publish(&Event {
        kind: EventKind::SimulateRouteEvent(true),
    });

    info!("Starting modules...");
    let (tracker_result, routing_result, logger_result) =
        tokio::join!(tracker.run(), routing.run(), logger.run());
    tracker_result.and(routing_result).and(logger_result)
}
