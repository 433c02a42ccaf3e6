// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::test_helper::route::get_route;
use module_core::{
    test_helper::{drain_events, wait_for_event},
    *,
};
use std::sync::Arc;

#[tokio::test]
#[test_log::test]
pub async fn events_delivered() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    let event = Event {
        kind: EventKind::QuitEvent,
    };
    event_bus.publish(&event);
    let received_event =
        tokio::time::timeout(std::time::Duration::from_millis(100), receiver.recv())
            .await
            .expect("Failed to receive event in required time")
            .unwrap();
    assert_eq!(received_event.event_type(), event.event_type());
}

#[tokio::test]
#[test_log::test]
pub async fn test_wait_for_event() {
    let event_bus = EventBus::new();
    let ctx = event_bus.context();
    let mut receiver = event_bus.subscribe();

    ctx.publish_event(EventKind::FollowRouteEvent(true))
        .expect("Failed to publish follow event");
    ctx.publish_event(EventKind::SetRouteEvent(Arc::new(get_route())))
        .expect("Failed to publish route event");

    let event = wait_for_event(
        &mut receiver,
        std::time::Duration::from_millis(100),
        EventKindType::SetRouteEvent,
    )
    .await;
    let route = payload_ref!(event.kind, EventKind::SetRouteEvent).unwrap();
    assert_eq!(**route, get_route());
}

#[test]
fn drain_collects_queued_events() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    let ctx = event_bus.context();
    ctx.publish_event(EventKind::RouteDescriptionEvent("Turn left".to_string()))
        .unwrap();
    ctx.publish_event(EventKind::RequestStartStopEvent(false))
        .unwrap();

    let events = drain_events(&mut receiver);
    let types: Vec<EventKindType> = events.iter().map(Event::event_type).collect();
    assert_eq!(
        types,
        vec![
            EventKindType::RouteDescriptionEvent,
            EventKindType::RequestStartStopEvent
        ]
    );
    assert!(drain_events(&mut receiver).is_empty());
}

#[test]
fn event_type_names_the_variant() {
    let event = Event {
        kind: EventKind::RouteDescriptionEvent("Turn left".to_string()),
    };
    assert_eq!(event.event_type(), EventKindType::RouteDescriptionEvent);
    assert_ne!(event.event_type(), EventKindType::QuitEvent);
}
