// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{Event, EventBus, EventKind, EventKindType};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::{Instant, timeout_at};

/// Sends a quit signal to a running module and waits for it to stop gracefully.
///
/// # Panics
///
/// Panics if the module does not stop within 100 ms or its task fails.
pub async fn stop_module(
    event_bus: &EventBus,
    handle: &mut tokio::task::JoinHandle<Result<(), ()>>,
) {
    event_bus.publish(&Event {
        kind: EventKind::QuitEvent,
    });
    let _ = tokio::time::timeout(std::time::Duration::from_millis(100), handle)
        .await
        .expect("Module doesn't handle quit event in timeout")
        .unwrap();
}

/// Waits for the next [`Event`] of type `exp_event` on `rx`.
///
/// Events of other types received in the meantime are skipped. Only the
/// variant is compared, payloads are ignored.
///
/// # Panics
///
/// Panics if no matching event arrives within `duration`.
pub async fn wait_for_event(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
) -> Event {
    let deadline = Instant::now() + duration;
    loop {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Ok(event)) if event.event_type() == exp_event => return event,
            Ok(Ok(_)) => continue,
            Ok(Err(e)) => panic!("Failed to receive event of type {:?}. Error: {}", exp_event, e),
            Err(_) => break,
        }
    }
    panic!("Failed to receive event of type {:?}", exp_event);
}

/// Collects every event already queued on `rx` without waiting.
pub fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    events
}
