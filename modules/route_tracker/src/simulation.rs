// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Route playback for the simulation mode.
//!
//! The playback task never touches the tracker. It synthesizes fixes and
//! hands them to the module loop over a channel, so the tracker keeps a
//! single owner.

use chrono::Utc;
use common::position::{Fix, FixSource, GeoPoint};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const PLAYBACK_CHANNEL_SIZE: usize = 16;

/// Message sent from the playback task to the owner of the [`Playback`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackMessage {
    /// The next synthesized fix.
    Fix(Fix),

    /// All points were played back.
    Finished,
}

/// Builds the fix the playback emits for a route point.
pub fn synthesize_fix(point: &GeoPoint) -> Fix {
    Fix::new(point.latitude, point.longitude, 0.0, Utc::now())
        .with_bearing(0.0)
        .with_source(FixSource::Simulation)
}

/// A running playback.
///
/// Dropping the handle cancels the playback. No message sent after the
/// cancellation can be received, since the receiver goes away with the handle.
#[derive(Debug)]
pub struct Playback {
    token: CancellationToken,
    receiver: mpsc::Receiver<PlaybackMessage>,
}

impl Playback {
    /// Spawns a task that emits one fix per point, `interval` apart, followed
    /// by [`PlaybackMessage::Finished`].
    ///
    /// # Arguments
    /// * `points` – Route points to play back in order.
    /// * `interval` – Pause after every emitted fix.
    pub fn start(points: Vec<GeoPoint>, interval: Duration) -> Self {
        let token = CancellationToken::new();
        let (sender, receiver) = mpsc::channel(PLAYBACK_CHANNEL_SIZE);
        tokio::spawn(play(points, interval, sender, token.clone()));
        Playback { token, receiver }
    }

    /// Waits for the next message.
    ///
    /// Returns `None` once the playback task ended, either after
    /// [`PlaybackMessage::Finished`] or after a cancellation.
    pub async fn recv(&mut self) -> Option<PlaybackMessage> {
        self.receiver.recv().await
    }

    /// Stops the playback task at its next fix or pause.
    ///
    /// Messages already queued can still be received.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn play(
    points: Vec<GeoPoint>,
    interval: Duration,
    sender: mpsc::Sender<PlaybackMessage>,
    token: CancellationToken,
) {
    for (index, point) in points.iter().enumerate() {
        if token.is_cancelled() {
            debug!("Playback cancelled before point {}", index);
            return;
        }
        if sender.send(PlaybackMessage::Fix(synthesize_fix(point))).await.is_err() {
            return;
        }
        tokio::select! {
            _ = token.cancelled() => {
                debug!("Playback cancelled after point {}", index);
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
    if !token.is_cancelled() {
        let _ = sender.send(PlaybackMessage::Finished).await;
    }
}
