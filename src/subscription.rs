// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Long-lived subscription engine with automatic reconnection.
//!
//! The engine owns the event stream for one location: it opens a session,
//! consumes events lazily, and — on any termination short of explicit
//! cancellation — reopens the session after a backoff delay, forever.
//!
//! Incremental updates are perishable, so a dropped connection must not
//! silently stop delivering device state. Transport errors are therefore
//! absorbed into the reconnect loop and never surfaced to the caller of
//! [`SubscriptionEngine::run`]; the caller learns about connectivity only
//! through liveness of downstream attribute updates. No bound exists on
//! reconnection attempts: the engine is designed to run unattended for
//! the process lifetime.
//!
//! Across a reconnect no ordering or completeness guarantee is made for
//! events lost during the gap; the trade is liveness over completeness,
//! with full resynchronization available via a fresh snapshot fetch if
//! the coordinator restarts.

use std::time::Duration;

use tokio::sync::watch;

use crate::device::DeviceEvent;
use crate::transport::{DeviceStream, StreamConnector};

/// Default delay before a reconnection attempt.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// The reconnecting consumer of the device-update stream.
///
/// Events are delivered to the callback synchronously, in receipt order:
/// the next event is not read from the transport until the callback for
/// the current one returns.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use tokio::sync::watch;
/// use wattsync::SubscriptionEngine;
/// use wattsync::transport::WsStreamConnector;
///
/// # async fn example() {
/// let connector = WsStreamConnector::new("wss://api.example.com/graphql");
/// let engine = SubscriptionEngine::new(connector, "LOC1", "token")
///     .with_backoff(Duration::from_secs(2));
///
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let task = tokio::spawn(engine.run(|event| println!("{event:?}"), shutdown_rx));
///
/// // ... later ...
/// let _ = shutdown_tx.send(true);
/// let _ = task.await;
/// # }
/// ```
#[derive(Debug)]
pub struct SubscriptionEngine<C> {
    connector: C,
    location_id: String,
    token: String,
    backoff: Duration,
}

impl<C: StreamConnector> SubscriptionEngine<C> {
    /// Creates an engine for one location and token.
    ///
    /// Both are fixed for the lifetime of the engine; a token change
    /// requires tearing the engine down and creating a new one.
    #[must_use]
    pub fn new(connector: C, location_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            connector,
            location_id: location_id.into(),
            token: token.into(),
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Sets the delay observed before each reconnection attempt.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Runs the engine until `shutdown` signals `true` (or its sender is
    /// dropped).
    ///
    /// Never returns otherwise: connect failures and stream drops both
    /// lead back into the connect loop after the backoff delay. The
    /// shutdown signal is observed at every suspension point (connect,
    /// receive, backoff) and is never converted into another reconnect
    /// attempt.
    pub async fn run<F>(self, mut on_event: F, mut shutdown: watch::Receiver<bool>)
    where
        F: FnMut(DeviceEvent),
    {
        loop {
            let connected = tokio::select! {
                () = cancelled(&mut shutdown) => return,
                result = self.connector.connect(&self.location_id, &self.token) => result,
            };

            match connected {
                Ok(mut stream) => {
                    tracing::debug!(location_id = %self.location_id, "Subscription stream open");
                    loop {
                        let received = tokio::select! {
                            () = cancelled(&mut shutdown) => return,
                            received = stream.next_event() => received,
                        };

                        match received {
                            Ok(Some(event)) => on_event(event),
                            Ok(None) => {
                                tracing::warn!(
                                    location_id = %self.location_id,
                                    "Subscription stream closed by remote"
                                );
                                break;
                            }
                            Err(e) => {
                                tracing::warn!(
                                    location_id = %self.location_id,
                                    error = %e,
                                    "Subscription stream dropped"
                                );
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        location_id = %self.location_id,
                        error = %e,
                        "Subscription connect failed"
                    );
                }
            }

            // Mandatory awaited delay before the next connect attempt.
            tokio::select! {
                () = cancelled(&mut shutdown) => return,
                () = tokio::time::sleep(self.backoff) => {}
            }
        }
    }
}

/// Resolves when the shutdown signal becomes `true` or its sender drops.
async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender means the owner is gone; treat it as cancellation.
    let _ = shutdown.wait_for(|stop| *stop).await;
}
