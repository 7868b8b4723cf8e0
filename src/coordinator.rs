// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Startup orchestration and background-task ownership.
//!
//! The coordinator sequences one run of the synchronization client:
//! acquire the access token, launch the subscription engine as a
//! background task, then fetch the initial snapshot. Snapshot and stream
//! race benignly — both write idempotent attribute triples into the
//! registry, where a later event supersedes a concurrently applied
//! snapshot value under last-write-wins.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::mapper;
use crate::query::QueryExecutor;
use crate::sink::AttributeSink;
use crate::subscription::{DEFAULT_BACKOFF, SubscriptionEngine};
use crate::token::TokenProvider;
use crate::transport::StreamConnector;

/// Handle to the running background engine.
struct EngineHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Orchestrates the snapshot fetch and the subscription engine for one
/// location.
///
/// Owns the engine's task handle explicitly: [`stop`](Self::stop) signals
/// cancellation and awaits the task's release of its transport session.
/// No ambient global task state is involved.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use wattsync::transport::{GraphQlHttpClient, WsStreamConnector};
/// use wattsync::{AttributeSink, QueryExecutor, StaticToken, SyncCoordinator};
///
/// # struct MyRegistry;
/// # impl AttributeSink for MyRegistry {
/// #     fn apply(&self, _attributes: Vec<wattsync::Attribute>) {}
/// # }
/// # async fn example() -> wattsync::Result<()> {
/// let query = QueryExecutor::new(GraphQlHttpClient::new(
///     "https://api.example.com/graphql",
/// )?);
/// let connector = WsStreamConnector::new("wss://api.example.com/graphql");
/// let registry = Arc::new(MyRegistry);
///
/// let mut coordinator = SyncCoordinator::new("LOC1", query, connector, registry);
/// coordinator.start(&StaticToken::new("token")).await?;
/// // ... synchronized; later:
/// coordinator.stop().await;
/// # Ok(())
/// # }
/// ```
pub struct SyncCoordinator<C, S> {
    location_id: String,
    query: QueryExecutor,
    connector: C,
    sink: Arc<S>,
    backoff: Duration,
    engine: Option<EngineHandle>,
}

impl<C, S> SyncCoordinator<C, S>
where
    C: StreamConnector + Clone + Send + 'static,
    S: AttributeSink + 'static,
{
    /// Creates a coordinator for one location.
    #[must_use]
    pub fn new(
        location_id: impl Into<String>,
        query: QueryExecutor,
        connector: C,
        sink: Arc<S>,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            query,
            connector,
            sink,
            backoff: DEFAULT_BACKOFF,
            engine: None,
        }
    }

    /// Sets the engine's reconnect backoff delay.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns true while the background engine task is held.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.engine.is_some()
    }

    /// Starts one synchronization run.
    ///
    /// Acquires the access token, spawns the subscription engine, then
    /// performs the one-shot snapshot fetch. The fetch is not gated on
    /// the stream delivering a first event — only on the task having
    /// been scheduled.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyStarted`] if a run is active
    /// - [`crate::AuthError`] if no token can be acquired
    /// - snapshot fetch errors ([`crate::TransportError`] /
    ///   [`crate::ProtocolError`]); the just-spawned engine is stopped
    ///   before the error is returned, since a consumer without a
    ///   baseline snapshot is not initialized
    pub async fn start<T: TokenProvider>(&mut self, tokens: &T) -> Result<()> {
        if self.engine.is_some() {
            return Err(Error::AlreadyStarted);
        }

        let token = tokens.access_token().await?;

        let engine = SubscriptionEngine::new(self.connector.clone(), &self.location_id, &token)
            .with_backoff(self.backoff);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let sink = Arc::clone(&self.sink);
        let task = tokio::spawn(engine.run(
            move |event| {
                let attributes = mapper::map_event(&event);
                if attributes.is_empty() {
                    tracing::debug!(
                        device_type = event.device_type.as_deref().unwrap_or("unknown"),
                        "Event produced no attributes"
                    );
                } else {
                    sink.apply(attributes);
                }
            },
            shutdown_rx,
        ));
        self.engine = Some(EngineHandle { shutdown, task });

        tracing::debug!(location_id = %self.location_id, "Subscription engine started");

        match self.query.fetch(&self.location_id, &token).await {
            Ok(records) => {
                let attributes = mapper::map_query(&records);
                if attributes.is_empty() {
                    tracing::debug!(
                        location_id = %self.location_id,
                        "Snapshot produced no attributes"
                    );
                } else {
                    self.sink.apply(attributes);
                }
                Ok(())
            }
            Err(e) => {
                self.stop().await;
                Err(e)
            }
        }
    }

    /// Stops the background engine and awaits its shutdown.
    ///
    /// Idempotent; a no-op when nothing is running.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.engine.take() {
            let _ = handle.shutdown.send(true);
            let _ = handle.task.await;
            tracing::debug!(location_id = %self.location_id, "Subscription engine stopped");
        }
    }
}
