// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `WattSync` - realtime device-state synchronization for smart-energy
//! locations.
//!
//! This library connects to a remote energy-management service, fetches
//! an initial snapshot of every device at a location, then maintains a
//! long-lived streaming subscription delivering incremental device-state
//! events. Both paths are normalized into flat attribute triples and
//! handed to a caller-supplied registry.
//!
//! # Architecture
//!
//! - [`QueryExecutor`]: one-shot snapshot fetch (GraphQL over HTTP)
//! - [`SubscriptionEngine`]: long-lived event stream with unconditional,
//!   automatic reconnection
//! - [`mapper`]: pure mapping from variant-tagged device records to
//!   `(device id, name, value)` triples
//! - [`SyncCoordinator`]: startup ordering and background-task ownership
//!
//! The caller supplies two collaborators: a [`TokenProvider`] for the
//! bearer credential and an [`AttributeSink`] for the normalized output.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use wattsync::transport::{GraphQlHttpClient, WsStreamConnector};
//! use wattsync::{Attribute, AttributeSink, QueryExecutor, StaticToken, SyncCoordinator};
//!
//! struct PrintRegistry;
//!
//! impl AttributeSink for PrintRegistry {
//!     fn apply(&self, attributes: Vec<Attribute>) {
//!         for attr in attributes {
//!             println!("{} {} = {:?}", attr.device_id, attr.name, attr.value);
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> wattsync::Result<()> {
//!     let query = QueryExecutor::new(GraphQlHttpClient::new(
//!         "https://api.example.com/graphql",
//!     )?);
//!     let connector = WsStreamConnector::new("wss://api.example.com/graphql");
//!
//!     let mut coordinator =
//!         SyncCoordinator::new("LOC1", query, connector, Arc::new(PrintRegistry));
//!     coordinator.start(&StaticToken::new("access-token")).await?;
//!
//!     // The subscription engine now runs in the background, reconnecting
//!     // on its own for the process lifetime.
//!     tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
//!     coordinator.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! # Resilience Model
//!
//! The snapshot fetch is retry-free: without a baseline, the consumer is
//! not initialized, so failures surface to the caller. The subscription
//! engine is the opposite: every transport failure is absorbed into a
//! reconnect loop with a backoff delay, indefinitely, and only an
//! explicit [`SyncCoordinator::stop`] (or dropping the shutdown channel)
//! terminates it. A reconnect may lose events in the gap; the stream
//! trades that completeness for liveness.

#[cfg(feature = "http")]
mod coordinator;
mod device;
pub mod error;
pub mod mapper;
pub mod operations;
#[cfg(feature = "http")]
mod query;
mod sink;
mod subscription;
mod token;
pub mod transport;

#[cfg(feature = "http")]
pub use coordinator::SyncCoordinator;
pub use device::{DeviceEvent, DeviceRecord, LocationSnapshot, Measurement};
pub use error::{AuthError, Error, ProtocolError, Result, TransportError};
pub use mapper::{Attribute, AttributeValue, map_event, map_query, map_record};
#[cfg(feature = "http")]
pub use query::QueryExecutor;
pub use sink::AttributeSink;
pub use subscription::{DEFAULT_BACKOFF, SubscriptionEngine};
pub use token::{StaticToken, TokenProvider};
pub use transport::{DeviceStream, StreamConnector};
