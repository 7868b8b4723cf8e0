// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport implementations for the energy-management service.
//!
//! Two logical operations exist against one endpoint family:
//!
//! - a one-shot structured query (request/response), served by
//!   [`GraphQlHttpClient`] over HTTP;
//! - a server-push event stream, served by [`WsStreamConnector`] over a
//!   websocket.
//!
//! The subscription engine only ever talks to the [`StreamConnector`] and
//! [`DeviceStream`] traits, so resilience behavior can be exercised
//! against scripted in-memory transports in tests.

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "ws")]
mod ws;

#[cfg(feature = "http")]
pub use http::GraphQlHttpClient;
#[cfg(feature = "ws")]
pub use ws::{WsDeviceStream, WsStreamConnector};

use crate::device::DeviceEvent;
use crate::error::TransportError;

/// Factory for long-lived event-stream sessions.
///
/// One `connect` call corresponds to one stream session; the engine calls
/// it again after every drop. Futures are `Send` so the engine can run as
/// a spawned background task.
pub trait StreamConnector: Send + Sync {
    /// The stream session type produced on a successful connect.
    type Stream: DeviceStream;

    /// Opens a new event-stream session for the given location,
    /// authenticated with the given token.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the session cannot be established.
    /// The engine treats this the same as a mid-stream drop.
    fn connect(
        &self,
        location_id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Self::Stream, TransportError>> + Send;
}

/// One open event-stream session.
pub trait DeviceStream: Send {
    /// Receives the next device-update event.
    ///
    /// Returns `Ok(None)` on a clean close by the remote end. Payloads
    /// that fail to parse as events are skipped by implementations, not
    /// surfaced here: a malformed single event must not terminate the
    /// stream.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the session drops.
    fn next_event(
        &mut self,
    ) -> impl Future<Output = Result<Option<DeviceEvent>, TransportError>> + Send;
}
