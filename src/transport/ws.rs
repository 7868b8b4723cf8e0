// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WebSocket event-stream transport.
//!
//! Speaks the `graphql-transport-ws` subprotocol: `connection_init` /
//! `connection_ack` handshake, one `subscribe` operation, then a lazy
//! sequence of `next` messages until `complete` or a transport drop.
//! Authentication rides an `access_token` query parameter on the
//! websocket URL.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::device::DeviceEvent;
use crate::error::TransportError;
use crate::operations::SUBSCRIPTION_DEVICE_UPDATED;
use crate::transport::{DeviceStream, StreamConnector};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Identifier of the single subscription operation on each session.
const OPERATION_ID: &str = "1";

/// Messages received from the server under `graphql-transport-ws`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    ConnectionAck,
    Next {
        #[serde(default)]
        payload: Option<NextPayload>,
    },
    Error {
        #[serde(default)]
        payload: Value,
    },
    Complete,
    Ping,
    Pong,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct NextPayload {
    #[serde(default)]
    data: Option<Value>,
}

/// Connector opening `graphql-transport-ws` sessions against the service.
///
/// # Examples
///
/// ```no_run
/// use wattsync::transport::{StreamConnector, WsStreamConnector};
///
/// # async fn example() -> wattsync::Result<()> {
/// let connector = WsStreamConnector::new("wss://api.example.com/graphql");
/// let stream = connector.connect("LOC1", "token").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WsStreamConnector {
    endpoint: String,
    handshake_timeout: Duration,
}

impl WsStreamConnector {
    /// Default timeout for the connect + protocol handshake.
    pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a connector for the given websocket endpoint URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            handshake_timeout: Self::DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Sets a custom handshake timeout.
    #[must_use]
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    async fn open_session(
        &self,
        location_id: &str,
        token: &str,
    ) -> Result<WsDeviceStream, TransportError> {
        let url = format!("{}?access_token={token}", self.endpoint);
        let mut request = url.into_client_request()?;
        request.headers_mut().insert(
            SEC_WEBSOCKET_PROTOCOL,
            HeaderValue::from_static("graphql-transport-ws"),
        );

        let (mut socket, _response) = connect_async(request).await?;

        socket
            .send(Message::Text(
                serde_json::json!({ "type": "connection_init" }).to_string(),
            ))
            .await?;

        // Wait for connection_ack before subscribing.
        loop {
            match socket.next().await {
                None => return Err(TransportError::Closed),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(Message::Close(_))) => return Err(TransportError::Closed),
                Some(Ok(Message::Ping(data))) => socket.send(Message::Pong(data)).await?,
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(ServerMessage::ConnectionAck) => break,
                        Ok(ServerMessage::Error { payload }) => {
                            return Err(TransportError::ConnectionFailed(format!(
                                "handshake rejected: {payload}"
                            )));
                        }
                        _ => {}
                    }
                }
                Some(Ok(_)) => {}
            }
        }

        socket
            .send(Message::Text(
                serde_json::json!({
                    "type": "subscribe",
                    "id": OPERATION_ID,
                    "payload": {
                        "query": SUBSCRIPTION_DEVICE_UPDATED,
                        "variables": { "locationId": location_id },
                    },
                })
                .to_string(),
            ))
            .await?;

        tracing::debug!(location_id, "Device update subscription established");

        Ok(WsDeviceStream { socket })
    }
}

impl StreamConnector for WsStreamConnector {
    type Stream = WsDeviceStream;

    async fn connect(
        &self,
        location_id: &str,
        token: &str,
    ) -> Result<Self::Stream, TransportError> {
        tokio::time::timeout(
            self.handshake_timeout,
            self.open_session(location_id, token),
        )
        .await
        .map_err(|_| {
            TransportError::ConnectionFailed("websocket handshake timed out".to_string())
        })?
    }
}

/// One open subscription session.
#[derive(Debug)]
pub struct WsDeviceStream {
    socket: Socket,
}

impl DeviceStream for WsDeviceStream {
    async fn next_event(&mut self) -> Result<Option<DeviceEvent>, TransportError> {
        loop {
            match self.socket.next().await {
                None => return Ok(None),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(Message::Ping(data))) => {
                    self.socket.send(Message::Pong(data)).await?;
                }
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(ServerMessage::Next { payload }) => {
                            if let Some(event) = decode_event(payload) {
                                return Ok(Some(event));
                            }
                        }
                        Ok(ServerMessage::Complete) => return Ok(None),
                        Ok(ServerMessage::Ping) => {
                            self.socket
                                .send(Message::Text(
                                    serde_json::json!({ "type": "pong" }).to_string(),
                                ))
                                .await?;
                        }
                        Ok(ServerMessage::Error { payload }) => {
                            tracing::warn!(%payload, "Skipping errored subscription payload");
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, "Skipping malformed stream message");
                        }
                    }
                }
                Some(Ok(_)) => {}
            }
        }
    }
}

/// Extracts a device event from a `next` payload.
///
/// Undecodable payloads are logged and skipped; one bad event must not
/// terminate the stream.
fn decode_event(payload: Option<NextPayload>) -> Option<DeviceEvent> {
    let data = payload.and_then(|p| p.data)?;
    let update = data.get("onAnyDeviceUpdated").cloned()?;
    match serde_json::from_value::<DeviceEvent>(update) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping undecodable device event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_event_from_next_payload() {
        let text = serde_json::json!({
            "type": "next",
            "id": "1",
            "payload": {
                "data": {
                    "onAnyDeviceUpdated": {
                        "deviceType": "BasicSwitch",
                        "operationId": "op-1",
                        "device": {
                            "deviceType": "BasicSwitch",
                            "id": "D1",
                            "state": "on"
                        }
                    }
                }
            }
        })
        .to_string();

        let ServerMessage::Next { payload } = serde_json::from_str(&text).unwrap() else {
            panic!("expected next message");
        };
        let event = decode_event(payload).unwrap();
        assert_eq!(event.device.device_id(), Some("D1"));
        assert_eq!(event.operation_id.as_deref(), Some("op-1"));
    }

    #[test]
    fn decode_event_skips_missing_data() {
        let ServerMessage::Next { payload } =
            serde_json::from_str(r#"{ "type": "next", "payload": {} }"#).unwrap()
        else {
            panic!("expected next message");
        };
        assert!(decode_event(payload).is_none());
    }

    #[test]
    fn server_message_parses_error_type() {
        let text = serde_json::json!({
            "type": "error",
            "id": "1",
            "payload": [{ "message": "boom" }]
        })
        .to_string();

        assert!(matches!(
            serde_json::from_str::<ServerMessage>(&text).unwrap(),
            ServerMessage::Error { .. }
        ));
    }

    #[test]
    fn server_message_tolerates_unknown_type() {
        let text = serde_json::json!({ "type": "ka" }).to_string();
        assert!(matches!(
            serde_json::from_str::<ServerMessage>(&text).unwrap(),
            ServerMessage::Other
        ));
    }
}
