// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `WattSync` library.
//!
//! This module provides the error hierarchy for failures across the
//! library: credential acquisition, transport communication, and
//! protocol/payload parsing.
//!
//! The split matters for recovery behavior: the one-shot snapshot query
//! surfaces every failure to the caller, while the subscription engine
//! absorbs [`TransportError`] into its reconnect loop and only ever stops
//! on an explicit cancellation signal.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while acquiring or using the access token.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Error occurred at the transport layer.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The remote response violated the expected protocol shape.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The coordinator was started while already running.
    #[error("coordinator already started")]
    AlreadyStarted,
}

/// Errors related to the access token.
///
/// These are fatal to coordinator startup: the core does not refresh
/// tokens itself.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential collaborator could not produce a token.
    #[error("access token unavailable: {0}")]
    TokenUnavailable(String),

    /// The remote service rejected the token (invalid or expired).
    #[error("access token rejected by the service")]
    TokenRejected,
}

/// Errors related to transport communication (HTTP/WebSocket).
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket connection or communication failed.
    #[cfg(feature = "ws")]
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Connection to the service failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The stream was closed by the remote end.
    #[error("stream closed by remote")]
    Closed,
}

/// Errors related to the shape of remote payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// The service returned GraphQL-level errors.
    #[error("service returned errors: {0}")]
    Errors(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_display() {
        let err = AuthError::TokenUnavailable("login failed".to_string());
        assert_eq!(err.to_string(), "access token unavailable: login failed");
    }

    #[test]
    fn error_from_auth_error() {
        let err: Error = AuthError::TokenRejected.into();
        assert!(matches!(err, Error::Auth(AuthError::TokenRejected)));
    }

    #[test]
    fn transport_error_display() {
        let err = TransportError::ConnectionFailed("refused".to_string());
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::MissingField("getLocation".to_string());
        assert_eq!(err.to_string(), "missing field in response: getLocation");
    }
}
