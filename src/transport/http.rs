// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GraphQL-over-HTTP client for one-shot queries.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AuthError, Error, ProtocolError, TransportError};

/// Shape of a GraphQL HTTP response body.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
}

/// HTTP client executing GraphQL queries against the service endpoint.
///
/// Stateless between calls: each [`execute`](Self::execute) is an
/// independent request/response exchange, authenticated with a bearer
/// token, and the underlying connection is released on every exit path.
///
/// # Examples
///
/// ```no_run
/// use wattsync::transport::GraphQlHttpClient;
///
/// # async fn example() -> wattsync::Result<()> {
/// let client = GraphQlHttpClient::new("https://api.example.com/graphql")?;
/// let data = client
///     .execute("query { __typename }", serde_json::json!({}), "token")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GraphQlHttpClient {
    endpoint: String,
    client: Client,
}

impl GraphQlHttpClient {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new client for the given GraphQL endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, Error> {
        Self::with_timeout(endpoint, Self::DEFAULT_TIMEOUT)
    }

    /// Creates a new client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Executes one GraphQL query and returns the `data` object.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenRejected`] on HTTP 401/403
    /// - [`TransportError`] on network failure or other non-success status
    /// - [`ProtocolError`] on a malformed body, a missing `data` object,
    ///   or GraphQL-level errors
    pub async fn execute(&self, query: &str, variables: Value, token: &str) -> Result<Value, Error> {
        tracing::debug!(endpoint = %self.endpoint, "Executing GraphQL query");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await
            .map_err(TransportError::Http)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AuthError::TokenRejected.into());
            }
            status if !status.is_success() => {
                return Err(TransportError::ConnectionFailed(format!(
                    "HTTP {} - {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ))
                .into());
            }
            _ => {}
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| ProtocolError::UnexpectedFormat(e.to_string()))?;

        if let Some(errors) = body.errors
            && !errors.is_empty()
        {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(ProtocolError::Errors(messages.join("; ")).into());
        }

        body.data
            .ok_or_else(|| ProtocolError::MissingField("data".to_string()).into())
    }
}
