// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-shot snapshot fetch of all devices at a location.

use crate::device::{DeviceRecord, LocationSnapshot};
use crate::error::{Error, ProtocolError, Result};
use crate::operations::QUERY_GET_LOCATION;
use crate::transport::GraphQlHttpClient;

/// Executes the initial full-state query for a location.
///
/// This is deliberately retry-free: a consumer cannot be considered
/// initialized without a baseline snapshot, so a failed fetch is surfaced
/// to the caller instead of being absorbed. Resilience lives in the
/// subscription engine, not here.
///
/// # Examples
///
/// ```no_run
/// use wattsync::QueryExecutor;
/// use wattsync::transport::GraphQlHttpClient;
///
/// # async fn example() -> wattsync::Result<()> {
/// let client = GraphQlHttpClient::new("https://api.example.com/graphql")?;
/// let executor = QueryExecutor::new(client);
/// let devices = executor.fetch("LOC1", "token").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    client: GraphQlHttpClient,
}

impl QueryExecutor {
    /// Creates an executor over the given GraphQL HTTP client.
    #[must_use]
    pub fn new(client: GraphQlHttpClient) -> Self {
        Self { client }
    }

    /// Fetches the device snapshot for a location.
    ///
    /// Returns the device records unmapped; mapping happens at the
    /// coordinator so the query and subscription paths share one mapper
    /// invocation point.
    ///
    /// # Errors
    ///
    /// - [`crate::AuthError`] if the service rejects the token
    /// - [`crate::TransportError`] on network failure
    /// - [`crate::ProtocolError`] on a malformed response shape
    pub async fn fetch(&self, location_id: &str, token: &str) -> Result<Vec<DeviceRecord>> {
        let snapshot = self.fetch_snapshot(location_id, token).await?;

        tracing::debug!(
            location_id,
            devices = snapshot.devices.len(),
            "Fetched device snapshot"
        );

        Ok(snapshot.devices)
    }

    /// Fetches the full location snapshot, including location metadata.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch).
    pub async fn fetch_snapshot(&self, location_id: &str, token: &str) -> Result<LocationSnapshot> {
        let data = self
            .client
            .execute(
                QUERY_GET_LOCATION,
                serde_json::json!({ "locationId": location_id }),
                token,
            )
            .await?;

        let location = data
            .get("getLocation")
            .cloned()
            .ok_or_else(|| ProtocolError::MissingField("getLocation".to_string()))?;

        serde_json::from_value(location)
            .map_err(ProtocolError::Json)
            .map_err(Error::from)
    }
}
