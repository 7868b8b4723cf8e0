// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Credential collaborator seam.

use crate::error::AuthError;

/// Source of the opaque bearer access token.
///
/// Consumed exactly once per coordinator start; the token is then shared
/// read-only between the snapshot query and the subscription transport
/// for the lifetime of that run. Token refresh is the collaborator's
/// concern: a token change requires stopping and restarting the
/// coordinator.
pub trait TokenProvider {
    /// Returns a fresh access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if no token can be produced; this is fatal
    /// to coordinator startup.
    fn access_token(&self) -> impl Future<Output = Result<String, AuthError>> + Send;
}

/// A provider that always hands out the same pre-acquired token.
///
/// Useful for tests and for callers that manage credentials themselves.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wraps a pre-acquired token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_returns_wrapped_value() {
        let provider = StaticToken::new("tok-123");
        assert_eq!(provider.access_token().await.unwrap(), "tok-123");
    }
}
