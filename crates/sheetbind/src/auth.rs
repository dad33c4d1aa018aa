//! Credentials seam
//!
//! Token acquisition (OAuth flows, service-account exchange, metadata
//! servers) is the caller's concern. The client asks a [`TokenProvider`]
//! for a bearer token before each request, so rotation happens wherever
//! the caller implements it.

use std::fmt;

use crate::error::Result;

/// Supplies the bearer token sent with each API request.
pub trait TokenProvider: Send + Sync {
    /// Return a currently valid access token.
    ///
    /// Implementations that refresh tokens should fail with
    /// [`crate::ClientError::Credentials`] when a refresh is impossible.
    fn access_token(&self) -> Result<String>;
}

/// A fixed, pre-obtained access token.
///
/// Suitable for short-lived tools and tests; long-running callers should
/// implement [`TokenProvider`] over their own refresh logic.
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap an access token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

// Token values stay out of Debug output
impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

impl<F> TokenProvider for F
where
    F: Fn() -> Result<String> + Send + Sync,
{
    fn access_token(&self) -> Result<String> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token() {
        let provider = StaticToken::new("ya29.secret");
        assert_eq!(provider.access_token().unwrap(), "ya29.secret");
        assert_eq!(format!("{:?}", provider), "StaticToken(..)");
    }

    #[test]
    fn test_closure_provider() {
        let provider = || Ok("fresh".to_string());
        assert_eq!(provider.access_token().unwrap(), "fresh");
    }
}
