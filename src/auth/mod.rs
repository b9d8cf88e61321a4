//! Bearer-token handling for Graph requests.
//!
//! Token acquisition (OAuth flows, device code, refresh) is the caller's
//! concern; the client only attaches a pre-obtained token to outgoing
//! requests.

use secrecy::{ExposeSecret, SecretString};

/// A pre-obtained Microsoft Graph access token.
///
/// Wraps the token material so it is zeroized on drop and never shows up in
/// `Debug` output or logs.
#[derive(Clone)]
pub struct AccessToken {
    token: SecretString,
}

impl AccessToken {
    /// Creates an access token from the raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
        }
    }

    /// Renders the `Authorization` header value.
    pub(crate) fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}
