//! OAuth client-credentials types for the Brightcove Live API.
//!
//! The platform hands out short-lived bearer tokens in exchange for a client id and secret sent
//! as HTTP Basic auth. Tokens are used once for the lifetime of the process and never refreshed.

use oauth2::{ClientId, ClientSecret};
use serde::Deserialize;
use std::time::Duration;

/// Token endpoint path, relative to [`crate::live_api::Endpoints::oauth`].
pub(crate) const TOKEN_PATH: &str = "/v4/access_token";

/// The client id and secret of a Brightcove API client.
///
/// The secret is redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct Credentials {
    client_id: ClientId,
    client_secret: ClientSecret,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: ClientId::new(client_id.into()),
            client_secret: ClientSecret::new(client_secret.into()),
        }
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.secret()
    }
}

/// A bearer token obtained through the client-credentials grant.
///
/// See: <https://apis.support.brightcove.com/oauth/getting-started/overview-oauth-api-v4.html>
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    access_token: oauth2::AccessToken,
    /// Lifetime of the token in seconds, as reported by the OAuth server.
    expires_in: u64,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            access_token: oauth2::AccessToken::new(access_token.into()),
            expires_in: expires_in.as_secs(),
        }
    }

    pub fn secret(&self) -> &str {
        self.access_token.secret()
    }

    pub fn expires_in(&self) -> Duration {
        Duration::from_secs(self.expires_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn debug_output_hides_secrets() {
        let credentials = Credentials::new("my-client", "hunter2");
        let token = AccessToken::new("very-secret-token", Duration::from_secs(300));

        let debug = format!("{credentials:?} {token:?}");
        assert!(debug.contains("my-client"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("very-secret-token"));
    }

    #[test]
    fn token_response_decodes() {
        let token: AccessToken = serde_json::from_str(
            r#"{"access_token":"abc","token_type":"Bearer","expires_in":300}"#,
        )
        .unwrap();
        assert_eq!(token.secret(), "abc");
        assert_eq!(token.expires_in(), Duration::from_secs(300));
    }
}
