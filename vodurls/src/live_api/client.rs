//! Core Brightcove Live API client and its HTTP transport.

use crate::live_api::error::{Error, Result};
use crate::live_api::playback::{
    ManifestFormat, PlaybackTokenRequest, VodToken, VodUrl, ensure_none_live, within_vod_window,
};
use crate::live_api::sessions::{PlaybackReference, Session, SessionListResponse, SessionLookup};
use crate::oauth::{self, AccessToken, Credentials};
use bytes::Bytes;
use http::{Method, StatusCode};
use jiff::Timestamp;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

/// Base URLs of the two hosts the platform is split across.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Host issuing access tokens.
    pub oauth: String,
    /// Host serving the Live API itself.
    pub api: String,
}

impl Endpoints {
    pub fn new(oauth: impl Into<String>, api: impl Into<String>) -> Self {
        Self {
            oauth: oauth.into().trim_end_matches('/').to_string(),
            api: api.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(
            "https://oauth.brightcove.com",
            "https://api.live.brightcove.com",
        )
    }
}

/// How a request authenticates itself.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Authorization<'a> {
    None,
    Basic(&'a Credentials),
    Bearer(&'a AccessToken),
}

/// Client for the Brightcove Live API.
///
/// One client is built per process and shared by reference between all pipeline stages, so that
/// every call goes through the same connection pool and the same per-request timeout.
#[derive(Debug, Clone)]
pub struct LiveClient {
    endpoints: Endpoints,
    /// HTTP client for API requests
    client: reqwest::Client,
}

impl LiveClient {
    /// Creates a client whose requests each give up after `timeout`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (TLS backend initialization failure).
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Self {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .build()
            .expect("building reqwest client should not fail");
        Self { endpoints, client }
    }

    /// Issues one request and returns its body if the platform answered `200 OK`.
    ///
    /// The body is always read to the end, also for rejected requests, so the connection can go
    /// back to the pool before the next request is sent.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method to use
    /// * `url` - The full endpoint URL
    /// * `auth` - Which credentials, if any, to present
    /// * `query_params` - Optional query parameters
    /// * `form_body` - Optional `application/x-www-form-urlencoded` body
    /// * `json_body` - Optional JSON body
    #[instrument(skip(self, auth, query_params, form_body, json_body), level = tracing::Level::TRACE)]
    pub(crate) async fn request(
        &self,
        method: Method,
        url: &str,
        auth: Authorization<'_>,
        query_params: Option<&[(&str, &str)]>,
        form_body: Option<&[(&str, &str)]>,
        json_body: Option<&impl Serialize>,
    ) -> Result<Bytes> {
        let mut request = self.client.request(method.clone(), url);

        request = match auth {
            Authorization::None => request,
            Authorization::Basic(credentials) => {
                request.basic_auth(credentials.client_id(), Some(credentials.client_secret()))
            }
            Authorization::Bearer(token) => request.bearer_auth(token.secret()),
        };

        if let Some(params) = query_params {
            request = request.query(params);
        }

        if let Some(form) = form_body {
            request = request.form(form);
        }

        if let Some(body) = json_body {
            request = request.json(body);
        }

        let transport = |source| Error::Transport {
            method: method.clone(),
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        if status != StatusCode::OK {
            return Err(Error::Upstream {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        tracing::trace!(%status, len = body.len(), "received response");
        Ok(body)
    }

    /// Exchanges API client credentials for a bearer token.
    ///
    /// Uses the client-credentials grant with the credentials as HTTP Basic auth.
    ///
    /// # API Reference
    ///
    /// <https://apis.support.brightcove.com/oauth/code-samples/oauth-api-sample-get-access-token.html>
    #[instrument(skip(self, credentials), fields(client_id = credentials.client_id()))]
    pub async fn access_token(&self, credentials: &Credentials) -> Result<AccessToken> {
        let url = format!("{}{}", self.endpoints.oauth, oauth::TOKEN_PATH);

        let body = self
            .request(
                Method::POST,
                &url,
                Authorization::Basic(credentials),
                None,
                Some(&[("grant_type", "client_credentials")]),
                None::<&()>,
            )
            .await?;

        let token: AccessToken = decode(&body)?;

        tracing::debug!(
            expires_in = token.expires_in().as_secs(),
            "obtained access token"
        );

        Ok(token)
    }

    /// Looks up all sessions of the live resource a playback URL points at.
    ///
    /// The playback URL is validated before anything is sent; a malformed URL never reaches the
    /// network.
    ///
    /// # Returns
    ///
    /// The sessions in platform order, together with the resource id extracted from the URL.
    #[instrument(skip(self, token, playback_url))]
    pub async fn list_sessions(
        &self,
        token: &AccessToken,
        playback_url: &str,
    ) -> Result<SessionLookup> {
        let reference: PlaybackReference = playback_url.parse()?;

        let url = format!(
            "{}/v2/accounts/{}/sessions/resource/{}",
            self.endpoints.api,
            reference.account_id(),
            reference.resource_id()
        );

        let body = self
            .request(
                Method::GET,
                &url,
                Authorization::Bearer(token),
                None,
                None,
                None::<&()>,
            )
            .await?;

        let response: SessionListResponse = decode(&body)?;

        tracing::debug!(
            resource_id = reference.resource_id(),
            returned_items = response.sessions.len(),
            "fetched sessions"
        );

        Ok(SessionLookup {
            resource_id: reference.resource_id().to_string(),
            sessions: response.sessions,
        })
    }

    /// Mints one VOD playback token per session that can still be clipped.
    ///
    /// See [`crate::live_api::playback`] for the eligibility rules. Sessions that ended more than
    /// [`crate::live_api::playback::VOD_WINDOW`] ago are skipped. The first failing request aborts the whole batch.
    ///
    /// # Errors
    ///
    /// * [`Error::NoSessions`] if `sessions` is empty
    /// * [`Error::LiveSession`] if any session is still live
    /// * [`Error::NoValidSessions`] if every session is outside the VOD window
    pub async fn mint_vod_tokens(
        &self,
        token: &AccessToken,
        sessions: &[Session],
        manifest_format: ManifestFormat,
    ) -> Result<Vec<VodToken>> {
        self.mint_vod_tokens_at(token, sessions, manifest_format, Timestamp::now())
            .await
    }

    #[instrument(skip(self, token, sessions), fields(sessions = sessions.len()))]
    pub(crate) async fn mint_vod_tokens_at(
        &self,
        token: &AccessToken,
        sessions: &[Session],
        manifest_format: ManifestFormat,
        now: Timestamp,
    ) -> Result<Vec<VodToken>> {
        let Some(first) = sessions.first() else {
            return Err(Error::NoSessions);
        };
        ensure_none_live(sessions)?;

        // all sessions share the resource the list was fetched for
        let url = format!(
            "{}/v2/accounts/{}/playback/{}/token",
            self.endpoints.api, first.account_id, first.resource_id
        );

        let mut tokens = Vec::new();
        for session in sessions {
            if !within_vod_window(session, now) {
                tracing::info!(
                    %session,
                    ended_at = ?session.ended_at(),
                    "session ended more than 14 days ago, VOD window out of range"
                );
                continue;
            }

            let request = PlaybackTokenRequest::for_session(session, manifest_format);
            let body = self
                .request(
                    Method::POST,
                    &url,
                    Authorization::Bearer(token),
                    None,
                    None,
                    Some(&request),
                )
                .await?;

            let vod_token: VodToken = decode(&body)?;
            tracing::debug!(session_id = session.id, "minted playback token");
            tokens.push(vod_token);
        }

        if tokens.is_empty() {
            return Err(Error::NoValidSessions);
        }

        Ok(tokens)
    }

    /// Resolves each playback token to its VOD URL, in token order.
    ///
    /// Playback resolution is public; the token itself is the credential.
    #[instrument(skip(self, tokens), fields(tokens = tokens.len()))]
    pub async fn resolve_vod_urls(
        &self,
        resource_id: &str,
        tokens: &[VodToken],
    ) -> Result<Vec<VodUrl>> {
        let url = format!("{}/v2/playback/{}", self.endpoints.api, resource_id);

        let mut urls = Vec::with_capacity(tokens.len());
        for vod_token in tokens {
            let query_params = [("pt", vod_token.token.as_str())];
            let body = self
                .request(
                    Method::GET,
                    &url,
                    Authorization::None,
                    Some(&query_params),
                    None,
                    None::<&()>,
                )
                .await?;

            urls.push(decode::<VodUrl>(&body)?);
        }

        tracing::debug!(returned_items = urls.len(), "resolved playback urls");

        Ok(urls)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| Error::Decode {
        body: String::from_utf8_lossy(body).into_owned(),
        source,
    })
}
