use crate::live_api::{LiveClient, ManifestFormat, VodUrl};
use crate::oauth::Credentials;
use eyre::Context;

pub mod live_api;
pub mod oauth;

/// Turns a live playback URL into the VOD URLs of its recent sessions.
///
/// Runs the four Live API calls in order, each one finishing before the next starts:
/// authenticate, look up the sessions of the playback URL's resource, mint a playback token per
/// eligible session, and resolve every token to a URL. The returned URLs follow session order.
///
/// Any failure aborts the whole run and discards what was fetched so far. The report names the
/// failing step; the underlying [`live_api::Error`] can be recovered with
/// [`eyre::Report::downcast_ref`].
pub async fn fetch_vod_urls(
    client: &LiveClient,
    credentials: &Credentials,
    playback_url: &str,
    manifest_format: ManifestFormat,
) -> eyre::Result<Vec<VodUrl>> {
    let token = client
        .access_token(credentials)
        .await
        .context("generate access token")?;

    let lookup = client
        .list_sessions(&token, playback_url)
        .await
        .context("get sessions")?;

    let vod_tokens = client
        .mint_vod_tokens(&token, &lookup.sessions, manifest_format)
        .await
        .context("create playback tokens")?;

    let urls = client
        .resolve_vod_urls(&lookup.resource_id, &vod_tokens)
        .await
        .context("generate playback urls")?;

    tracing::info!(
        resource_id = lookup.resource_id,
        urls = urls.len(),
        "resolved VOD urls"
    );

    Ok(urls)
}
