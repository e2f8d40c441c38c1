//! Brightcove Live VOD playback types and the rules for which sessions may be clipped.
//!
//! # Eligibility
//!
//! The platform only mints playback tokens for finished sessions, and only for a limited time:
//!
//! - While *any* session of a resource is live, no session of that resource can be turned into a
//!   VOD. This is a gate over the whole session list, see [`ensure_none_live`].
//! - A finished session can be clipped for [`VOD_WINDOW`] after it ended. Older sessions are
//!   skipped one by one without failing the batch, see [`within_vod_window`].

use crate::live_api::error::{Error, Result};
use crate::live_api::sessions::Session;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How long after a session ends it can still be turned into a VOD.
pub const VOD_WINDOW: SignedDuration = SignedDuration::from_hours(14 * 24);

/// Manifest flavour requested when minting a playback token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    #[default]
    Hls,
    Dash,
}

impl ManifestFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestFormat::Hls => "hls",
            ManifestFormat::Dash => "dash",
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManifestFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hls" => Ok(ManifestFormat::Hls),
            "dash" => Ok(ManifestFormat::Dash),
            other => Err(format!("unknown manifest format '{other}', expected hls or dash")),
        }
    }
}

/// Request body for minting a playback token for one session.
///
/// The platform expects the times as decimal strings rather than numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackTokenRequest {
    pub start_time: String,
    pub end_time: String,
    pub manifest_format: ManifestFormat,
}

impl PlaybackTokenRequest {
    pub fn for_session(session: &Session, manifest_format: ManifestFormat) -> Self {
        Self {
            start_time: session.start_time.to_string(),
            end_time: session.end_time.to_string(),
            manifest_format,
        }
    }
}

/// A playback token for a single finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VodToken {
    pub token: String,
}

/// The resolved VOD playback URL of one [`VodToken`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VodUrl {
    pub url: String,
}

impl fmt::Display for VodUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Fails if any session of the list is still live.
pub fn ensure_none_live(sessions: &[Session]) -> Result<()> {
    match sessions.iter().find(|session| session.is_live()) {
        Some(live) => Err(Error::LiveSession {
            resource_id: live.resource_id.clone(),
        }),
        None => Ok(()),
    }
}

/// Whether a finished session ended no earlier than [`VOD_WINDOW`] before `now`.
pub fn within_vod_window(session: &Session, now: Timestamp) -> bool {
    let cutoff = now.as_nanosecond() - VOD_WINDOW.as_nanos();
    i128::from(session.end_time) * 1_000_000_000 >= cutoff
}
