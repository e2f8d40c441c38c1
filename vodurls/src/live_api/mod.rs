//! Brightcove Live API client library.
//!
//! Only the parts of the API needed to turn a finished live stream into VOD clips are covered:
//!
//! 1. [`LiveClient::access_token`] exchanges API client credentials for a bearer token.
//! 2. [`LiveClient::list_sessions`] finds every session of the resource behind a playback URL.
//! 3. [`LiveClient::mint_vod_tokens`] mints a playback token per session that may be clipped.
//! 4. [`LiveClient::resolve_vod_urls`] turns each playback token into a playable URL.
//!
//! Every call is sent on its own and awaited before the next one starts. The first failure of any
//! call ends the sequence; nothing is retried.

pub mod client;
pub mod error;
pub mod playback;
pub mod sessions;

pub use client::{Endpoints, LiveClient};
pub use error::{Error, ErrorKind};
pub use playback::{ManifestFormat, VOD_WINDOW, VodToken, VodUrl};
pub use sessions::{PlaybackReference, Session, SessionLookup};
