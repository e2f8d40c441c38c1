//! Brightcove Live sessions API types and playback URL parsing.
//!
//! A live resource (a "job") is broadcast in one or more sessions. Each session that has ended
//! can be turned into a VOD clip, see [`crate::live_api::playback`].

use crate::live_api::error::{Error, Result};
use jiff::Timestamp;
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// The identifiers embedded in a live playback URL.
///
/// Playback URLs look like
/// `https://fastly.live.brightcove.com/6384185469112/ap-south-1/6415518627001/eyJyui.../playlist-hls.m3u8`,
/// where the first path segment is the resource id and the third is the account id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackReference {
    resource_id: String,
    account_id: String,
}

impl PlaybackReference {
    /// Minimum number of `/`-separated parts in the URL path, counting the empty part before the
    /// leading slash.
    const MIN_PATH_PARTS: usize = 6;

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

impl FromStr for PlaybackReference {
    type Err = Error;

    fn from_str(reference: &str) -> Result<Self> {
        let url = Url::parse(reference)
            .map_err(|e| Error::malformed(reference, format!("not a URL ({e})")))?;

        let parts: Vec<&str> = url.path().split('/').collect();
        if parts.len() < Self::MIN_PATH_PARTS {
            return Err(Error::malformed(
                reference,
                format!(
                    "expected at least {} path parts, found {}",
                    Self::MIN_PATH_PARTS,
                    parts.len()
                ),
            ));
        }

        let (resource_id, account_id) = (parts[1], parts[3]);
        if resource_id.is_empty() || account_id.is_empty() {
            return Err(Error::malformed(reference, "empty resource or account id"));
        }

        Ok(Self {
            resource_id: resource_id.to_string(),
            account_id: account_id.to_string(),
        })
    }
}

/// Response structure for the list-sessions-by-resource call.
///
/// See: <https://apis.support.brightcove.com/live-api/references/reference.html>
#[derive(Debug, Deserialize)]
pub struct SessionListResponse {
    /// Sessions of the resource, in the order the platform returns them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sessions: Vec<Session>,
}

/// One broadcast of a live resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub id: String,
    pub resource_id: String,
    pub account_id: String,
    /// Epoch seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: i64,
    /// Epoch seconds, or `0` while the session is still live.
    ///
    /// Live sessions may also leave the field out or send `null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_time: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Session {
    pub fn is_live(&self) -> bool {
        self.end_time == 0
    }

    /// When the session ended, `None` while it is still live.
    pub fn ended_at(&self) -> Option<Timestamp> {
        if self.is_live() {
            return None;
        }
        Timestamp::from_second(self.end_time).ok()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session {} of {}", self.id, self.resource_id)
    }
}

/// The sessions of a resource together with the resource id they were looked up by.
///
/// The resource id is needed again once playback tokens have been minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLookup {
    pub resource_id: String,
    pub sessions: Vec<Session>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_api::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_brightcove_playback_url() {
        let reference: PlaybackReference = "https://fastly.live.brightcove.com/6384185469112/ap-south-1/6415518627001/eyJyui/playlist-hls.m3u8"
            .parse()
            .unwrap();
        assert_eq!(reference.resource_id(), "6384185469112");
        assert_eq!(reference.account_id(), "6415518627001");
    }

    #[test]
    fn ignores_query_and_fragment() {
        let reference: PlaybackReference = "https://host/ResA/region/AcctB/jwt/m.m3u8?x=/a/b/c#/d/e"
            .parse()
            .unwrap();
        assert_eq!(reference.resource_id(), "ResA");
        assert_eq!(reference.account_id(), "AcctB");
    }

    #[test]
    fn rejects_short_paths() {
        for reference in [
            "https://host/ResA/region/AcctB/m.m3u8",
            "https://host/ResA",
            "https://host",
        ] {
            let err = reference.parse::<PlaybackReference>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::LocalValidation, "{reference}");
            assert!(matches!(err, Error::MalformedReference { .. }));
        }
    }

    #[test]
    fn rejects_non_urls() {
        for reference in [
            "ResA/region/AcctB/jwt/m.m3u8",
            "host/ResA/region/AcctB/jwt/m.m3u8",
        ] {
            let err = reference.parse::<PlaybackReference>().unwrap_err();
            assert!(matches!(err, Error::MalformedReference { .. }), "{reference}");
        }
    }

    #[test]
    fn rejects_empty_identifiers() {
        let err = "https://host//region//jwt/m.m3u8"
            .parse::<PlaybackReference>()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedReference { .. }));
    }

    #[test]
    fn session_list_decodes() {
        let response: SessionListResponse = serde_json::from_str(
            r#"{"sessions":[{"id":"s1","resource_id":"ResA","account_id":"AcctB","start_time":1000,"end_time":2000,"extra":true}]}"#,
        )
        .unwrap();
        assert_eq!(
            response.sessions,
            vec![Session {
                id: "s1".into(),
                resource_id: "ResA".into(),
                account_id: "AcctB".into(),
                start_time: 1000,
                end_time: 2000,
            }]
        );

        let empty: SessionListResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.sessions.is_empty());

        let null: SessionListResponse = serde_json::from_str(r#"{"sessions":null}"#).unwrap();
        assert!(null.sessions.is_empty());
    }

    #[test]
    fn missing_or_null_end_time_means_live() {
        for raw in [
            r#"{"id":"s1","resource_id":"ResA","account_id":"AcctB","start_time":1000}"#,
            r#"{"id":"s1","resource_id":"ResA","account_id":"AcctB","start_time":1000,"end_time":null}"#,
        ] {
            let session: Session = serde_json::from_str(raw).unwrap();
            assert_eq!(session.end_time, 0, "{raw}");
            assert!(session.is_live(), "{raw}");
        }

        let session: Session = serde_json::from_str(
            r#"{"id":"s1","resource_id":"ResA","account_id":"AcctB","start_time":null,"end_time":2000}"#,
        )
        .unwrap();
        assert_eq!(session.start_time, 0);
    }

    #[test]
    fn live_sessions_have_no_end() {
        let mut session = Session {
            id: "s1".into(),
            resource_id: "ResA".into(),
            account_id: "AcctB".into(),
            start_time: 1000,
            end_time: 0,
        };
        assert!(session.is_live());
        assert_eq!(session.ended_at(), None);

        session.end_time = 2000;
        assert!(!session.is_live());
        assert_eq!(session.to_string(), "session s1 of ResA");
        assert_eq!(session.ended_at(), Some(Timestamp::from_second(2000).unwrap()));
    }
}
