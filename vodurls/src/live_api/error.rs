//! Errors produced by the individual Live API stages.

use http::StatusCode;
use thiserror::Error;

/// Coarse classification of an [`Error`].
///
/// Every kind is terminal to the VOD pipeline; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected locally, before or instead of a network call.
    LocalValidation,
    /// The platform answered with something other than `200 OK`.
    UpstreamRejection,
    /// The request never produced a complete response (connect, DNS, timeout).
    TransportFailure,
    /// The response body did not have the expected shape.
    DecodeFailure,
    /// The platform forbids the operation in the resource's current state.
    BusinessRuleViolation,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed playback URL provided: {reason}")]
    MalformedReference { reference: String, reason: String },

    #[error("no sessions found for the playback URL")]
    NoSessions,

    #[error("no valid sessions to continue: every session ended outside the VOD window")]
    NoValidSessions,

    #[error(
        "resource {resource_id} has an ongoing live session, \
         cannot generate VOD URLs until the stream ends"
    )]
    LiveSession { resource_id: String },

    #[error("received error from API with status {status} and error {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("send {method} request to {url}")]
    Transport {
        method: http::Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("decode response body {body:?}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedReference { .. } | Error::NoSessions | Error::NoValidSessions => {
                ErrorKind::LocalValidation
            }
            Error::LiveSession { .. } => ErrorKind::BusinessRuleViolation,
            Error::Upstream { .. } => ErrorKind::UpstreamRejection,
            Error::Transport { .. } => ErrorKind::TransportFailure,
            Error::Decode { .. } => ErrorKind::DecodeFailure,
        }
    }

    /// The HTTP status of an upstream rejection.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw response body, for upstream rejections and undecodable responses.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Upstream { body, .. } | Error::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    pub(crate) fn malformed(reference: &str, reason: impl Into<String>) -> Self {
        Error::MalformedReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kinds_cover_every_variant() {
        assert_eq!(
            Error::malformed("x", "too short").kind(),
            ErrorKind::LocalValidation
        );
        assert_eq!(Error::NoSessions.kind(), ErrorKind::LocalValidation);
        assert_eq!(Error::NoValidSessions.kind(), ErrorKind::LocalValidation);
        assert_eq!(
            Error::LiveSession {
                resource_id: "r".into()
            }
            .kind(),
            ErrorKind::BusinessRuleViolation
        );

        let upstream = Error::Upstream {
            status: StatusCode::UNAUTHORIZED,
            body: "nope".into(),
        };
        assert_eq!(upstream.kind(), ErrorKind::UpstreamRejection);
        assert_eq!(upstream.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(upstream.body(), Some("nope"));

        let decode = Error::Decode {
            body: "<html>".into(),
            source: serde_json::from_str::<u32>("<html>").unwrap_err(),
        };
        assert_eq!(decode.kind(), ErrorKind::DecodeFailure);
        assert_eq!(decode.status(), None);
        assert_eq!(decode.body(), Some("<html>"));
    }

    #[test]
    fn upstream_message_embeds_status_and_body() {
        let e = Error::Upstream {
            status: StatusCode::FORBIDDEN,
            body: r#"[{"error_code":"NOT_AVAILABLE"}]"#.into(),
        };
        assert_eq!(
            e.to_string(),
            r#"received error from API with status 403 Forbidden and error [{"error_code":"NOT_AVAILABLE"}]"#
        );
    }

    #[test]
    fn live_session_names_the_resource() {
        let e = Error::LiveSession {
            resource_id: "6384185469112".into(),
        };
        assert!(e.to_string().contains("resource 6384185469112 has an ongoing live session"));
    }
}
