//! Error taxonomy for chat-completion calls.
//!
//! Every failure surfaced by this crate is classified into an actionable
//! category with a machine-readable code and a remediation string suitable
//! for direct display. A single malformed streaming frame is the one failure
//! that is *not* surfaced: it is skipped with a diagnostic and the stream
//! continues (see [`crate::stream`]).

use thiserror::Error;

/// The way a success-status response body failed shape validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// Body was not decodable as JSON at all.
    InvalidJson,
    /// `choices` array missing or empty.
    NoChoices,
    /// First choice carried no `message` object.
    NoMessage,
    /// Message carried no `content` field.
    NoContent,
}

impl std::fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MalformedKind::InvalidJson => "response body is not valid JSON",
            MalformedKind::NoChoices => "response contains no choices",
            MalformedKind::NoMessage => "response choice contains no message",
            MalformedKind::NoContent => "response message contains no content",
        };
        f.write_str(s)
    }
}

/// Errors that can occur during chat-completion calls.
///
/// Variants map one-to-one onto the classification codes returned by
/// [`Error::code`]; HTTP-status variants keep the raw status and body for
/// diagnostics.
#[derive(Error, Debug)]
pub enum Error {
    /// Credential rejected (HTTP 401/403).
    #[error("authentication failed (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    /// Throttled by the provider (HTTP 429).
    #[error("rate limited (HTTP {status}): {body}")]
    RateLimit { status: u16, body: String },

    /// Upstream 5xx fault.
    #[error("server fault (HTTP {status}): {body}")]
    ServerFault { status: u16, body: String },

    /// Transport-level failure: host unreachable, connection reset, timeout.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// Success status but the body lacks the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(MalformedKind),

    /// Irrecoverable encoding failure while decoding the response stream.
    /// Fatal to the current call only; no decoder state survives it.
    #[error("invalid UTF-8 in response stream: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// Non-success status that fits no other class.
    #[error("unexpected HTTP status {status}: {body}")]
    Unexpected { status: u16, body: String },

    /// Missing or unusable client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Structured diagnostic bag attached to every classified error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails<'a> {
    /// Machine-readable classification code.
    pub code: &'static str,
    /// Human-actionable remediation text.
    pub solution: &'static str,
    /// Which layer produced the error.
    pub location: &'static str,
    /// Raw HTTP status, where one was observed.
    pub status: Option<u16>,
    /// Raw response body, where one was captured.
    pub body: Option<&'a str>,
}

impl Error {
    /// Machine-readable classification code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Auth { .. } => "AUTH",
            Error::RateLimit { .. } => "RATE_LIMIT",
            Error::ServerFault { .. } => "SERVER_FAULT",
            Error::Network(_) => "NETWORK",
            Error::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Error::Decode(_) => "DECODE",
            Error::Unexpected { .. } => "UNKNOWN",
            Error::Config(_) => "CONFIG",
        }
    }

    /// Remediation text suitable for direct display to a user.
    pub fn solution(&self) -> &'static str {
        match self {
            Error::Auth { .. } => "Check that the API key is valid and has not expired",
            Error::RateLimit { .. } => "Wait a moment and retry the request",
            Error::ServerFault { .. } => "The provider is having issues; retry later",
            Error::Network(_) => "Check network connectivity and the endpoint URL",
            Error::MalformedResponse(_) => "Retry the request; report if the problem persists",
            Error::Decode(_) => "Retry the request; report if the problem persists",
            Error::Unexpected { .. } => "Inspect the HTTP status and response body",
            Error::Config(_) => "Fix the client configuration and retry",
        }
    }

    /// Full diagnostic bag: code, remediation, origin, raw status/body.
    pub fn details(&self) -> ErrorDetails<'_> {
        let location = match self {
            Error::Auth { .. }
            | Error::RateLimit { .. }
            | Error::ServerFault { .. }
            | Error::Unexpected { .. } => "http_status",
            Error::Network(_) => "transport",
            Error::MalformedResponse(_) => "response_body",
            Error::Decode(_) => "sse_decoder",
            Error::Config(_) => "config",
        };
        let (status, body) = match self {
            Error::Auth { status, body }
            | Error::RateLimit { status, body }
            | Error::ServerFault { status, body }
            | Error::Unexpected { status, body } => (Some(*status), Some(body.as_str())),
            _ => (None, None),
        };
        ErrorDetails {
            code: self.code(),
            solution: self.solution(),
            location,
            status,
            body,
        }
    }
}

/// Classify a non-success HTTP status into an error, in priority order:
/// auth (401/403), rate limiting (429), server fault (>= 500), unknown.
pub fn classify_status(status: reqwest::StatusCode, body: String) -> Error {
    let code = status.as_u16();
    match code {
        401 | 403 => Error::Auth { status: code, body },
        429 => Error::RateLimit { status: code, body },
        c if c >= 500 => Error::ServerFault { status: code, body },
        c => Error::Unexpected { status: c, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_classify_status() {
        let err = classify_status(StatusCode::UNAUTHORIZED, "no".into());
        assert!(matches!(err, Error::Auth { status: 401, .. }));

        let err = classify_status(StatusCode::FORBIDDEN, "no".into());
        assert!(matches!(err, Error::Auth { status: 403, .. }));

        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        assert!(matches!(err, Error::RateLimit { status: 429, .. }));

        let err = classify_status(StatusCode::BAD_GATEWAY, "".into());
        assert!(matches!(err, Error::ServerFault { status: 502, .. }));

        let err = classify_status(StatusCode::IM_A_TEAPOT, "".into());
        assert!(matches!(err, Error::Unexpected { status: 418, .. }));
    }

    #[test]
    fn test_codes_and_solutions() {
        let err = classify_status(StatusCode::UNAUTHORIZED, "invalid key".into());
        assert_eq!(err.code(), "AUTH");
        assert!(err.solution().contains("API key"));

        let err = Error::MalformedResponse(MalformedKind::NoChoices);
        assert_eq!(err.code(), "MALFORMED_RESPONSE");
        assert_eq!(err.to_string(), "malformed response: response contains no choices");
    }

    #[test]
    fn test_details_bag() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        let details = err.details();
        assert_eq!(details.code, "RATE_LIMIT");
        assert_eq!(details.location, "http_status");
        assert_eq!(details.status, Some(429));
        assert_eq!(details.body, Some("slow down"));

        let err = Error::Config("API key is required".into());
        let details = err.details();
        assert_eq!(details.code, "CONFIG");
        assert_eq!(details.status, None);
    }
}
