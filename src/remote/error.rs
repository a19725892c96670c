//! Remote collaborator errors.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong talking to the remote collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RemoteErrorKind {
    /// Connection, timeout or other transport failure.
    #[display("transport failure: {}", _0)]
    Transport(String),

    /// Non-success HTTP status.
    #[display("{} returned HTTP {}", endpoint, status)]
    Status {
        /// Endpoint called.
        endpoint: String,
        /// Status code received.
        status: u16,
    },

    /// Response arrived but could not be used.
    #[display("protocol violation: {}", _0)]
    Protocol(String),
}

/// Remote error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Remote error: {} at {}:{}", kind, file, line)]
pub struct RemoteError {
    /// Error category.
    pub kind: RemoteErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RemoteError {
    /// Creates a new remote error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: RemoteErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Transport failure.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Transport(message.into()))
    }

    /// Non-success status from `endpoint`.
    #[track_caller]
    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::new(RemoteErrorKind::Status {
            endpoint: endpoint.into(),
            status,
        })
    }

    /// Unusable response.
    #[track_caller]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Protocol(message.into()))
    }

    /// Returns true for malformed or inconsistent responses.
    pub fn is_protocol(&self) -> bool {
        matches!(self.kind, RemoteErrorKind::Protocol(_))
    }
}

impl From<reqwest::Error> for RemoteError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::status(
                err.url().map(|u| u.path().to_string()).unwrap_or_default(),
                status.as_u16(),
            ),
            None if err.is_decode() => Self::protocol(err.to_string()),
            None => Self::transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_records_location() {
        let err = RemoteError::protocol("empty clue");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.is_protocol());
        assert!(err.to_string().contains("protocol violation: empty clue"));
    }

    #[test]
    fn test_status_display() {
        let err = RemoteError::status("clue", 503);
        assert_eq!(err.kind.to_string(), "clue returned HTTP 503");
        assert!(!err.is_protocol());
    }
}
