use std::fmt;

/// Transport-level failure classes surfaced to the listing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkFailure {
    Timeout,
    HttpStatus(u16),
    Transport(String),
}

impl fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkFailure::Timeout => write!(f, "request timed out"),
            NetworkFailure::HttpStatus(code) => write!(f, "http status {code}"),
            NetworkFailure::Transport(message) => write!(f, "{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("network error: {0}")]
    Network(NetworkFailure),
    /// The request was aborted or superseded. Never stored in `last_error`.
    #[error("request canceled")]
    Canceled,
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ListingError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, ListingError::Canceled)
    }
}
