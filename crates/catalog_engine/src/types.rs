use std::fmt;

use catalog_core::{ListingError, ListingPage, NetworkFailure, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PageFetched {
        request_id: RequestId,
        result: Result<ListingPage, FetchError>,
    },
    DebounceElapsed {
        generation: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "request canceled")
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Malformed, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Malformed,
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Malformed => write!(f, "malformed response"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

impl From<FetchError> for ListingError {
    fn from(err: FetchError) -> Self {
        match err.kind {
            FailureKind::Cancelled => ListingError::Canceled,
            FailureKind::Timeout => ListingError::Network(NetworkFailure::Timeout),
            FailureKind::HttpStatus(code) => ListingError::Network(NetworkFailure::HttpStatus(code)),
            FailureKind::InvalidUrl | FailureKind::Network => {
                ListingError::Network(NetworkFailure::Transport(err.message))
            }
            FailureKind::TooLarge { .. } | FailureKind::Malformed => {
                ListingError::MalformedResponse(err.message)
            }
        }
    }
}
