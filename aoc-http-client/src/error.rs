//! Error types for the AOC HTTP client

use thiserror::Error;

/// Errors that can occur when configuring the client or verifying a session
#[derive(Error, Debug)]
pub enum AocError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid HTTP status code received
    #[error("Invalid HTTP status: {status}")]
    InvalidStatus {
        /// The status code that was received
        status: reqwest::StatusCode,
    },

    /// Failed to decode response as UTF-8
    #[error("Failed to decode response as UTF-8")]
    Encoding,

    /// Client initialization failed
    #[error("Client initialization failed: {0}")]
    ClientInit(String),
}

/// Why a puzzle input could not be obtained
///
/// Values are cheap to clone so a single failure can be reported for both parts
/// of a puzzle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No session cookie is configured; no request was made
    #[error("no session cookie configured (set AOC_SESSION)")]
    MissingSession,

    /// The session cookie was rejected
    #[error("session cookie rejected by adventofcode.com")]
    Unauthorized,

    /// The puzzle has not unlocked yet
    #[error("puzzle input is not released yet")]
    NotReleased,

    /// Too many requests
    #[error("rate limited by adventofcode.com")]
    RateLimited,

    /// Network failure, timeout or server error
    #[error("transient failure: {0}")]
    Transient(String),

    /// Any other unexpected HTTP status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The upstream answered with no content
    #[error("upstream returned an empty input")]
    EmptyBody,

    /// Failed to decode response as UTF-8
    #[error("response is not valid UTF-8")]
    Encoding,

    /// Fetching is disabled and the input is not cached
    #[error("input is not cached and fetching is disabled (--offline)")]
    Offline,

    /// Client initialization failed
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl FetchError {
    /// Whether retrying the same request later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::RateLimited | FetchError::Transient(_))
    }
}

impl From<AocError> for FetchError {
    fn from(error: AocError) -> Self {
        match error {
            AocError::Request(e) if e.is_builder() => FetchError::ClientInit(e.to_string()),
            AocError::Request(e) => FetchError::Transient(e.to_string()),
            AocError::InvalidStatus { status } => FetchError::Status(status.as_u16()),
            AocError::Encoding => FetchError::Encoding,
            AocError::ClientInit(message) => FetchError::ClientInit(message),
        }
    }
}
