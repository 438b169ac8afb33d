//! Response parsing and classification

use crate::error::FetchError;
use regex::Regex;
use std::sync::OnceLock;

const NOT_RELEASED_MARKER: &str =
    "Please don't repeatedly request this endpoint before it unlocks";
const WRONG_USER_MARKER: &str = "Puzzle inputs differ by user";

/// Parser for AOC responses with cached regex patterns
#[derive(Clone, Debug, Default)]
pub(crate) struct ResponseParser {
    user_id_regex: OnceLock<Regex>,
}

impl ResponseParser {
    /// Create a new parser with uninitialized caches
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or compile the user ID regex
    fn user_id_regex(&self) -> &Regex {
        self.user_id_regex
            .get_or_init(|| Regex::new(r"\(anonymous user #(\d+)\)").unwrap())
    }

    /// Extract user ID from settings page HTML
    pub fn extract_user_id(&self, html: &str) -> Option<u64> {
        let regex = self.user_id_regex();
        let captures = regex.captures(html)?;
        let user_id_str = captures.get(1)?.as_str();
        user_id_str.parse::<u64>().ok()
    }

    /// Turn an input endpoint response into the input text or a [`FetchError`]
    ///
    /// The site answers some failures with a success status and an explanatory
    /// body, so the body is inspected as well as the status.
    pub fn classify_input(&self, status: u16, body: String) -> Result<String, FetchError> {
        if body.starts_with(NOT_RELEASED_MARKER) {
            return Err(FetchError::NotReleased);
        }
        if body.contains(WRONG_USER_MARKER) {
            return Err(FetchError::Unauthorized);
        }

        match status {
            200..=299 if body.trim().is_empty() => Err(FetchError::EmptyBody),
            200..=299 => Ok(body),
            400 | 401 | 403 => Err(FetchError::Unauthorized),
            404 => Err(FetchError::NotReleased),
            429 => Err(FetchError::RateLimited),
            500..=599 => Err(FetchError::Transient(format!("HTTP status {}", status))),
            other => Err(FetchError::Status(other)),
        }
    }
}
