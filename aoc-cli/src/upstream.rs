//! The adventofcode.com input source used by the cache

use crate::cache::Upstream;
use aoc_http_client::{AocClient, FetchError, RetryPolicy};
use aoc_puzzle::PuzzleKey;
use zeroize::Zeroizing;

/// Fetches inputs with the user's session, retrying transient failures
///
/// Without a client (`--offline`) every fetch fails with [`FetchError::Offline`].
pub struct AocUpstream {
    client: Option<AocClient>,
    session: Zeroizing<String>,
    retry: RetryPolicy,
}

impl AocUpstream {
    pub fn new(client: AocClient, session: Zeroizing<String>, retry: RetryPolicy) -> Self {
        Self {
            client: Some(client),
            session,
            retry,
        }
    }

    /// An upstream that never touches the network
    pub fn offline() -> Self {
        Self {
            client: None,
            session: Zeroizing::new(String::new()),
            retry: RetryPolicy::none(),
        }
    }
}

impl Upstream for AocUpstream {
    fn fetch(&self, key: PuzzleKey) -> Result<String, FetchError> {
        let client = self.client.as_ref().ok_or(FetchError::Offline)?;
        client.get_input_with_retry(key.year(), key.day(), &self.session, &self.retry)
    }
}
