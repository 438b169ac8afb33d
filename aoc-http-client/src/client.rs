//! AOC HTTP client implementation

use crate::error::{AocError, FetchError};
use crate::parser::ResponseParser;
use crate::retry::RetryPolicy;
use reqwest::header::{COOKIE, HeaderValue};
use tracing::debug;
use zeroize::Zeroize;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Result of session verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// User ID if session is valid, None otherwise
    pub user_id: Option<u64>,
}

/// The main AOC HTTP client
///
/// # Example
///
/// ```no_run
/// use aoc_http_client::AocClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AocClient::new()?;
/// let session = "your_session_cookie";
///
/// let input = client.get_input(2024, 1, session)?;
/// println!("Input: {}", input);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AocClient {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
    parser: ResponseParser,
}

impl AocClient {
    /// Create a new AOC client with rustls-tls configuration and no redirect policy
    ///
    /// # Errors
    ///
    /// Returns `AocError::ClientInit` if the HTTP client cannot be initialized.
    ///
    /// # Example
    ///
    /// ```
    /// use aoc_http_client::AocClient;
    ///
    /// let client = AocClient::new().expect("Failed to create client");
    /// ```
    pub fn new() -> Result<Self, AocError> {
        Self::builder().build()
    }

    /// Create a builder for configuring the AOC client
    pub fn builder() -> AocClientBuilder {
        AocClientBuilder::new()
    }

    /// Create a secure cookie header value from a session string
    ///
    /// The header is flagged sensitive and the temporary string is zeroized.
    fn create_cookie_header(session: &str) -> Result<HeaderValue, AocError> {
        let mut cookie_string = format!("session={}", session);
        let header_value = HeaderValue::from_bytes(cookie_string.as_bytes())
            .map_err(|_| AocError::ClientInit("Invalid session cookie format".to_string()));
        cookie_string.zeroize();

        let mut sensitive_header = header_value?;
        sensitive_header.set_sensitive(true);
        Ok(sensitive_header)
    }

    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, AocError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AocError::ClientInit("Cannot modify base URL path".to_string()))?
            .clear()
            .extend(segments);
        Ok(url)
    }

    /// Verify if a session cookie is valid and retrieve user ID
    ///
    /// A 200 OK from the settings page indicates a valid session and the user ID is
    /// extracted from the HTML. A redirect or error status indicates an invalid
    /// session.
    ///
    /// # Returns
    ///
    /// * `Ok(SessionInfo { user_id: Some(id) })` - Session is valid with user ID
    /// * `Ok(SessionInfo { user_id: None })` - Session is invalid
    /// * `Err` - Network error or URL construction error occurred
    pub fn verify_session(&self, session: &str) -> Result<SessionInfo, AocError> {
        let cookie_header = Self::create_cookie_header(session)?;
        let url = self.url(&["settings"])?;

        let response = self.client.get(url).header(COOKIE, cookie_header).send()?;

        // 3xx redirect to the homepage means the session is not logged in
        if !response.status().is_success() {
            return Ok(SessionInfo { user_id: None });
        }

        let html = response.text().map_err(|_| AocError::Encoding)?;
        let user_id = self.parser.extract_user_id(&html);

        Ok(SessionInfo { user_id })
    }

    /// Fetch puzzle input for a specific year and day, in a single attempt
    ///
    /// # Errors
    ///
    /// * `FetchError::MissingSession` - `session` is blank; no request is made
    /// * `FetchError::NotReleased` - the puzzle has not unlocked yet
    /// * `FetchError::Unauthorized` - the session was rejected
    /// * `FetchError::RateLimited` / `FetchError::Transient` - worth retrying later
    /// * `FetchError::EmptyBody` - the server answered with nothing
    pub fn get_input(&self, year: u16, day: u8, session: &str) -> Result<String, FetchError> {
        if session.trim().is_empty() {
            return Err(FetchError::MissingSession);
        }

        let cookie_header = Self::create_cookie_header(session)?;
        let url = self.url(&[&year.to_string(), "day", &day.to_string(), "input"])?;

        debug!(year, day, "requesting puzzle input");
        let response = self
            .client
            .get(url)
            .header(COOKIE, cookie_header)
            .send()
            .map_err(AocError::from)?;

        let status = response.status();
        let body = if status.is_success() {
            response.text().map_err(|_| FetchError::Encoding)?
        } else {
            response.text().unwrap_or_default()
        };

        self.parser.classify_input(status.as_u16(), body)
    }

    /// Fetch puzzle input, retrying transient failures according to `policy`
    pub fn get_input_with_retry(
        &self,
        year: u16,
        day: u8,
        session: &str,
        policy: &RetryPolicy,
    ) -> Result<String, FetchError> {
        policy.run(|attempt| {
            debug!(year, day, attempt, "fetch attempt");
            self.get_input(year, day, session)
        })
    }
}

/// Builder for configuring an AOC HTTP client
///
/// The redirect policy is always forced to `Policy::none()` and the user agent is
/// always set, regardless of the supplied reqwest builder.
///
/// # Example
///
/// ```no_run
/// use aoc_http_client::AocClient;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AocClient::builder()
///     .base_url("http://localhost:1234")?
///     .client_builder(
///         reqwest::blocking::Client::builder()
///             .timeout(Duration::from_secs(10))
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AocClientBuilder {
    base_url: Option<reqwest::Url>,
    client_builder: Option<reqwest::blocking::ClientBuilder>,
}

impl AocClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL for the client
    ///
    /// The URL is parsed and validated at builder time.
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self, AocError> {
        self.base_url = Some(url.into_url()?);
        Ok(self)
    }

    /// Set a custom HTTP client builder (timeouts, proxies, etc.)
    pub fn client_builder(mut self, builder: reqwest::blocking::ClientBuilder) -> Self {
        self.client_builder = Some(builder);
        self
    }

    /// Build the AOC client with the configured settings
    pub fn build(self) -> Result<AocClient, AocError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => reqwest::Url::parse("https://adventofcode.com")
                .map_err(|e| AocError::ClientInit(e.to_string()))?,
        };

        let builder = self
            .client_builder
            .unwrap_or_else(|| reqwest::blocking::Client::builder().use_rustls_tls());

        let client = builder
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AocError::ClientInit(e.to_string()))?;

        Ok(AocClient {
            client,
            base_url,
            parser: ResponseParser::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use proptest::prelude::*;
    use std::time::Duration;

    fn client_for(server: &mockito::Server) -> AocClient {
        AocClient::builder()
            .base_url(server.url())
            .unwrap()
            .build()
            .unwrap()
    }

    fn no_wait(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    // **Feature: aoc-http-client, Property 11: Base URL configuration**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_base_url_configuration(
            scheme in prop::sample::select(vec!["http", "https"]),
            host in "[a-z]{3,10}",
            port in 1000u16..10000u16,
        ) {
            let base_url = format!("{}://{}:{}", scheme, host, port);

            let client = AocClient::builder()
                .base_url(&base_url)
                .unwrap()
                .build()
                .unwrap();

            prop_assert_eq!(client.base_url.scheme(), scheme);
            prop_assert_eq!(client.base_url.host_str(), Some(host.as_str()));
            prop_assert_eq!(client.base_url.port(), Some(port));
        }
    }

    #[test]
    fn test_default_base_url() {
        let client = AocClient::builder().build().unwrap();
        assert_eq!(client.base_url.as_str(), "https://adventofcode.com/");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = AocClient::builder().base_url("not a valid url");
        assert!(result.is_err());
    }

    #[test]
    fn test_redirect_policy_enforcement() {
        let mut server = mockito::Server::new();

        let base_mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<html><body>Home page</body></html>")
            .expect(0)
            .create();

        let settings_mock = server
            .mock("GET", "/settings")
            .with_status(303)
            .with_header("location", "/")
            .expect(1)
            .create();

        let client = client_for(&server);
        let info = client.verify_session("test_session").unwrap();
        assert!(info.user_id.is_none());

        base_mock.assert();
        settings_mock.assert();
    }

    // **Feature: aoc-http-client, Property 1: Session validation interprets 200 as valid**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_session_validation_200_is_valid(
            session in "[a-f0-9]{32,128}",
            user_id in 100000u64..999999u64,
        ) {
            let mut server = mockito::Server::new();

            let body = format!(r#"<html><body>Settings page (anonymous user #{})</body></html>"#, user_id);
            let mock = server.mock("GET", "/settings")
                .match_header("cookie", format!("session={}", session).as_str())
                .with_status(200)
                .with_body(&body)
                .expect(1)
                .create();

            let client = client_for(&server);
            let info = client.verify_session(&session).unwrap();
            prop_assert_eq!(info.user_id, Some(user_id));

            mock.assert();
        }
    }

    // **Feature: aoc-http-client, Property 3: Input URL construction**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_input_url_construction(
            year in 2015u16..2035u16,
            day in 1u8..=25u8,
            session in "[a-f0-9]{32,128}",
        ) {
            let mut server = mockito::Server::new();

            let expected_path = format!("/{}/day/{}/input", year, day);
            let mock = server.mock("GET", expected_path.as_str())
                .match_header("cookie", format!("session={}", session).as_str())
                .match_header("user-agent", Matcher::Regex("^aoc-http-client/".to_string()))
                .with_status(200)
                .with_body("test input data\n")
                .expect(1)
                .create();

            let client = client_for(&server);
            let result = client.get_input(year, day, &session);

            mock.assert();
            prop_assert_eq!(result, Ok("test input data\n".to_string()));
        }
    }

    // **Feature: aoc-http-client, Property 10: Non-success status classification**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_non_success_status_classification(
            status_code in prop::sample::select(vec![400usize, 401, 403, 404, 429, 500, 502, 503]),
        ) {
            let mut server = mockito::Server::new();
            let mock = server.mock("GET", "/2023/day/1/input")
                .with_status(status_code)
                .expect(1)
                .create();

            let client = client_for(&server);
            let error = client.get_input(2023, 1, "abc").unwrap_err();

            let expected = match status_code {
                400 | 401 | 403 => FetchError::Unauthorized,
                404 => FetchError::NotReleased,
                429 => FetchError::RateLimited,
                other => FetchError::Transient(format!("HTTP status {}", other)),
            };
            prop_assert_eq!(error, expected);
            mock.assert();
        }
    }

    #[test]
    fn test_missing_session_makes_no_request() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .expect(0)
            .create();

        let client = client_for(&server);
        assert_eq!(
            client.get_input(2023, 1, "  "),
            Err(FetchError::MissingSession)
        );
        mock.assert();
    }

    #[test]
    fn test_not_released_page_with_success_status() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/2023/day/5/input")
            .with_status(200)
            .with_body("Please don't repeatedly request this endpoint before it unlocks! The calendar countdown is synchronized with the server time.\n")
            .create();

        let client = client_for(&server);
        assert_eq!(
            client.get_input(2023, 5, "abc"),
            Err(FetchError::NotReleased)
        );
        mock.assert();
    }

    #[test]
    fn test_server_errors_are_retried_until_exhausted() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/2022/day/3/input")
            .with_status(503)
            .expect(3)
            .create();

        let client = client_for(&server);
        let result = client.get_input_with_retry(2022, 3, "abc", &no_wait(3));

        assert!(matches!(result, Err(FetchError::Transient(_))));
        mock.assert();
    }

    #[test]
    fn test_not_released_is_not_retried() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/2022/day/3/input")
            .with_status(404)
            .expect(1)
            .create();

        let client = client_for(&server);
        let result = client.get_input_with_retry(2022, 3, "abc", &no_wait(5));

        assert_eq!(result, Err(FetchError::NotReleased));
        mock.assert();
    }

    #[test]
    fn test_connection_failure_is_transient() {
        let client = AocClient::builder()
            .base_url("http://127.0.0.1:1")
            .unwrap()
            .build()
            .unwrap();

        let error = client.get_input(2022, 1, "abc").unwrap_err();
        assert!(error.is_transient(), "{error:?}");
    }
}
