//! AOC HTTP Client Library
//!
//! This library downloads personalized puzzle inputs from the Advent of Code
//! website and verifies session cookies.
//!
//! # Features
//!
//! - Puzzle input fetching for any year and day
//! - Classification of every failure into a [`FetchError`] the caller can act on
//!   (not released yet, bad session, rate limited, transient)
//! - Bounded retry with exponential backoff for transient failures
//! - Session validation to check if your AOC cookie is valid
//! - Secure TLS using rustls (no OpenSSL dependencies)
//! - Blocking synchronous API
//!
//! # Example
//!
//! ```no_run
//! use aoc_http_client::{AocClient, FetchError, RetryPolicy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AocClient::new()?;
//! let session = "your_session_cookie_here";
//!
//! // Verify session and get user ID
//! let session_info = client.verify_session(session)?;
//! if let Some(user_id) = session_info.user_id {
//!     println!("Session is valid! User ID: {}", user_id);
//! }
//!
//! // Fetch puzzle input, retrying transient failures
//! match client.get_input_with_retry(2024, 1, session, &RetryPolicy::default()) {
//!     Ok(input) => println!("{} bytes", input.len()),
//!     Err(FetchError::NotReleased) => println!("Not unlocked yet"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod parser;
mod retry;

pub use client::{AocClient, AocClientBuilder, SessionInfo, USER_AGENT};
pub use error::{AocError, FetchError};
pub use retry::RetryPolicy;
