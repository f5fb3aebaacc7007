//! HTTP fetch adapter
//!
//! This module wraps the HTTP client and turns every outcome into a value:
//! - Building the client with the configured user agent and timeouts
//! - GET requests returning the raw body
//! - Classifying transport errors and non-2xx statuses into [`FetchError`]
//!
//! There is no retry logic here; the coordinator owns retry policy.

use crate::config::{ScraperConfig, UserAgentConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCause {
    /// The server answered with a non-2xx status
    Status(u16),
    /// The transport's timeout fired
    Timeout,
    /// Connection refused, DNS failure, TLS error
    Connect(String),
    /// The response started but the body could not be read
    Body(String),
    /// Anything else the client reported
    Request(String),
}

impl std::fmt::Display for FetchCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Timeout => f.write_str("request timeout"),
            Self::Connect(e) => write!(f, "connection failed: {}", e),
            Self::Body(e) => write!(f, "body read failed: {}", e),
            Self::Request(e) => write!(f, "request failed: {}", e),
        }
    }
}

/// A failed fetch, tagged with the URL it was for
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("fetch {url} failed: {cause}")]
pub struct FetchError {
    pub url: String,
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(url: impl Into<String>, cause: FetchCause) -> Self {
        Self {
            url: url.into(),
            cause,
        }
    }

    /// True for failures a later attempt might not hit: timeouts, connection
    /// errors, 429 and 5xx responses
    pub fn is_transient(&self) -> bool {
        match &self.cause {
            FetchCause::Timeout | FetchCause::Connect(_) => true,
            FetchCause::Status(code) => {
                *code == StatusCode::TOO_MANY_REQUESTS.as_u16() || (500..600).contains(code)
            }
            FetchCause::Body(_) | FetchCause::Request(_) => false,
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use showcase_harvest::config::Config;
/// use showcase_harvest::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.scraper, &config.user_agent).unwrap();
/// ```
pub fn build_http_client(
    scraper: &ScraperConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(scraper.request_timeout_secs))
        .connect_timeout(Duration::from_secs(scraper.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// The fetch boundary shared by every worker task
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(
        scraper: &ScraperConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(scraper, user_agent)?))
    }

    /// GETs `url` and returns the body, or a [`FetchError`] for any transport
    /// failure or non-2xx status
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, classify(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(url, FetchCause::Status(status.as_u16())));
        }

        let final_url = response.url().to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::new(url, FetchCause::Body(e.to_string())))?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

/// Maps a client error to a [`FetchCause`]
fn classify(error: &reqwest::Error) -> FetchCause {
    if error.is_timeout() {
        FetchCause::Timeout
    } else if error.is_connect() {
        FetchCause::Connect(error.to_string())
    } else if let Some(status) = error.status() {
        FetchCause::Status(status.as_u16())
    } else {
        FetchCause::Request(error.to_string())
    }
}
