//! Page retrieval.
//!
//! The extraction core only talks to a [`PageFetcher`]. Timeouts and TLS
//! verification are per-request values computed from the [`SiteContext`],
//! so one fetcher can serve concurrent calls for different hosts.

use std::time::Duration;

use thiserror::Error;

use crate::options::Options;
use crate::profile::SiteContext;
use crate::result::CleaningTrace;

/// Browser-like request headers; Vietnamese first since most profiled hosts
/// localize on it.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
/// `Accept` header sent with every request.
pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
/// `Accept-Language` header sent with every request.
pub const ACCEPT_LANGUAGE: &str = "vi-VN,vi;q=0.9,en-US;q=0.8,en;q=0.7";

/// Failure to retrieve a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connect or read deadline exceeded.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Certificate or handshake failure.
    #[error("TLS failure: {0}")]
    Tls(String),

    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Non-success HTTP status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Body could not be read.
    #[error("failed to read body: {0}")]
    Body(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Whether the failure is a TLS verification problem worth one unverified retry.
    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

/// One page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute URL to fetch.
    pub url: String,
    /// Deadline for establishing the connection.
    pub connect_timeout: Duration,
    /// Deadline for reading the response.
    pub read_timeout: Duration,
    /// Verify the server certificate.
    pub verify_tls: bool,
}

impl FetchRequest {
    /// Builds the request for a page, applying the profile's timeout floor
    /// and initial TLS setting.
    #[must_use]
    pub fn for_context(ctx: &SiteContext, options: &Options) -> Self {
        let (connect_timeout, read_timeout) = ctx.profile.timeouts(options);
        Self {
            url: ctx.url.to_string(),
            connect_timeout,
            read_timeout,
            verify_tls: ctx.profile.verifies_tls_initially(),
        }
    }
}

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Page markup, already decoded to UTF-8.
    pub html: String,
    /// URL after redirects.
    pub final_url: String,
}

/// Retrieves pages for the extractor.
pub trait PageFetcher {
    /// Fetch one page.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] describing why the page could not be retrieved.
    fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, FetchError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, FetchError> {
        (**self).fetch(request)
    }
}

/// Fetches a page, retrying exactly once without certificate verification
/// when the first attempt fails on TLS.
///
/// # Errors
///
/// Returns the first error when it is not TLS related, or the retry's error.
pub fn fetch_with_tls_retry<F: PageFetcher + ?Sized>(
    fetcher: &F,
    request: &FetchRequest,
    trace: &mut CleaningTrace,
) -> Result<FetchedPage, FetchError> {
    trace.push(format!(
        "Fetching {} (connect {}s, read {}s, verify TLS: {})",
        request.url,
        request.connect_timeout.as_secs(),
        request.read_timeout.as_secs(),
        request.verify_tls
    ));

    match fetcher.fetch(request) {
        Err(err) if err.is_tls() && request.verify_tls => {
            tracing::warn!(url = %request.url, error = %err, "TLS failure, retrying without verification");
            trace.push("TLS verification failed, retrying once without verification");
            let retry = FetchRequest {
                verify_tls: false,
                ..request.clone()
            };
            fetcher.fetch(&retry)
        }
        other => other,
    }
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use std::error::Error as _;

    use reqwest::blocking::Client;
    use reqwest::header::{self, HeaderMap, HeaderValue};

    use super::{FetchError, FetchRequest, FetchedPage, PageFetcher, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
    use crate::encoding::transcode_to_utf8;

    /// Blocking HTTP fetcher backed by `reqwest`.
    ///
    /// A client is built per request because timeouts and certificate
    /// verification vary per host.
    #[derive(Debug, Default, Clone)]
    pub struct HttpFetcher;

    impl HttpFetcher {
        /// Creates a fetcher.
        #[must_use]
        pub fn new() -> Self {
            Self
        }

        fn client(request: &FetchRequest) -> Result<Client, FetchError> {
            let mut headers = HeaderMap::new();
            headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
            headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));

            // The blocking client only exposes a whole-request deadline.
            Client::builder()
                .user_agent(USER_AGENT)
                .default_headers(headers)
                .connect_timeout(request.connect_timeout)
                .timeout(request.connect_timeout + request.read_timeout)
                .danger_accept_invalid_certs(!request.verify_tls)
                .build()
                .map_err(|e| FetchError::Other(e.to_string()))
        }
    }

    impl PageFetcher for HttpFetcher {
        fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, FetchError> {
            let client = Self::client(request)?;
            let response = client.get(&request.url).send().map_err(FetchError::from)?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let final_url = response.url().to_string();
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = response.bytes().map_err(|e| FetchError::Body(e.to_string()))?;

            Ok(FetchedPage {
                html: transcode_to_utf8(&bytes, content_type.as_deref()),
                final_url,
            })
        }
    }

    impl From<reqwest::Error> for FetchError {
        fn from(err: reqwest::Error) -> Self {
            if err.is_timeout() {
                return Self::Timeout(err.to_string());
            }
            if let Some(status) = err.status() {
                return Self::Status(status.as_u16());
            }
            if is_tls_failure(&err) {
                return Self::Tls(err.to_string());
            }
            if err.is_connect() {
                return Self::Connect(err.to_string());
            }
            if err.is_body() || err.is_decode() {
                return Self::Body(err.to_string());
            }
            Self::Other(err.to_string())
        }
    }

    /// reqwest does not classify TLS errors; look for them in the source chain.
    fn is_tls_failure(err: &reqwest::Error) -> bool {
        let mut source = err.source();
        while let Some(inner) = source {
            let message = inner.to_string().to_ascii_lowercase();
            if ["certificate", "tls", "ssl", "handshake"].iter().any(|k| message.contains(k)) {
                return true;
            }
            source = inner.source();
        }
        false
    }
}
