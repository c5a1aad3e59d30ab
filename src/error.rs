//! Error types for rs-chapter-extract.
//!
//! This module defines the error types returned by extraction operations.
//! Cleaning passes never fail; only URL handling, page retrieval and the
//! persistence store can produce an error.

use crate::fetch::FetchError;
use crate::store::StoreError;

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The URL handed to the extractor is not an absolute http(s) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Page retrieval failed (after the single TLS retry, if any).
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Reading or writing the persistence store failed.
    #[error("Store failed: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
