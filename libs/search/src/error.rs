//! Errors raised while fetching one content type

use thiserror::Error;

/// Failure of a single per-type fetch.
///
/// The aggregator never propagates this; the affected type simply
/// contributes no results.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The endpoint answered with a non-success status
    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    /// Connection, TLS or protocol failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL could not be parsed
    #[error("invalid base url: {0}")]
    InvalidUrl(String),

    /// Any other backend failure (e.g. a database error in an in-process fetcher)
    #[error("backend error: {0}")]
    Backend(String),
}
