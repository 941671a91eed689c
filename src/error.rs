//! Unified error types.
//!
//! The derivation core is error-free by construction. Everything here belongs to
//! the collaborator boundary: fetching (`FetchError`), holdings persistence
//! (`PersistenceError`) and the runtime handle (`CoinboardError`).

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum CoinboardError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Dashboard runtime is no longer running")]
    Closed,

    #[error("{0}")]
    Other(String),
}

/// Failure of either market-data fetch.
///
/// The core only distinguishes "succeeded with value" from "failed"; the
/// variants exist for logging and for callers of the HTTP collaborator.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Invalid response: {0}")]
    Validation(String),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Decoding failed: {0}")]
    Decode(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Holdings read/write errors.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Corrupt holdings data: {0}")]
    Corrupt(String),

    #[error("Persistence unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_is_transparent_over_http() {
        let err = FetchError::from(HttpError::Api {
            code: 429,
            message: "You've exceeded the Rate Limit".to_string(),
        });
        assert_eq!(err.to_string(), "API error 429: You've exceeded the Rate Limit");
    }

    #[test]
    fn test_top_level_wraps_persistence() {
        let err: CoinboardError = PersistenceError::Corrupt("bad quantity".into()).into();
        assert_eq!(
            err.to_string(),
            "Persistence error: Corrupt holdings data: bad quantity"
        );
    }
}
