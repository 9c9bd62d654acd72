// src/error.rs
// =============================================================================
// Typed errors for the fetch and crawl layers.
//
// The application layer (main.rs) still uses anyhow, but everything below it
// returns one of these enums so callers can tell a recoverable condition
// (a missing image) from a fatal one (the network is down).
//
// Rust concepts:
// - thiserror: derive macro that writes the Display/Error impls for us
// - #[from]: lets the ? operator convert one error type into another
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

// Errors produced while fetching a single URL to disk
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered 404 / 410. Galleries reference deleted images,
    /// so the fetch cache turns this into a "not fetched" outcome.
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-success HTTP status
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    /// Connection, TLS, timeout or body-read failure
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

// An image link whose query string can't be turned into an asset URL
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("image link has no '{param}' parameter: {url}")]
    MissingParam { url: String, param: &'static str },

    #[error("image identifier '{value}' is not valid UTF-8 once decoded")]
    Decode { value: String },
}

// An image detail page without the elements we need
#[derive(Debug, Error)]
pub enum DetailError {
    #[error("detail page has no element matching '{selector}'")]
    MissingElement { selector: &'static str },

    #[error("full-size link '{href}' is not a valid URL")]
    BadLink { href: String },
}

// Errors that abort a crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("filesystem error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid gallery URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A listing page was reached a second time in one run
    #[error("listing page visited twice, the gallery links form a cycle: {url}")]
    Cycle { url: String },

    /// Only raised in strict mode; otherwise a mismatch is a warning
    #[error("label '{label}' does not match image name '{name}' ({url})")]
    LabelMismatch {
        label: String,
        name: String,
        url: String,
    },

    /// Only raised in strict mode with --verify-pages
    #[error("detail page {page_url} points at {detail_url}, expected {resolved_url}")]
    DetailMismatch {
        page_url: String,
        detail_url: String,
        resolved_url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_recognised() {
        let err = FetchError::NotFound {
            url: "http://h/a.jpg".to_string(),
        };
        assert!(err.is_not_found());

        let err = FetchError::Http {
            url: "http://h/a.jpg".to_string(),
            status: 500,
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_fetch_error_converts_into_crawl_error() {
        let err: CrawlError = FetchError::Http {
            url: "http://h/x".to_string(),
            status: 503,
        }
        .into();
        assert_eq!(err.to_string(), "HTTP 503 for http://h/x");
    }
}
