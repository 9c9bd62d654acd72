// src/fetch/transport.rs
// =============================================================================
// The raw transport: "put the bytes behind this URL into this file".
//
// The fetch cache only talks to the `Transport` trait, so tests can swap the
// real HTTP client for an in-memory one (see mock.rs) and count requests.
//
// HttpTransport:
// - One reqwest Client reused for the whole run (connection pooling)
// - 404 and 410 are reported as FetchError::NotFound, every other
//   non-success status as FetchError::Http
// - The body is streamed to disk, and the file is only created once we know
//   the status is a success, so a missing image never leaves an empty file
//
// An interrupted body leaves a truncated file behind. The cache treats any
// existing file as complete, so such a file is not re-fetched on the next run.
// =============================================================================

use crate::error::FetchError;
use futures::StreamExt; // StreamExt gives us .next() on the body stream
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

pub trait Transport {
    /// Downloads `url` into the file at `dest`, creating or truncating it.
    /// The parent directory of `dest` must already exist.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

// Lets a caller keep ownership of a transport and lend it to a cache
impl<T: Transport> Transport for &T {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        (**self).download(url, dest).await
    }
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };
        let io_error = |source| FetchError::Io {
            path: dest.to_path_buf(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        check_status(url, response.status())?;

        let mut file = tokio::fs::File::create(dest).await.map_err(io_error)?;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(request_error)?;
            file.write_all(&chunk).await.map_err(io_error)?;
        }
        file.flush().await.map_err(io_error)?;

        Ok(())
    }
}

// Maps an HTTP status to the error taxonomy
//
// 2xx -> Ok, 404/410 -> NotFound (recoverable), anything else -> Http (fatal)
fn check_status(url: &str, status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) {
        Err(FetchError::NotFound {
            url: url.to_string(),
        })
    } else {
        Err(FetchError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait here?
//    - The cache only needs "download this URL into this file"
//    - Putting that behind a trait lets tests use MockTransport
//      instead of a real server, and count every request made
//
// 2. What is `impl<T: Transport> Transport for &T`?
//    - A blanket impl: any shared reference to a transport is a transport too
//    - Tests lend the same MockTransport to two crawls and then inspect it
//
// 3. Why stream the body instead of response.bytes()?
//    - Full-size photos can be large
//    - bytes_stream() hands us chunks as they arrive, which we write straight
//      to the file, so memory use stays flat
// -----------------------------------------------------------------------------
