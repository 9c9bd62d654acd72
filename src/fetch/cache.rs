// src/fetch/cache.rs
// =============================================================================
// The fetch cache: download a URL to a path unless the path already exists.
//
// There is no manifest. The filesystem IS the cache index: if a file exists
// at the destination it counts as fetched and the network is not touched.
// This is what makes an interrupted run resumable by simply running it again.
//
// Outcomes:
// - file exists           -> Cached(path), no request, no pause
// - download succeeded    -> Downloaded(path), then pause (politeness)
// - server said not found -> NotFound, logged, not an error
// - anything else         -> Err(FetchError), the caller should stop
//
// The cache never creates directories. The caller makes sure the parent of
// the destination exists (the pages directory is created once at startup).
// =============================================================================

use super::names::sanitize;
use super::transport::Transport;
use crate::error::FetchError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file was already on disk
    Cached(PathBuf),
    /// The file was fetched over the network during this call
    Downloaded(PathBuf),
    /// The server has no such resource
    NotFound,
}

impl FetchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            FetchOutcome::Cached(path) | FetchOutcome::Downloaded(path) => Some(path),
            FetchOutcome::NotFound => None,
        }
    }

    pub fn was_downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded(_))
    }
}

pub struct FetchCache<T> {
    transport: T,
    pages_dir: PathBuf,
    delay: Duration,
}

impl<T: Transport> FetchCache<T> {
    pub fn new(transport: T, pages_dir: impl Into<PathBuf>, delay: Duration) -> Self {
        Self {
            transport,
            pages_dir: pages_dir.into(),
            delay,
        }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    /// Where a raw page for `url` is stored in the pages directory
    pub fn page_path(&self, url: &str) -> PathBuf {
        self.pages_dir.join(sanitize(url, false, true))
    }

    /// Fetches a listing or detail page into the pages directory
    pub async fn fetch_page(&self, url: &str, indent: &str) -> Result<FetchOutcome, FetchError> {
        let dest = self.page_path(url);
        self.fetch(url, &dest, indent).await
    }

    // `indent` prefixes the progress lines so they nest under their album
    pub async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        indent: &str,
    ) -> Result<FetchOutcome, FetchError> {
        if is_file(dest).await {
            debug!("{}cached {}", indent, dest.display());
            return Ok(FetchOutcome::Cached(dest.to_path_buf()));
        }

        info!("{}", progress_line(indent, "<", url));
        info!("{}", progress_line(indent, ">", &dest.display().to_string()));

        match self.transport.download(url, dest).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!("{}  NOT FOUND {}", indent, url);
                return Ok(FetchOutcome::NotFound);
            }
            Err(e) => return Err(e),
        }

        // Good bot: bound our request rate, but only after real requests
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(FetchOutcome::Downloaded(dest.to_path_buf()))
    }
}

// "<  url" for what we request, ">  path" for where it goes
fn progress_line(indent: &str, arrow: &str, target: &str) -> String {
    format!("{}{}  {}", indent, arrow, target)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::mock::MockTransport;
    use std::time::Instant;
    use tempfile::TempDir;

    fn cache(transport: MockTransport, dir: &TempDir) -> FetchCache<MockTransport> {
        FetchCache::new(transport, dir.path(), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_download_then_cache_hit() {
        let temp = TempDir::new().unwrap();
        let cache = cache(MockTransport::new().route("http://h/a.jpg", "jpeg"), &temp);
        let dest = temp.path().join("a.jpg");

        let first = cache.fetch("http://h/a.jpg", &dest, "").await.unwrap();
        assert_eq!(first, FetchOutcome::Downloaded(dest.clone()));
        assert!(first.was_downloaded());
        assert_eq!(std::fs::read(&dest).unwrap(), b"jpeg");

        let second = cache.fetch("http://h/a.jpg", &dest, "").await.unwrap();
        assert_eq!(second, FetchOutcome::Cached(dest.clone()));
        assert!(!second.was_downloaded());
        assert_eq!(cache.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn test_existing_file_is_not_touched() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("keep.jpg");
        std::fs::write(&dest, b"local").unwrap();
        let cache = cache(MockTransport::new().route("http://h/keep.jpg", "remote"), &temp);

        let outcome = cache.fetch("http://h/keep.jpg", &dest, "").await.unwrap();
        assert_eq!(outcome.path(), Some(dest.as_path()));
        assert_eq!(std::fs::read(&dest).unwrap(), b"local");
        assert_eq!(cache.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_not_found_is_soft() {
        let temp = TempDir::new().unwrap();
        let cache = cache(MockTransport::new(), &temp);
        let dest = temp.path().join("gone.jpg");

        let outcome = cache.fetch("http://h/gone.jpg", &dest, "").await.unwrap();
        assert_eq!(outcome, FetchOutcome::NotFound);
        assert_eq!(outcome.path(), None);
        assert!(!outcome.was_downloaded());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let temp = TempDir::new().unwrap();
        let cache = cache(MockTransport::new().fail("http://h/x", 500), &temp);

        let err = cache
            .fetch("http://h/x", &temp.path().join("x"), "")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_pages_are_named_by_url() {
        let temp = TempDir::new().unwrap();
        let url = "http://h/index.php?album=a";
        let cache = cache(MockTransport::new().route(url, "<html></html>"), &temp);

        let outcome = cache.fetch_page(url, "").await.unwrap();
        assert_eq!(
            outcome.path(),
            Some(temp.path().join("index.php-Palbum=a").as_path())
        );
    }

    #[tokio::test]
    async fn test_pause_after_download_only() {
        let temp = TempDir::new().unwrap();
        let delay = Duration::from_millis(150);
        let cache = FetchCache::new(
            MockTransport::new().route("http://h/a.jpg", "jpeg"),
            temp.path(),
            delay,
        );
        let dest = temp.path().join("a.jpg");

        let start = Instant::now();
        let outcome = cache.fetch("http://h/a.jpg", &dest, "").await.unwrap();
        assert!(outcome.was_downloaded());
        assert!(start.elapsed() >= delay);

        let start = Instant::now();
        let outcome = cache.fetch("http://h/a.jpg", &dest, "").await.unwrap();
        assert!(!outcome.was_downloaded());
        assert!(start.elapsed() < delay);
    }

    #[tokio::test]
    async fn test_no_pause_when_not_found() {
        let temp = TempDir::new().unwrap();
        let delay = Duration::from_millis(150);
        let cache = FetchCache::new(MockTransport::new(), temp.path(), delay);

        let start = Instant::now();
        let outcome = cache
            .fetch("http://h/gone.jpg", &temp.path().join("gone.jpg"), "")
            .await
            .unwrap();
        assert_eq!(outcome, FetchOutcome::NotFound);
        assert!(start.elapsed() < delay);
    }

    #[test]
    fn test_progress_lines_are_indented() {
        assert_eq!(progress_line("    ", "<", "http://h/a.jpg"), "    <  http://h/a.jpg");
        assert_eq!(progress_line("", ">", "out/a.jpg"), ">  out/a.jpg");
    }
}
