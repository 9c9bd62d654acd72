// src/config.rs
// =============================================================================
// The resolved configuration for one mirroring run.
//
// There is no config file: everything comes from the command line (see
// cli.rs) and is collected here so the crawler doesn't need to know about
// clap at all.
// =============================================================================

use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the directory (under the target directory) holding raw listing
/// and detail pages, one file per URL.
pub const PAGES_DIR_NAME: &str = "website_html";

/// Default pause after every real network fetch
pub const DEFAULT_DELAY_MS: u64 = 2000;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// Direction in which sub-albums are sorted by title before they are crawled.
//
// Galleries differ in how they order albums (oldest or newest first), so
// this is configurable instead of hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Root of the mirrored album tree
    pub target_dir: PathBuf,
    /// Raw page cache directory
    pub pages_dir: PathBuf,
    pub request_delay: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    pub album_order: SortOrder,
    /// Abort on a caption/identity mismatch instead of warning
    pub strict_labels: bool,
    /// Also fetch each image's detail page and cross-check it
    pub verify_pages: bool,
}

impl CrawlConfig {
    /// Configuration rooted at `target_dir`, all other settings default.
    pub fn new(target_dir: impl AsRef<Path>) -> Self {
        let target_dir = target_dir.as_ref().to_path_buf();
        Self {
            pages_dir: target_dir.join(PAGES_DIR_NAME),
            target_dir,
            request_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("zenmirror/{}", env!("CARGO_PKG_VERSION")),
            album_order: SortOrder::default(),
            strict_labels: false,
            verify_pages: false,
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_dir_lives_under_target() {
        let config = CrawlConfig::new("/tmp/mirror");
        assert_eq!(config.pages_dir, PathBuf::from("/tmp/mirror/website_html"));
        assert_eq!(config.album_order, SortOrder::Desc);
        assert!(!config.strict_labels);
    }
}
